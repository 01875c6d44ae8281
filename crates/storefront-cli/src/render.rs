//! Plain-text rendering of catalog state.

use std::io::{self, Write};

use storefront_core::catalog::CatalogQueryEngine;
use storefront_core::notice::Notice;
use storefront_types::Item;

const TITLE_WIDTH: usize = 40;

pub fn catalog(out: &mut impl Write, engine: &CatalogQueryEngine) -> io::Result<()> {
    let result = engine.result();
    if result.is_empty() {
        return writeln!(out, "No products found.");
    }

    writeln!(out, "{:>6}  {:<TITLE_WIDTH$}  {:>10}", "ID", "TITLE", "PRICE")?;
    for row in &result.items {
        item(out, row)?;
    }

    if engine.current_request().is_paginated() {
        writeln!(
            out,
            "Page {} of {} ({} products)",
            engine.query().page(),
            engine.page_count(),
            result.total
        )
    } else {
        writeln!(out, "{} matching products", result.items.len())
    }
}

pub fn item(out: &mut impl Write, item: &Item) -> io::Result<()> {
    writeln!(
        out,
        "{:>6}  {:<TITLE_WIDTH$}  {:>10.2}",
        item.id,
        clip(&item.title),
        item.price
    )
}

pub fn categories(out: &mut impl Write, categories: &[String]) -> io::Result<()> {
    if categories.is_empty() {
        return writeln!(out, "No categories.");
    }
    for category in categories {
        writeln!(out, "{category}")?;
    }
    Ok(())
}

pub fn notices(out: &mut impl Write, notices: &[Notice]) -> io::Result<()> {
    for notice in notices {
        writeln!(out, "{notice}")?;
    }
    Ok(())
}

fn clip(title: &str) -> String {
    if title.chars().count() <= TITLE_WIDTH {
        return title.to_string();
    }
    let mut clipped: String = title.chars().take(TITLE_WIDTH - 1).collect();
    clipped.push('…');
    clipped
}
