//! Product command handlers.

use anyhow::{Context, Result, bail};
use storefront_core::app::App;
use storefront_core::notice::Notice;
use storefront_types::{CatalogQuery, ItemFields, ItemId};

use super::Services;
use crate::render;

pub async fn list(
    services: &Services,
    page: u32,
    search: Option<String>,
    categories: Vec<String>,
) -> Result<()> {
    let mut query = CatalogQuery::default();
    if let Some(term) = search {
        query.set_term(term);
    }
    query.set_categories(categories);
    // Term and category changes reset the page, so it goes last.
    query.set_page(page);

    let mut app = services.catalog_app(query).await?;
    report(&mut app)?;

    let engine = app.catalog().context("catalog view closed unexpectedly")?;
    render::catalog(&mut std::io::stdout().lock(), engine)?;
    Ok(())
}

pub async fn categories(services: &Services) -> Result<()> {
    let mut app = services.catalog_app(CatalogQuery::default()).await?;
    report(&mut app)?;

    let engine = app.catalog().context("catalog view closed unexpectedly")?;
    render::categories(&mut std::io::stdout().lock(), engine.categories())?;
    Ok(())
}

pub async fn add(services: &Services, title: String, price: f64) -> Result<()> {
    let mut app = services.catalog_app(CatalogQuery::default()).await?;
    app.drain_notices();

    let created = app.create(&ItemFields::new(title, price)).await;
    report(&mut app)?;
    if let Some(item) = created {
        render::item(&mut std::io::stdout().lock(), &item)?;
    }
    Ok(())
}

pub async fn update(services: &Services, id: ItemId, title: String, price: f64) -> Result<()> {
    let mut app = services.catalog_app(CatalogQuery::default()).await?;
    app.drain_notices();

    let updated = app.update(id, &ItemFields::new(title, price)).await;
    report(&mut app)?;
    if let Some(item) = updated {
        render::item(&mut std::io::stdout().lock(), &item)?;
    }
    Ok(())
}

pub async fn delete(services: &Services, id: ItemId) -> Result<()> {
    let mut app = services.catalog_app(CatalogQuery::default()).await?;
    app.drain_notices();

    app.delete(id).await;
    report(&mut app)
}

/// Prints success notices; error notices become the command's error.
fn report(app: &mut App) -> Result<()> {
    let (errors, successes): (Vec<Notice>, Vec<Notice>) =
        app.drain_notices().into_iter().partition(Notice::is_error);
    render::notices(&mut std::io::stdout().lock(), &successes)?;

    if errors.is_empty() {
        return Ok(());
    }
    let messages: Vec<&str> = errors.iter().map(|n| n.message.as_str()).collect();
    bail!("{}", messages.join("\n"))
}
