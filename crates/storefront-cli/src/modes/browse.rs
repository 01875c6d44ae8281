//! Interactive catalog browser.
//!
//! Line-oriented: every input line is one command, the catalog is redrawn
//! after each command that changes it. Exits on `:q` or EOF.

use std::io::{BufRead, Write};

use anyhow::Result;
use storefront_core::app::App;
use storefront_types::{ItemFields, ItemId, View};

use crate::render;

const QUIT_COMMAND: &str = ":q";
const PROMPT: &str = "storefront> ";

const HELP: &str = "\
Commands:
  /login <username> <password>  sign in
  /search [term]                search (no term clears it)
  /cat [slug,slug...]           toggle categories (none clears them)
  /categories                   list category slugs
  /page <n>                     go to page n
  /add <price> <title>          add a product
  /edit <id> <price> <title>    update a product
  /del <id>                     delete a product
  /logout                       sign out
  :q                            quit";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    Login { username: String, password: String },
    Search(String),
    ToggleCategories(Vec<String>),
    ClearCategories,
    Categories,
    Page(u32),
    Add(ItemFields),
    Edit(ItemId, ItemFields),
    Delete(ItemId),
    Logout,
    Help,
    Quit,
}

fn parse(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line == QUIT_COMMAND {
        return Ok(Command::Quit);
    }
    let (name, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match name {
        "/login" => match rest.split_once(' ') {
            Some((username, password)) => Ok(Command::Login {
                username: username.to_string(),
                password: password.trim().to_string(),
            }),
            None => Err("usage: /login <username> <password>".to_string()),
        },
        "/search" => Ok(Command::Search(rest.to_string())),
        "/cat" if rest.is_empty() => Ok(Command::ClearCategories),
        "/cat" => Ok(Command::ToggleCategories(
            rest.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        "/categories" => Ok(Command::Categories),
        "/page" => rest
            .parse()
            .map(Command::Page)
            .map_err(|e| format!("invalid page number '{rest}': {e}")),
        "/add" => parse_fields(rest).map(Command::Add),
        "/edit" => {
            let (id, fields) = rest.split_once(' ').unwrap_or((rest, ""));
            let id = parse_id(id)?;
            parse_fields(fields.trim()).map(|fields| Command::Edit(id, fields))
        }
        "/del" => parse_id(rest).map(Command::Delete),
        "/logout" => Ok(Command::Logout),
        "/help" | "?" => Ok(Command::Help),
        _ => Err(format!("unknown command '{name}' (try /help)")),
    }
}

fn parse_id(raw: &str) -> Result<ItemId, String> {
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid product id '{raw}': {e}"))
}

/// `<price> <title...>`. Validation of the values is left to the catalog.
fn parse_fields(raw: &str) -> Result<ItemFields, String> {
    let (price, title) = raw.split_once(' ').unwrap_or((raw, ""));
    let price: f64 = price
        .parse()
        .map_err(|e| format!("invalid price '{price}': {e}"))?;
    Ok(ItemFields::new(title.trim(), price))
}

/// Runs the browser until `:q` or end of input.
pub async fn run<R, W>(input: R, output: &mut W, app: &mut App) -> Result<()>
where
    R: BufRead,
    W: Write,
{
    let view = app.open(View::Catalog.path()).await;
    show(output, app, view)?;
    write!(output, "{PROMPT}")?;
    output.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(output, "{PROMPT}")?;
            output.flush()?;
            continue;
        }

        let command = match parse(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                writeln!(output, "{message}")?;
                write!(output, "{PROMPT}")?;
                output.flush()?;
                continue;
            }
        };

        let redraw = execute(output, app, command).await?;
        if redraw {
            let view = app.current_view();
            show(output, app, view)?;
        } else {
            render::notices(output, &app.drain_notices())?;
        }
        write!(output, "{PROMPT}")?;
        output.flush()?;
    }

    writeln!(output, "Goodbye!")?;
    Ok(())
}

/// Applies one command. Returns whether the view should be redrawn.
async fn execute<W: Write>(output: &mut W, app: &mut App, command: Command) -> Result<bool> {
    let redraw = match command {
        Command::Login { username, password } => {
            app.login(&username, &password).await;
            true
        }
        Command::Search(term) => app.set_term(&term).await,
        Command::ToggleCategories(categories) => app.toggle_categories(&categories).await,
        Command::ClearCategories => app.set_categories(&[]).await,
        Command::Page(page) => app.set_page(page).await,
        Command::Add(fields) => app.create(&fields).await.is_some(),
        Command::Edit(id, fields) => app.update(id, &fields).await.is_some(),
        Command::Delete(id) => app.delete(id).await,
        Command::Logout => {
            app.logout().await;
            true
        }
        Command::Categories => {
            match app.catalog() {
                Some(engine) => render::categories(output, engine.categories())?,
                None => writeln!(output, "Not signed in.")?,
            }
            false
        }
        Command::Help => {
            writeln!(output, "{HELP}")?;
            false
        }
        Command::Quit => false,
    };
    Ok(redraw)
}

fn show<W: Write>(output: &mut W, app: &mut App, view: View) -> Result<()> {
    render::notices(output, &app.drain_notices())?;
    match (view, app.catalog()) {
        (View::Catalog, Some(engine)) => {
            if let Some(session) = app.session() {
                writeln!(output, "Signed in as {}.", session.display_name())?;
            }
            render::catalog(output, engine)?;
        }
        _ => writeln!(
            output,
            "Not logged in. Use /login <username> <password>, or :q to quit."
        )?,
    }
    Ok(())
}
