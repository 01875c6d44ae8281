//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use storefront_types::ItemId;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

mod commands;

/// Env var holding the log filter (same syntax as `RUST_LOG`).
const LOG_ENV: &str = "STOREFRONT_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";
const LOG_FILE: &str = "storefront.log";

#[derive(Parser)]
#[command(name = "storefront")]
#[command(version)]
#[command(about = "Browse and manage a storefront catalog from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        /// Account username (read from stdin if omitted)
        #[arg(short, long)]
        username: Option<String>,
        /// Account password (read from stdin if omitted)
        #[arg(short, long, env = "STOREFRONT_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Clear the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Query and edit the product catalog
    Products {
        #[command(subcommand)]
        command: ProductCommands,
    },
    /// Interactive catalog browser
    Browse,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ProductCommands {
    /// List products
    List {
        /// Page number (plain listing only)
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Search term
        #[arg(short, long)]
        search: Option<String>,
        /// Category slug (repeatable)
        #[arg(short, long = "category", value_name = "SLUG")]
        categories: Vec<String>,
    },
    /// List category slugs
    Categories,
    /// Add a product
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
    },
    /// Update a product
    Update {
        #[arg(value_name = "ID")]
        id: ItemId,
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
    },
    /// Delete a product
    Delete {
        #[arg(value_name = "ID")]
        id: ItemId,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit.
    let _log_guard = match init_logging() {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("warning: file logging disabled: {e:#}");
            None
        }
    };

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },

        Commands::Login { username, password } => {
            let services = commands::Services::load()?;
            commands::auth::login(&services, username, password).await
        }
        Commands::Logout => {
            commands::auth::logout(&commands::Services::load()?);
            Ok(())
        }
        Commands::Whoami => {
            commands::auth::whoami(&commands::Services::load()?);
            Ok(())
        }

        Commands::Products { command } => {
            let services = commands::Services::load()?;
            match command {
                ProductCommands::List {
                    page,
                    search,
                    categories,
                } => commands::products::list(&services, page, search, categories).await,
                ProductCommands::Categories => commands::products::categories(&services).await,
                ProductCommands::Add { title, price } => {
                    commands::products::add(&services, title, price).await
                }
                ProductCommands::Update { id, title, price } => {
                    commands::products::update(&services, id, title, price).await
                }
                ProductCommands::Delete { id } => commands::products::delete(&services, id).await,
            }
        }

        Commands::Browse => commands::browse::run(&commands::Services::load()?).await,
    }
}

/// Routes `tracing` output to `<home>/logs/storefront.log`, leaving stdout
/// and stderr to the command itself.
fn init_logging() -> Result<WorkerGuard> {
    let dir = storefront_core::config::paths::logs_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create log directory {}", dir.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&dir)
        .with_context(|| format!("open log file in {}", dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("install tracing subscriber")?;

    Ok(guard)
}
