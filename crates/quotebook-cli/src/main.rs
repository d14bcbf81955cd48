//! Quotebook CLI
//!
//! Command-line interface for Quotebook - a quote collection with random
//! display, category filters, JSON export/import and remote sync.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use quotebook_core::sync::{HttpRemote, SyncAgent};
use quotebook_core::{Config, FileStore, LoadSource, MemoryStore, QuoteApp};

mod commands;
mod display;
mod logging;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "quotebook")]
#[command(about = "Quotebook - random quotes, categories and sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to an alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a random quote (default)
    Show {
        /// Only pick from this category (overrides the saved filter)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List quotes
    #[command(alias = "ls")]
    List {
        /// Filter by category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Add a quote
    Add {
        /// Quote text
        text: String,
        /// Category
        category: String,
    },
    /// List categories
    Categories,
    /// Show or set the category filter
    Filter {
        /// Category name, or "all"
        category: Option<String>,
    },
    /// Export quotes to a JSON file
    Export {
        /// Output file (default quotes.json, "-" for stdout)
        path: Option<PathBuf>,
    },
    /// Import quotes from a JSON file
    Import {
        /// JSON file containing an array of quotes
        path: PathBuf,
    },
    /// Sync with the remote collection
    Sync,
    /// Show status
    Status,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Start an interactive shell
    Shell,
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, remote_url, sync_enabled, log_file)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the store
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), cli.config.as_ref(), &output);
    }

    let config = Config::load_with_cli_override(cli.config.as_ref())
        .context("Failed to load configuration")?;
    logging::init_logging(&config);

    let mut app = open_app(&config)?;
    if let LoadSource::RecoveredFromCorrupt { backup_key, .. } = app.store().load_source() {
        output.warning(&format!(
            "Saved quotes could not be read and were replaced by the built-in set. \
             The original data was kept under '{}'.",
            backup_key
        ));
    }

    let command = cli.command.unwrap_or(Commands::Show { category: None });
    let result = match command {
        Commands::Show { category } => commands::quote::show(&mut app, category, &output),
        Commands::List { category } => commands::quote::list(&app, category, &output),
        Commands::Add { text, category } => {
            commands::quote::add(&mut app, text, category, &output).await
        }
        Commands::Categories => commands::category::list(&app, &output),
        Commands::Filter { category } => commands::category::filter(&mut app, category, &output),
        Commands::Export { path } => commands::transfer::export(&app, path, &output),
        Commands::Import { path } => commands::transfer::import(&mut app, path, &output).await,
        Commands::Sync => commands::sync::sync(&mut app, &config, &output).await,
        Commands::Status => commands::status::show(&app, &config, &output),
        Commands::Shell => commands::shell::run(&mut app, &config, &output).await,
        Commands::Config { .. } => unreachable!(), // Handled above
    };

    match result {
        Err(e) if !commands::needs_report(&e) => std::process::exit(1),
        other => other,
    }
}

/// Open the app over the configured data directory
fn open_app(config: &Config) -> Result<QuoteApp> {
    let store_dir = config.store_dir();
    let durable = FileStore::open(store_dir.clone()).map_err(|e| match e.recovery_suggestion() {
        Some(hint) => anyhow::anyhow!(
            "Failed to open store at {}: {}\n{}",
            store_dir.display(),
            e,
            hint
        ),
        None => anyhow::anyhow!("Failed to open store at {}: {}", store_dir.display(), e),
    })?;

    // The session store lives as long as this process
    let app = QuoteApp::open(Arc::new(durable), Arc::new(MemoryStore::new()))
        .context("Failed to load quotes")?;

    let Some(url) = config.sync_endpoint() else {
        return Ok(app);
    };
    let remote = HttpRemote::new(url).context("Failed to create HTTP client")?;
    Ok(app.with_sync(Arc::new(SyncAgent::new(Arc::new(remote)))))
}

fn handle_config_command(
    command: Option<ConfigCommands>,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(config_path, output),
        Some(ConfigCommands::Set { key, value }) => {
            commands::config::set(key, value, config_path, output)
        }
    }
}
