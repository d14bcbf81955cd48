//! Status command handler

use anyhow::Result;

use quotebook_core::sync::SyncStatus;
use quotebook_core::{Config, LoadSource, QuoteApp};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(app: &QuoteApp, config: &Config, output: &Output) -> Result<()> {
    let store = app.store();
    let filter = app.current_filter();
    let load_source = describe_load_source(store.load_source());
    let last_sync = app
        .sync_agent()
        .and_then(|agent| agent.last_report())
        .map(|report| report.finished_at);
    let sync_status = app.sync_agent().map(|agent| match agent.status() {
        SyncStatus::Idle => "idle",
        SyncStatus::Syncing => "syncing",
        SyncStatus::Error => "error",
    });

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "quotes": store.len(),
                    "categories": app.categories().list(),
                    "filter": filter.as_str(),
                    "loaded_from": load_source,
                    "data_dir": config.data_dir,
                    "sync_enabled": config.sync_enabled,
                    "remote_url": config.remote_url,
                    "sync_status": sync_status,
                    "last_sync": last_sync.map(|t| t.to_rfc3339()),
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", store.len());
        }
        OutputFormat::Human => {
            println!("Quotebook Status");
            println!("================");
            println!();
            println!("Collection:");
            println!("  Quotes:     {}", store.len());
            println!("  Categories: {}", app.categories().list().join(", "));
            println!("  Filter:     {}", filter);
            println!("  Loaded:     {}", load_source);
            println!();
            println!("Sync:");
            println!(
                "  Status: {}",
                if config.sync_enabled {
                    sync_status.unwrap_or("not configured")
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.remote_url {
                println!("  Remote: {}", url);
            }
            if let Some(at) = last_sync {
                println!("  Last:   {}", at.format("%Y-%m-%d %H:%M:%S UTC"));
            }
            println!();
            println!("Storage:");
            println!("  Location: {}", config.store_dir().display());
        }
    }

    Ok(())
}

fn describe_load_source(source: &LoadSource) -> &'static str {
    match source {
        LoadSource::Persisted => "saved collection",
        LoadSource::Seed => "built-in quotes",
        LoadSource::RecoveredFromCorrupt { .. } => "built-in quotes (saved data unreadable)",
    }
}
