//! Sync command handler

use anyhow::{bail, Result};

use quotebook_core::sync::SyncTrigger;
use quotebook_core::{Config, QuoteApp};

use crate::commands::AlreadyReported;
use crate::display::TerminalDisplay;
use crate::output::Output;

/// Reconcile with the remote collection
pub async fn sync(app: &mut QuoteApp, config: &Config, output: &Output) -> Result<()> {
    if !config.sync_enabled {
        bail!(
            "Sync is not enabled. Enable it with:\n  \
             quotebook config set sync_enabled true"
        );
    }

    let Some(endpoint) = app.sync_agent().map(|agent| agent.endpoint().to_string()) else {
        bail!(
            "Remote URL not configured. Set it with:\n  \
             quotebook config set remote_url https://your-server/quotes"
        );
    };

    output.message(&format!("Syncing with {}...", endpoint));

    let mut display = TerminalDisplay::new(output);
    app.sync(SyncTrigger::Manual, &mut display)
        .await
        .map_err(|_| AlreadyReported)?;

    let categories = app.categories().list().len();
    output.message(&format!(
        "  Quotes: {}, Categories: {}",
        app.store().len(),
        categories
    ));
    Ok(())
}
