//! Export and import command handlers

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use quotebook_core::QuoteApp;

use crate::commands::AlreadyReported;
use crate::display::TerminalDisplay;
use crate::output::Output;

/// Write the collection as JSON (`-` writes to stdout)
pub fn export(app: &QuoteApp, path: Option<PathBuf>, output: &Output) -> Result<()> {
    let file = app.export().context("Failed to serialize quotes")?;

    let path = path.unwrap_or_else(|| PathBuf::from(file.file_name));
    if path.as_os_str() == "-" {
        std::io::stdout()
            .write_all(&file.bytes)
            .context("Failed to write export to stdout")?;
        return Ok(());
    }

    file.write_to(&path)
        .with_context(|| format!("Failed to write export to {:?}", path))?;
    output.success(&format!(
        "Exported {} quote(s) to {}",
        app.store().len(),
        path.display()
    ));
    Ok(())
}

/// Merge quotes from a JSON file
pub async fn import(app: &mut QuoteApp, path: PathBuf, output: &Output) -> Result<()> {
    let bytes = std::fs::read(&path).with_context(|| format!("Failed to read {:?}", path))?;

    let mut display = TerminalDisplay::new(output);
    app.import(&bytes, &mut display)
        .await
        .map_err(|_| AlreadyReported)?;
    Ok(())
}

