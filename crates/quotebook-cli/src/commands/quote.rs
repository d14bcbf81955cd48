//! Quote command handlers

use anyhow::Result;

use quotebook_core::{CategoryFilter, QuoteApp};

use crate::commands::AlreadyReported;
use crate::display::TerminalDisplay;
use crate::output::Output;

/// Show a random quote, using the saved filter unless a category is given
pub fn show(app: &mut QuoteApp, category: Option<String>, output: &Output) -> Result<()> {
    let mut display = TerminalDisplay::new(output);
    match category {
        Some(c) => app.show_quote_with(&CategoryFilter::parse(&c), &mut display),
        None => app.show_quote(&mut display),
    };
    Ok(())
}

/// List quotes, optionally restricted to one category
pub fn list(app: &QuoteApp, category: Option<String>, output: &Output) -> Result<()> {
    let filter = category
        .map(|c| CategoryFilter::parse(&c))
        .unwrap_or_default();
    let quotes: Vec<_> = app
        .store()
        .quotes()
        .iter()
        .filter(|q| filter.matches(q))
        .cloned()
        .collect();

    output.print_quotes(&quotes);
    Ok(())
}

/// Add a quote
pub async fn add(app: &mut QuoteApp, text: String, category: String, output: &Output) -> Result<()> {
    let mut display = TerminalDisplay::new(output);
    // The display has already shown why the quote was rejected
    let quote = app
        .add_quote(&text, &category, &mut display)
        .await
        .map_err(|_| AlreadyReported)?;

    if output.is_json() {
        output.print_quote(&quote);
    }
    Ok(())
}
