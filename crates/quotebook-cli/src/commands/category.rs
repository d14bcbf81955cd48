//! Category command handlers

use anyhow::Result;

use quotebook_core::{CategoryFilter, QuoteApp};

use crate::commands::AlreadyReported;
use crate::display::TerminalDisplay;
use crate::output::Output;

/// List categories with quote counts
pub fn list(app: &QuoteApp, output: &Output) -> Result<()> {
    let quotes = app.store().quotes();
    let counts: Vec<(String, usize)> = app
        .categories()
        .list()
        .iter()
        .map(|name| {
            let count = quotes.iter().filter(|q| &q.category == name).count();
            (name.clone(), count)
        })
        .collect();

    output.print_categories(&counts, &app.current_filter());
    Ok(())
}

/// Show the saved filter, or save a new one and show a matching quote
pub fn filter(app: &mut QuoteApp, value: Option<String>, output: &Output) -> Result<()> {
    let Some(value) = value else {
        let current = app.current_filter();
        match current {
            CategoryFilter::All => output.message("Filter: all categories"),
            CategoryFilter::Category(ref c) => output.message(&format!("Filter: {}", c)),
        }
        if output.is_quiet() {
            println!("{}", current);
        }
        return Ok(());
    };

    // An unknown category is saved anyway; the display reports it has no quotes
    let mut display = TerminalDisplay::new(output);
    app.select_category(CategoryFilter::parse(&value), &mut display)
        .map_err(|_| AlreadyReported)?;
    Ok(())
}
