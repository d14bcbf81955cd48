//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use quotebook_core::{CategoryFilter, Quote};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single quote
    pub fn print_quote(&self, quote: &Quote) {
        match self.format {
            OutputFormat::Human => println!("{}", quote),
            OutputFormat::Json => println!("{}", serde_json::json!(quote)),
            OutputFormat::Quiet => println!("{}", quote.text),
        }
    }

    /// Report that no quote matched a filter
    pub fn print_no_quote(&self, filter: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => match filter {
                CategoryFilter::All => println!("No quotes available."),
                CategoryFilter::Category(c) => {
                    println!("No quotes available in category '{}'.", c)
                }
            },
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"quote": null, "filter": filter.as_str()})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a list of quotes
    pub fn print_quotes(&self, quotes: &[Quote]) {
        match self.format {
            OutputFormat::Human => {
                if quotes.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for (i, quote) in quotes.iter().enumerate() {
                    println!(
                        "{:>3} | {} | {}",
                        i + 1,
                        truncate(&quote.category, 15),
                        truncate(&quote.text, 60)
                    );
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::json!(quotes));
            }
            OutputFormat::Quiet => {
                for quote in quotes {
                    println!("{}", quote.text);
                }
            }
        }
    }

    /// Print categories with usage counts, marking the selected filter
    pub fn print_categories(&self, categories: &[(String, usize)], selected: &CategoryFilter) {
        match self.format {
            OutputFormat::Human => {
                let marker = |is_selected: bool| if is_selected { "*" } else { " " };
                println!(
                    "{} All Categories",
                    marker(*selected == CategoryFilter::All)
                );
                for (name, count) in categories {
                    let is_selected =
                        matches!(selected, CategoryFilter::Category(c) if c == name);
                    println!("{} {} ({})", marker(is_selected), name, count);
                }
                println!("\n{} category(ies)", categories.len());
            }
            OutputFormat::Json => {
                let json_categories: Vec<_> = categories
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "selected": selected.as_str(),
                        "categories": json_categories
                    })
                );
            }
            OutputFormat::Quiet => {
                for (name, _) in categories {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning to stderr (shown even in quiet mode)
    pub fn warning(&self, msg: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": msg})
                );
            }
            _ => eprintln!("⚠ {}", msg),
        }
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
