//! Data models for Quotebook
//!
//! Defines the core data structures: Quote and CategoryFilter.
//! Quotes carry no identifier; two quotes with the same text and category
//! are indistinguishable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Persisted value of the "no category restriction" filter
pub const ALL_CATEGORIES: &str = "all";

/// A quote with its category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Quote {
    /// The quote text
    pub text: String,
    /// Category label (free-form)
    pub category: String,
}

impl Quote {
    /// Create a new quote
    pub fn new(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: category.into(),
        }
    }

    /// Whether both fields hold something other than whitespace
    pub fn is_complete(&self) -> bool {
        !self.text.trim().is_empty() && !self.category.trim().is_empty()
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" - {}", self.text, self.category)
    }
}

/// The quotes a fresh installation starts with
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new(
            "The only way to do great work is to love what you do.",
            "Inspiration",
        ),
        Quote::new(
            "Life is what happens when you're busy making other plans.",
            "Life",
        ),
        Quote::new("Get busy living or get busy dying.", "Motivation"),
    ]
}

/// Category restriction applied when picking a quote
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// No restriction
    #[default]
    All,
    /// Only quotes whose category matches exactly
    Category(String),
}

impl CategoryFilter {
    /// Parse a stored or user-supplied value
    ///
    /// The sentinel `"all"` and blank input both mean no restriction.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Category(value.to_string())
        }
    }

    /// The string persisted for this filter
    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Category(c) => c,
        }
    }

    /// Whether a quote passes this filter
    pub fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Category(c) => quote.category == *c,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for CategoryFilter {
    fn from(s: &str) -> Self {
        Self::parse(s)
    }
}
