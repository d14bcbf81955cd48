//! Category index
//!
//! Derives the distinct category list from the quote collection and
//! remembers the user's filter choice across sessions.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::models::{CategoryFilter, Quote};
use crate::storage::{KeyValueStore, StorageResult, SELECTED_CATEGORY_KEY};

/// Distinct categories plus the persisted filter selection
pub struct CategoryIndex {
    kv: Arc<dyn KeyValueStore>,
    categories: Vec<String>,
}

impl CategoryIndex {
    /// Build the index for a collection
    pub fn new(kv: Arc<dyn KeyValueStore>, quotes: &[Quote]) -> Self {
        Self {
            kv,
            categories: categories(quotes),
        }
    }

    /// Recompute the category list after the collection changed
    pub fn refresh(&mut self, quotes: &[Quote]) {
        self.categories = categories(quotes);
        debug!(count = self.categories.len(), "Refreshed categories");
    }

    /// Cached categories, sorted
    pub fn list(&self) -> &[String] {
        &self.categories
    }

    /// Whether a category is present in the collection
    pub fn contains(&self, category: &str) -> bool {
        self.categories
            .binary_search_by(|c| c.as_str().cmp(category))
            .is_ok()
    }

    /// The persisted filter, `All` when none was chosen
    pub fn selected_filter(&self) -> StorageResult<CategoryFilter> {
        Ok(self
            .kv
            .get(SELECTED_CATEGORY_KEY)?
            .map(|value| CategoryFilter::parse(&value))
            .unwrap_or_default())
    }

    /// Persist a new filter selection
    pub fn set_filter(&self, filter: &CategoryFilter) -> StorageResult<()> {
        self.kv.set(SELECTED_CATEGORY_KEY, filter.as_str())
    }
}

/// Distinct categories of a collection in ascending order
pub fn categories(quotes: &[Quote]) -> Vec<String> {
    quotes
        .iter()
        .map(|q| q.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
