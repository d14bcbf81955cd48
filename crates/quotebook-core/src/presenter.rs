//! Quote selection and rendering
//!
//! The `Presenter` picks a random quote, optionally restricted to one
//! category, and pushes it to a [`DisplaySurface`]. Every rendered quote is
//! remembered in the session store as the last viewed quote.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::warn;

use crate::models::{CategoryFilter, Quote};
use crate::storage::{KeyValueStore, StorageResult, LAST_QUOTE_KEY};

/// Severity of a notice shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Something completed
    Success,
    /// Neutral information
    Info,
    /// Something failed but the app carries on
    Warning,
}

/// Anything that can show quotes and notices to the user
pub trait DisplaySurface {
    /// Show a quote with its category
    fn show_quote(&mut self, quote: &Quote);

    /// No quote matched the current filter
    fn show_empty(&mut self, filter: &CategoryFilter);

    /// Show a message
    fn notify(&mut self, level: NoticeLevel, message: &str);
}

/// Picks and renders quotes
pub struct Presenter {
    rng: StdRng,
    session: Arc<dyn KeyValueStore>,
}

impl Presenter {
    /// Create a presenter with an entropy-seeded generator
    pub fn new(session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            rng: StdRng::from_entropy(),
            session,
        }
    }

    /// Create a presenter with a fixed seed (reproducible picks)
    pub fn with_seed(session: Arc<dyn KeyValueStore>, seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            session,
        }
    }

    /// Uniformly random quote, `None` for an empty collection
    pub fn pick_random<'a>(&mut self, quotes: &'a [Quote]) -> Option<&'a Quote> {
        pick_random(quotes, &mut self.rng)
    }

    /// Uniformly random quote of one category, `None` when nothing matches
    pub fn pick_random_in_category<'a>(
        &mut self,
        quotes: &'a [Quote],
        category: &str,
    ) -> Option<&'a Quote> {
        pick_random_in_category(quotes, category, &mut self.rng)
    }

    /// Pick according to a filter
    pub fn pick<'a>(&mut self, quotes: &'a [Quote], filter: &CategoryFilter) -> Option<&'a Quote> {
        match filter {
            CategoryFilter::All => self.pick_random(quotes),
            CategoryFilter::Category(c) => self.pick_random_in_category(quotes, c),
        }
    }

    /// Push a quote to the surface and remember it for this session
    pub fn render(&self, quote: &Quote, surface: &mut dyn DisplaySurface) -> StorageResult<()> {
        surface.show_quote(quote);
        let json = serde_json::to_string(quote)?;
        self.session.set(LAST_QUOTE_KEY, &json)
    }

    /// Pick and render in one step
    ///
    /// Returns the rendered quote, or `None` after telling the surface
    /// that nothing matched. Failing to record the last viewed quote is
    /// logged; the quote has been shown either way.
    pub fn show(
        &mut self,
        quotes: &[Quote],
        filter: &CategoryFilter,
        surface: &mut dyn DisplaySurface,
    ) -> Option<Quote> {
        let Some(quote) = self.pick(quotes, filter).cloned() else {
            surface.show_empty(filter);
            return None;
        };
        if let Err(e) = self.render(&quote, surface) {
            warn!("Could not record last viewed quote: {}", e);
        }
        Some(quote)
    }

    /// The last quote rendered in this session
    pub fn last_viewed(&self) -> StorageResult<Option<Quote>> {
        let Some(raw) = self.session.get(LAST_QUOTE_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(quote) => Ok(Some(quote)),
            Err(e) => {
                warn!("Ignoring unreadable last viewed quote: {}", e);
                Ok(None)
            }
        }
    }
}

/// Uniformly random quote from a slice
pub fn pick_random<'a, R: Rng + ?Sized>(quotes: &'a [Quote], rng: &mut R) -> Option<&'a Quote> {
    quotes.choose(rng)
}

/// Uniformly random quote among those of `category`
pub fn pick_random_in_category<'a, R: Rng + ?Sized>(
    quotes: &'a [Quote],
    category: &str,
    rng: &mut R,
) -> Option<&'a Quote> {
    let matching: Vec<&Quote> = quotes.iter().filter(|q| q.category == category).collect();
    matching.choose(rng).copied()
}
