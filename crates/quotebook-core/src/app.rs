//! Application controller
//!
//! `QuoteApp` owns the store, category index, presenter and optional sync
//! agent, and exposes one handler per user command. Handlers report to a
//! [`DisplaySurface`] and return the outcome so callers can pick exit codes.

use std::sync::Arc;

use tracing::warn;

use crate::categories::CategoryIndex;
use crate::error::{StoreError, SyncError, TransferError};
use crate::models::{CategoryFilter, Quote};
use crate::presenter::{DisplaySurface, NoticeLevel, Presenter};
use crate::storage::{KeyValueStore, StorageResult};
use crate::store::QuoteStore;
use crate::sync::{SyncAgent, SyncOutcome, SyncTrigger};
use crate::transfer::{self, ExportFile};

/// The quote widget, minus its display
pub struct QuoteApp {
    store: QuoteStore,
    categories: CategoryIndex,
    presenter: Presenter,
    sync: Option<Arc<SyncAgent>>,
}

impl QuoteApp {
    /// Open the app over a durable store and a session store
    pub fn open(
        durable: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
    ) -> StorageResult<Self> {
        let store = QuoteStore::open(durable.clone())?;
        let categories = CategoryIndex::new(durable, store.quotes());
        Ok(Self {
            store,
            categories,
            presenter: Presenter::new(session),
            sync: None,
        })
    }

    /// Attach a sync agent; add and import will trigger a sync afterwards
    pub fn with_sync(mut self, agent: Arc<SyncAgent>) -> Self {
        self.sync = Some(agent);
        self
    }

    /// Replace the presenter (e.g. with a seeded one)
    pub fn with_presenter(mut self, presenter: Presenter) -> Self {
        self.presenter = presenter;
        self
    }

    pub fn store(&self) -> &QuoteStore {
        &self.store
    }

    pub fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    pub fn sync_agent(&self) -> Option<&Arc<SyncAgent>> {
        self.sync.as_ref()
    }

    /// The persisted filter, falling back to `All` if it cannot be read
    pub fn current_filter(&self) -> CategoryFilter {
        self.categories.selected_filter().unwrap_or_else(|e| {
            warn!("Could not read selected category: {}", e);
            CategoryFilter::All
        })
    }

    /// Show a random quote honoring the persisted filter
    pub fn show_quote(&mut self, surface: &mut dyn DisplaySurface) -> Option<Quote> {
        let filter = self.current_filter();
        self.show_quote_with(&filter, surface)
    }

    /// Show a random quote honoring an explicit filter
    pub fn show_quote_with(
        &mut self,
        filter: &CategoryFilter,
        surface: &mut dyn DisplaySurface,
    ) -> Option<Quote> {
        self.presenter.show(self.store.quotes(), filter, surface)
    }

    /// Persist a new filter and show a quote under it
    pub fn select_category(
        &mut self,
        filter: CategoryFilter,
        surface: &mut dyn DisplaySurface,
    ) -> StorageResult<Option<Quote>> {
        if let Err(e) = self.categories.set_filter(&filter) {
            surface.notify(NoticeLevel::Warning, &format!("Could not save filter: {}", e));
            return Err(e);
        }
        Ok(self.show_quote_with(&filter, surface))
    }

    /// Add a quote from user input, then sync if enabled
    pub async fn add_quote(
        &mut self,
        text: &str,
        category: &str,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Quote, StoreError> {
        let quote = match self.store.add(text, category) {
            Ok(quote) => quote,
            Err(StoreError::Validation(e)) => {
                surface.notify(
                    NoticeLevel::Warning,
                    &format!("Please enter both a quote and a category ({}).", e),
                );
                return Err(e.into());
            }
            Err(e) => {
                surface.notify(NoticeLevel::Warning, &format!("Could not save quote: {}", e));
                return Err(e);
            }
        };

        self.categories.refresh(self.store.quotes());
        surface.notify(NoticeLevel::Success, "Quote added successfully!");
        self.sync_after_change(surface).await;
        Ok(quote)
    }

    /// Merge an uploaded JSON file, then sync if enabled
    pub async fn import(
        &mut self,
        bytes: &[u8],
        surface: &mut dyn DisplaySurface,
    ) -> Result<usize, TransferError> {
        let added = match transfer::import_into(&mut self.store, bytes) {
            Ok(added) => added,
            Err(e) => {
                surface.notify(NoticeLevel::Warning, &format!("Import failed: {}", e));
                return Err(e);
            }
        };

        self.categories.refresh(self.store.quotes());
        surface.notify(
            NoticeLevel::Success,
            &format!("Quotes imported successfully! ({} added)", added),
        );
        self.sync_after_change(surface).await;
        Ok(added)
    }

    /// Serialize the collection for download
    pub fn export(&self) -> serde_json::Result<ExportFile> {
        transfer::export_json(self.store.quotes())
    }

    /// The last quote shown in this session
    pub fn last_viewed(&self) -> StorageResult<Option<Quote>> {
        self.presenter.last_viewed()
    }

    /// Reconcile with the remote
    ///
    /// Returns `Ok(None)` when no sync agent is attached.
    pub async fn sync(
        &mut self,
        trigger: SyncTrigger,
        surface: &mut dyn DisplaySurface,
    ) -> Result<Option<SyncOutcome>, SyncError> {
        let Some(agent) = self.sync.clone() else {
            return Ok(None);
        };

        let result = agent
            .reconcile(&mut self.store, &mut self.categories, trigger)
            .await;

        match &result {
            Ok(SyncOutcome::Completed(report)) => {
                surface.notify(
                    NoticeLevel::Info,
                    &format!(
                        "Quotes synced with server: {} received, {} local replaced.",
                        report.fetched, report.discarded
                    ),
                );
                if !report.is_clean() {
                    surface.notify(
                        NoticeLevel::Warning,
                        &format!(
                            "{} of {} quotes could not be posted to the server.",
                            report.push_failures.len(),
                            report.pushed + report.push_failures.len()
                        ),
                    );
                }
            }
            Ok(SyncOutcome::Skipped) => {
                surface.notify(NoticeLevel::Info, "Sync already in progress.");
            }
            Err(e) => {
                surface.notify(NoticeLevel::Warning, &e.to_string());
            }
        }

        result.map(Some)
    }

    async fn sync_after_change(&mut self, surface: &mut dyn DisplaySurface) {
        // Failures were already reported to the surface
        let _ = self.sync(SyncTrigger::Manual, surface).await;
    }
}
