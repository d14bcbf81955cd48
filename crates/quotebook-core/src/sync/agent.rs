//! Sync agent
//!
//! Reconciles the local store with a [`RemoteCollection`]:
//! 1. Fetch the remote collection
//! 2. Replace the local collection with it (remote wins, no merge)
//! 3. Persist and refresh the category index
//! 4. POST every quote back to the remote, one at a time
//!
//! Local quotes added since the previous sync are discarded by step 2.
//! Only one reconcile runs at a time; overlapping requests are skipped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::remote::RemoteCollection;
use crate::categories::CategoryIndex;
use crate::error::{NetworkError, SyncError};
use crate::models::Quote;
use crate::store::QuoteStore;

/// Interval between scheduled syncs
pub const SYNC_INTERVAL: Duration = Duration::from_secs(300);

/// What started a reconcile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncTrigger {
    /// The periodic timer fired
    Scheduled,
    /// A local change or an explicit request
    Manual,
}

/// Agent status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No reconcile running
    Idle,
    /// Reconcile in progress
    Syncing,
    /// Last reconcile failed
    Error,
}

/// A quote the remote refused
#[derive(Debug, Clone)]
pub struct PushFailure {
    /// Position in the pushed collection
    pub index: usize,
    pub quote: Quote,
    pub reason: String,
}

/// Result of a completed reconcile
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub trigger: SyncTrigger,
    /// Quotes received from the remote
    pub fetched: usize,
    /// Local quotes replaced by the remote collection
    pub discarded: usize,
    /// Quotes successfully pushed back
    pub pushed: usize,
    pub push_failures: Vec<PushFailure>,
    pub finished_at: DateTime<Utc>,
}

impl SyncReport {
    /// Whether every push succeeded
    pub fn is_clean(&self) -> bool {
        self.push_failures.is_empty()
    }
}

/// Outcome of a reconcile request
#[derive(Debug, Clone)]
pub enum SyncOutcome {
    /// The reconcile ran to completion
    Completed(SyncReport),
    /// Another reconcile was in flight; nothing was done
    Skipped,
}

/// Runs reconciles against one remote
pub struct SyncAgent {
    remote: Arc<dyn RemoteCollection>,
    in_flight: AtomicBool,
    status: watch::Sender<SyncStatus>,
    status_rx: watch::Receiver<SyncStatus>,
    last_report: Mutex<Option<SyncReport>>,
}

/// Clears the in-flight flag when a reconcile ends, however it ends
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SyncAgent {
    /// Create an agent for a remote
    pub fn new(remote: Arc<dyn RemoteCollection>) -> Self {
        let (status_tx, status_rx) = watch::channel(SyncStatus::Idle);
        Self {
            remote,
            in_flight: AtomicBool::new(false),
            status: status_tx,
            status_rx,
            last_report: Mutex::new(None),
        }
    }

    /// Remote endpoint
    pub fn endpoint(&self) -> &str {
        self.remote.endpoint()
    }

    /// Current status
    pub fn status(&self) -> SyncStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to status changes
    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatus> {
        self.status_rx.clone()
    }

    /// Report of the last completed reconcile
    pub fn last_report(&self) -> Option<SyncReport> {
        self.last_report
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Fetch the remote collection as quotes
    pub async fn fetch_remote(&self) -> Result<Vec<Quote>, NetworkError> {
        self.remote.fetch().await
    }

    /// Replace the local collection with the remote one, then push it back
    ///
    /// A failed fetch leaves the store untouched. Push failures are
    /// recorded in the report and do not stop the remaining pushes.
    pub async fn reconcile(
        &self,
        store: &mut QuoteStore,
        categories: &mut CategoryIndex,
        trigger: SyncTrigger,
    ) -> Result<SyncOutcome, SyncError> {
        let Some(_guard) = self.try_begin() else {
            debug!(?trigger, "Sync already in progress, skipping");
            return Ok(SyncOutcome::Skipped);
        };

        info!(?trigger, endpoint = self.endpoint(), "Starting sync");
        self.set_status(SyncStatus::Syncing);

        let result = self.run(store, categories, trigger).await;

        match &result {
            Ok(report) => {
                self.set_status(SyncStatus::Idle);
                info!(
                    fetched = report.fetched,
                    pushed = report.pushed,
                    failed = report.push_failures.len(),
                    "Sync complete"
                );
                *self
                    .last_report
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(report.clone());
            }
            Err(e) => {
                self.set_status(SyncStatus::Error);
                warn!("Sync failed: {}", e);
            }
        }

        result.map(SyncOutcome::Completed)
    }

    /// POST each quote to the remote, collecting failures
    pub async fn push_local(&self, quotes: &[Quote]) -> (usize, Vec<PushFailure>) {
        let mut pushed = 0;
        let mut failures = Vec::new();

        for (index, quote) in quotes.iter().enumerate() {
            match self.remote.create(quote).await {
                Ok(()) => pushed += 1,
                Err(e) => {
                    warn!(index, "Failed to push quote: {}", e);
                    failures.push(PushFailure {
                        index,
                        quote: quote.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (pushed, failures)
    }

    async fn run(
        &self,
        store: &mut QuoteStore,
        categories: &mut CategoryIndex,
        trigger: SyncTrigger,
    ) -> Result<SyncReport, SyncError> {
        let remote_quotes = self.fetch_remote().await?;
        let fetched = remote_quotes.len();
        let discarded = store.len();

        store.replace_all(remote_quotes)?;
        categories.refresh(store.quotes());

        let (pushed, push_failures) = self.push_local(store.quotes()).await;

        Ok(SyncReport {
            trigger,
            fetched,
            discarded,
            pushed,
            push_failures,
            finished_at: Utc::now(),
        })
    }

    fn try_begin(&self) -> Option<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard(&self.in_flight))
    }

    fn set_status(&self, status: SyncStatus) {
        let _ = self.status.send(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_quotes;
    use crate::storage::{KeyValueStore, MemoryStore, QUOTES_KEY};
    use crate::sync::MockRemote;

    fn local() -> (Arc<MemoryStore>, QuoteStore, CategoryIndex) {
        let kv = Arc::new(MemoryStore::new());
        let store = QuoteStore::open(kv.clone()).unwrap();
        let categories = CategoryIndex::new(kv.clone(), store.quotes());
        (kv, store, categories)
    }

    fn completed(outcome: SyncOutcome) -> SyncReport {
        match outcome {
            SyncOutcome::Completed(report) => report,
            SyncOutcome::Skipped => panic!("Expected a completed sync"),
        }
    }

    #[tokio::test]
    async fn test_reconcile_replaces_local() {
        let remote = Arc::new(MockRemote::with_records([("A", "X")]));
        let agent = SyncAgent::new(remote.clone());
        let (kv, mut store, mut categories) = local();
        store.add("Local only", "Mine").unwrap();

        let report = completed(
            agent
                .reconcile(&mut store, &mut categories, SyncTrigger::Manual)
                .await
                .unwrap(),
        );

        assert_eq!(store.quotes(), &[Quote::new("X", "A")]);
        assert_eq!(categories.list(), &["A".to_string()]);
        assert_eq!(report.fetched, 1);
        assert_eq!(report.discarded, 4);
        assert_eq!(report.pushed, 1);
        assert!(report.is_clean());

        let persisted: Vec<Quote> =
            serde_json::from_str(&kv.get(QUOTES_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(persisted, vec![Quote::new("X", "A")]);
        assert_eq!(remote.created(), vec![Quote::new("X", "A")]);
        assert_eq!(agent.status(), SyncStatus::Idle);
        assert!(agent.last_report().is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_store_untouched() {
        let remote = Arc::new(MockRemote::unreachable());
        let agent = SyncAgent::new(remote.clone());
        let (kv, mut store, mut categories) = local();

        let err = agent
            .reconcile(&mut store, &mut categories, SyncTrigger::Scheduled)
            .await
            .unwrap_err();

        assert!(matches!(err, SyncError::Network(_)));
        assert_eq!(store.quotes(), seed_quotes().as_slice());
        assert!(kv.get(QUOTES_KEY).unwrap().is_none());
        assert_eq!(remote.post_attempts(), 0);
        assert_eq!(agent.status(), SyncStatus::Error);
        assert!(agent.last_report().is_none());
    }

    #[tokio::test]
    async fn test_push_failures_do_not_stop_remaining_pushes() {
        let remote =
            Arc::new(MockRemote::with_records([("A", "1"), ("B", "2"), ("C", "3")]).failing_posts([0, 1]));
        let agent = SyncAgent::new(remote.clone());
        let (_, mut store, mut categories) = local();

        let report = completed(
            agent
                .reconcile(&mut store, &mut categories, SyncTrigger::Manual)
                .await
                .unwrap(),
        );

        assert_eq!(remote.post_attempts(), 3);
        assert_eq!(report.pushed, 1);
        assert_eq!(report.push_failures.len(), 2);
        assert_eq!(report.push_failures[1].index, 1);
        assert_eq!(report.push_failures[1].quote, Quote::new("2", "B"));
        assert!(!report.is_clean());
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_overlapping_reconcile_is_skipped() {
        let remote = Arc::new(
            MockRemote::with_records([("A", "X")]).with_delay(Duration::from_millis(20)),
        );
        let agent = SyncAgent::new(remote.clone());
        let (_, mut store_a, mut categories_a) = local();
        let (_, mut store_b, mut categories_b) = local();

        let (first, second) = tokio::join!(
            agent.reconcile(&mut store_a, &mut categories_a, SyncTrigger::Manual),
            agent.reconcile(&mut store_b, &mut categories_b, SyncTrigger::Scheduled),
        );

        assert!(matches!(first.unwrap(), SyncOutcome::Completed(_)));
        assert!(matches!(second.unwrap(), SyncOutcome::Skipped));
        assert_eq!(remote.fetch_count(), 1);
        assert_eq!(store_b.quotes(), seed_quotes().as_slice());

        // The guard is released afterwards
        assert_eq!(agent.status(), SyncStatus::Idle);
        let again = agent
            .reconcile(&mut store_b, &mut categories_b, SyncTrigger::Manual)
            .await
            .unwrap();
        assert!(matches!(again, SyncOutcome::Completed(_)));
    }

    #[tokio::test]
    async fn test_status_subscription_sees_changes() {
        let agent = SyncAgent::new(Arc::new(MockRemote::empty()));
        let mut rx = agent.subscribe_status();
        let (_, mut store, mut categories) = local();

        agent
            .reconcile(&mut store, &mut categories, SyncTrigger::Manual)
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), SyncStatus::Idle);
        assert!(store.is_empty());
    }
}
