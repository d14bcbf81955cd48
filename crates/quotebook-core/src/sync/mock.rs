//! In-memory remote collection
//!
//! Stands in for the HTTP remote in tests and offline runs. It can simulate
//! latency, an unreachable server, and individual POST failures.

use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use super::remote::{RemoteCollection, RemoteRecord};
use crate::error::NetworkError;
use crate::models::Quote;

const MOCK_ENDPOINT: &str = "memory://quotes";

/// Remote collection held in memory
pub struct MockRemote {
    records: Vec<RemoteRecord>,
    delay: Duration,
    fail_fetch: bool,
    fail_posts: HashSet<usize>,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    fetches: usize,
    post_attempts: usize,
    created: Vec<Quote>,
}

impl MockRemote {
    /// Remote serving the given `(title, body)` records
    pub fn with_records<I, T, B>(records: I) -> Self
    where
        I: IntoIterator<Item = (T, B)>,
        T: Into<String>,
        B: Into<String>,
    {
        Self {
            records: records
                .into_iter()
                .map(|(title, body)| RemoteRecord {
                    title: title.into(),
                    body: body.into(),
                })
                .collect(),
            delay: Duration::ZERO,
            fail_fetch: false,
            fail_posts: HashSet::new(),
            state: Mutex::new(MockState::default()),
        }
    }

    /// Remote with no records
    pub fn empty() -> Self {
        Self::with_records(Vec::<(String, String)>::new())
    }

    /// Remote whose fetch always fails
    pub fn unreachable() -> Self {
        Self {
            fail_fetch: true,
            ..Self::empty()
        }
    }

    /// Delay every call by `delay`
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Fail the POST attempts at the given zero-based positions
    pub fn failing_posts(mut self, positions: impl IntoIterator<Item = usize>) -> Self {
        self.fail_posts = positions.into_iter().collect();
        self
    }

    /// Quotes successfully created so far
    pub fn created(&self) -> Vec<Quote> {
        self.lock().created.clone()
    }

    /// Number of fetch calls
    pub fn fetch_count(&self) -> usize {
        self.lock().fetches
    }

    /// Number of POST attempts, successful or not
    pub fn post_attempts(&self) -> usize {
        self.lock().post_attempts
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl RemoteCollection for MockRemote {
    fn endpoint(&self) -> &str {
        MOCK_ENDPOINT
    }

    async fn fetch(&self) -> Result<Vec<Quote>, NetworkError> {
        self.lock().fetches += 1;
        self.simulate_latency().await;

        if self.fail_fetch {
            return Err(NetworkError::Status {
                url: MOCK_ENDPOINT.to_string(),
                status: 503,
            });
        }
        Ok(self.records.iter().cloned().map(Quote::from).collect())
    }

    async fn create(&self, quote: &Quote) -> Result<(), NetworkError> {
        let attempt = {
            let mut state = self.lock();
            state.post_attempts += 1;
            state.post_attempts - 1
        };
        self.simulate_latency().await;

        if self.fail_posts.contains(&attempt) {
            return Err(NetworkError::Status {
                url: MOCK_ENDPOINT.to_string(),
                status: 500,
            });
        }
        self.lock().created.push(quote.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_fetch_maps_records() {
        let remote = MockRemote::with_records([("A", "X"), ("B", "Y")]);
        let quotes = remote.fetch().await.unwrap();
        assert_eq!(quotes, vec![Quote::new("X", "A"), Quote::new("Y", "B")]);
        assert_eq!(remote.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_unreachable() {
        let remote = MockRemote::unreachable();
        assert!(matches!(
            remote.fetch().await,
            Err(NetworkError::Status { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn test_mock_failing_posts() {
        let remote = MockRemote::empty().failing_posts([1]);
        let quote = Quote::new("X", "A");

        assert!(remote.create(&quote).await.is_ok());
        assert!(remote.create(&quote).await.is_err());
        assert!(remote.create(&quote).await.is_ok());

        assert_eq!(remote.post_attempts(), 3);
        assert_eq!(remote.created().len(), 2);
    }
}
