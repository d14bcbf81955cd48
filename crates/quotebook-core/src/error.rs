//! Error types
//!
//! Leaf errors (validation, parse, network) plus the composites returned by
//! store, transfer and sync operations. Storage errors live in
//! [`crate::storage::error`].

use thiserror::Error;

use crate::storage::StorageError;

/// A manually entered quote was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Quote text is empty after trimming
    #[error("Quote text must not be empty")]
    EmptyText,
    /// Category is empty after trimming
    #[error("Quote category must not be empty")]
    EmptyCategory,
}

/// Input could not be parsed as a JSON array of quotes
///
/// `message` is serde_json's text, which already ends with the position.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid quotes file: {message}")]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub message: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}

/// Talking to the remote collection failed
#[derive(Error, Debug)]
pub enum NetworkError {
    /// The request could not be sent or timed out
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status
    #[error("Remote {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// The response body was not the expected JSON
    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Errors from mutating the quote store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from importing a quotes file
#[derive(Error, Debug)]
pub enum TransferError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors from a reconcile run
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Sync failed: {0}")]
    Network(#[from] NetworkError),

    #[error("Sync could not persist remote quotes: {0}")]
    Storage(#[from] StorageError),
}
