//! Storage errors
//!
//! Every failure names the key being read or written, so a message like
//! "Cannot save 'quotes'" tells the user which part of their data is at risk.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing a stored value
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store directory could not be created
    #[error("Cannot create quote store at '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A stored value exists but could not be read
    #[error("Cannot read saved '{key}' from '{path}': {source}")]
    Read {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A value could not be saved or removed
    #[error("Cannot save '{key}' to '{path}': {source}")]
    Write {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Key contains characters that cannot name a file
    #[error("'{0}' is not a valid storage key")]
    InvalidKey(String),

    /// Value could not be encoded as JSON
    #[error("Cannot encode value as JSON: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StorageError {
    /// The underlying I/O error kind, if any
    fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            StorageError::CreateDirectory { source, .. }
            | StorageError::Read { source, .. }
            | StorageError::Write { source, .. } => Some(source.kind()),
            StorageError::InvalidKey(_) | StorageError::Encode(_) => None,
        }
    }

    /// A hint for the user, when there is something they can do
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        if self.io_kind() == Some(io::ErrorKind::PermissionDenied) {
            return Some(
                "Make the data directory writable, or point data_dir elsewhere with \
                 `quotebook config set data_dir <path>`.",
            );
        }
        match self {
            StorageError::CreateDirectory { .. } => {
                Some("Check that data_dir points to a location you can create folders in.")
            }
            _ => None,
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn write_error(kind: io::ErrorKind) -> StorageError {
        StorageError::Write {
            key: "quotes".to_string(),
            path: PathBuf::from("/data/store/quotes.json"),
            source: io::Error::new(kind, "boom"),
        }
    }

    #[test]
    fn test_permission_denied_suggests_data_dir() {
        let hint = write_error(io::ErrorKind::PermissionDenied)
            .recovery_suggestion()
            .unwrap();
        assert!(hint.contains("data_dir"));
    }

    #[test]
    fn test_plain_failures_have_no_suggestion() {
        assert!(write_error(io::ErrorKind::Other).recovery_suggestion().is_none());
        assert!(StorageError::InvalidKey("a/b".to_string())
            .recovery_suggestion()
            .is_none());
    }

    #[test]
    fn test_message_names_the_key() {
        let msg = write_error(io::ErrorKind::Other).to_string();
        assert!(msg.contains("Cannot save 'quotes'"));
        assert!(msg.contains("/data/store/quotes.json"));
    }
}
