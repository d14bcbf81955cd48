//! Quote storage
//!
//! The `QuoteStore` owns the in-memory quote collection and writes the whole
//! collection to the durable key-value store after every mutation.
//!
//! ## Loading
//!
//! On open the `quotes` key is read:
//! - missing: the three seed quotes are used
//! - malformed: the raw value is copied to `quotes.corrupt`, a warning is
//!   logged and the seed is used
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = QuoteStore::open(Arc::new(FileStore::open(dir)?))?;
//! store.add("Stay hungry.", "Motivation")?;
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{StoreError, ValidationError};
use crate::models::{seed_quotes, Quote};
use crate::storage::{KeyValueStore, StorageResult, CORRUPT_BACKUP_KEY, QUOTES_KEY};

/// Where the collection came from when the store was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Read from the durable store
    Persisted,
    /// Nothing was stored yet; seed quotes in use
    Seed,
    /// Stored data was unreadable; seed quotes in use, raw data backed up
    RecoveredFromCorrupt { backup_key: String, details: String },
}

/// Owner of the quote collection
pub struct QuoteStore {
    quotes: Vec<Quote>,
    kv: Arc<dyn KeyValueStore>,
    source: LoadSource,
}

impl QuoteStore {
    /// Open the store, loading persisted quotes or falling back to the seed
    pub fn open(kv: Arc<dyn KeyValueStore>) -> StorageResult<Self> {
        let (quotes, source) = load(kv.as_ref())?;
        info!(count = quotes.len(), source = ?source, "Opened quote store");
        Ok(Self { quotes, kv, source })
    }

    /// All quotes in insertion order
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Number of quotes
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    /// How the collection was obtained at open time
    pub fn load_source(&self) -> &LoadSource {
        &self.source
    }

    /// Validate and append a quote entered by the user
    ///
    /// Both fields are trimmed. If persisting fails the quote is not kept.
    pub fn add(&mut self, text: &str, category: &str) -> Result<Quote, StoreError> {
        let quote = validate(text, category)?;

        self.quotes.push(quote.clone());
        if let Err(e) = self.save() {
            self.quotes.pop();
            return Err(e.into());
        }

        debug!(category = %quote.category, "Added quote");
        Ok(quote)
    }

    /// Replace the whole collection, then persist
    pub fn replace_all(&mut self, quotes: Vec<Quote>) -> StorageResult<()> {
        let previous = std::mem::replace(&mut self.quotes, quotes);
        if let Err(e) = self.save() {
            self.quotes = previous;
            return Err(e);
        }
        debug!(
            discarded = previous.len(),
            kept = self.quotes.len(),
            "Replaced quote collection"
        );
        Ok(())
    }

    /// Append externally supplied quotes without de-duplication, then persist
    pub fn import_merge(&mut self, quotes: Vec<Quote>) -> StorageResult<usize> {
        let added = quotes.len();
        let before = self.quotes.len();
        self.quotes.extend(quotes);
        if let Err(e) = self.save() {
            self.quotes.truncate(before);
            return Err(e);
        }

        let incomplete = self.quotes[before..]
            .iter()
            .filter(|q| !q.is_complete())
            .count();
        if incomplete > 0 {
            warn!(incomplete, "Imported quotes with empty text or category");
        }
        debug!(added, total = self.quotes.len(), "Merged imported quotes");
        Ok(added)
    }

    /// Write the full collection to the durable store
    pub fn save(&self) -> StorageResult<()> {
        let json = serde_json::to_string(&self.quotes)?;
        self.kv.set(QUOTES_KEY, &json)
    }
}

/// Check a user-entered pair, returning the trimmed quote
pub fn validate(text: &str, category: &str) -> Result<Quote, ValidationError> {
    let text = text.trim();
    let category = category.trim();

    if text.is_empty() {
        return Err(ValidationError::EmptyText);
    }
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }

    Ok(Quote::new(text, category))
}

fn load(kv: &dyn KeyValueStore) -> StorageResult<(Vec<Quote>, LoadSource)> {
    let Some(raw) = kv.get(QUOTES_KEY)? else {
        return Ok((seed_quotes(), LoadSource::Seed));
    };

    match serde_json::from_str::<Vec<Quote>>(&raw) {
        Ok(quotes) => Ok((quotes, LoadSource::Persisted)),
        Err(e) => {
            warn!(
                "Stored quotes are unreadable ({}); backing up to '{}' and using seed quotes",
                e, CORRUPT_BACKUP_KEY
            );
            // Losing the backup must not keep the app from starting
            if let Err(backup_err) = kv.set(CORRUPT_BACKUP_KEY, &raw) {
                warn!("Could not back up unreadable quotes: {}", backup_err);
            }
            Ok((
                seed_quotes(),
                LoadSource::RecoveredFromCorrupt {
                    backup_key: CORRUPT_BACKUP_KEY.to_string(),
                    details: e.to_string(),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStore, MemoryStore, StorageError};
    use tempfile::TempDir;

    fn memory_store() -> (Arc<MemoryStore>, QuoteStore) {
        let kv = Arc::new(MemoryStore::new());
        let store = QuoteStore::open(kv.clone()).unwrap();
        (kv, store)
    }

    fn persisted(kv: &MemoryStore) -> Vec<Quote> {
        serde_json::from_str(&kv.get(QUOTES_KEY).unwrap().unwrap()).unwrap()
    }

    /// Store whose writes always fail, optionally holding a `quotes` value
    #[derive(Default)]
    struct ReadOnlyStore {
        quotes: Option<&'static str>,
    }

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self
                .quotes
                .filter(|_| key == QUOTES_KEY)
                .map(str::to_string))
        }

        fn set(&self, key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Write {
                key: key.to_string(),
                path: format!("/read-only/{}.json", key).into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_open_empty_uses_seed() {
        let (kv, store) = memory_store();
        assert_eq!(store.len(), 3);
        assert_eq!(*store.load_source(), LoadSource::Seed);
        // Opening does not write anything
        assert!(kv.is_empty());
    }

    #[test]
    fn test_add_appends_and_persists() {
        let (kv, mut store) = memory_store();

        let quote = store.add("  Stay hungry.  ", " Motivation ").unwrap();
        assert_eq!(quote, Quote::new("Stay hungry.", "Motivation"));
        assert_eq!(store.len(), 4);
        assert_eq!(persisted(&kv), store.quotes());
    }

    #[test]
    fn test_add_rejects_blank_fields() {
        let (kv, mut store) = memory_store();

        for (text, category, expected) in [
            ("", "Life", ValidationError::EmptyText),
            ("   ", "Life", ValidationError::EmptyText),
            ("Some text", "", ValidationError::EmptyCategory),
            ("Some text", "\t\n", ValidationError::EmptyCategory),
        ] {
            let err = store.add(text, category).unwrap_err();
            assert!(matches!(err, StoreError::Validation(v) if v == expected));
        }

        assert_eq!(store.len(), 3);
        assert!(kv.get(QUOTES_KEY).unwrap().is_none());
    }

    #[test]
    fn test_add_rolls_back_when_save_fails() {
        let mut store = QuoteStore::open(Arc::new(ReadOnlyStore::default())).unwrap();

        let err = store.add("text", "category").unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_replace_all() {
        let (kv, mut store) = memory_store();

        store.replace_all(vec![Quote::new("X", "A")]).unwrap();
        assert_eq!(store.quotes(), &[Quote::new("X", "A")]);
        assert_eq!(persisted(&kv), vec![Quote::new("X", "A")]);
    }

    #[test]
    fn test_replace_all_failure_keeps_previous() {
        let mut store = QuoteStore::open(Arc::new(ReadOnlyStore::default())).unwrap();

        assert!(store.replace_all(Vec::new()).is_err());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_import_merge_keeps_duplicates() {
        let (kv, mut store) = memory_store();
        let first = store.quotes()[0].clone();

        let added = store
            .import_merge(vec![first.clone(), Quote::new("New", "Life")])
            .unwrap();

        assert_eq!(added, 2);
        assert_eq!(store.len(), 5);
        assert_eq!(store.quotes()[3], first);
        assert_eq!(persisted(&kv).len(), 5);
    }

    #[test]
    fn test_reopen_loads_persisted() {
        let temp_dir = TempDir::new().unwrap();
        let kv: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(temp_dir.path()).unwrap());

        {
            let mut store = QuoteStore::open(kv.clone()).unwrap();
            store.add("Persisted", "Test").unwrap();
        }

        let store = QuoteStore::open(kv).unwrap();
        assert_eq!(*store.load_source(), LoadSource::Persisted);
        assert_eq!(store.len(), 4);
        assert_eq!(store.quotes()[3], Quote::new("Persisted", "Test"));
    }

    #[test]
    fn test_corrupt_data_falls_back_to_seed_with_backup() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(QUOTES_KEY, "{not json").unwrap();

        let store = QuoteStore::open(kv.clone()).unwrap();

        assert_eq!(store.quotes(), seed_quotes().as_slice());
        assert!(matches!(
            store.load_source(),
            LoadSource::RecoveredFromCorrupt { backup_key, .. } if backup_key == CORRUPT_BACKUP_KEY
        ));
        assert_eq!(
            kv.get(CORRUPT_BACKUP_KEY).unwrap().as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_corrupt_data_on_read_only_store_still_opens() {
        let kv = ReadOnlyStore {
            quotes: Some("{not json"),
        };

        let store = QuoteStore::open(Arc::new(kv)).unwrap();

        assert_eq!(store.quotes(), seed_quotes().as_slice());
        assert!(matches!(
            store.load_source(),
            LoadSource::RecoveredFromCorrupt { .. }
        ));
    }

    #[test]
    fn test_persisted_empty_collection_is_respected() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(QUOTES_KEY, "[]").unwrap();

        let store = QuoteStore::open(kv).unwrap();
        assert!(store.is_empty());
        assert_eq!(*store.load_source(), LoadSource::Persisted);
    }
}
