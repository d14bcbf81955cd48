//! Storage layer
//!
//! Persistence goes through the [`KeyValueStore`] trait so the rest of the
//! crate never touches the filesystem directly.
//!
//! ## Keys
//!
//! - `quotes`: JSON array of quotes (durable)
//! - `selectedCategory`: last category filter (durable)
//! - `lastQuote`: last rendered quote (session)
//! - `quotes.corrupt`: raw copy of an unreadable `quotes` value

pub mod error;
pub mod kv;

pub use error::{StorageError, StorageResult};
pub use kv::{FileStore, KeyValueStore, MemoryStore};

/// Durable key holding the quote collection
pub const QUOTES_KEY: &str = "quotes";

/// Durable key holding the selected category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";

/// Session key holding the last rendered quote
pub const LAST_QUOTE_KEY: &str = "lastQuote";

/// Durable key receiving a copy of malformed `quotes` data
pub const CORRUPT_BACKUP_KEY: &str = "quotes.corrupt";
