//! JSON export and import
//!
//! Export produces a 2-space indented JSON array of `{text, category}`
//! records named `quotes.json`. Import parses the same shape and merges the
//! records into the store.

use std::io;
use std::path::Path;

use crate::error::{ParseError, TransferError};
use crate::models::Quote;
use crate::storage::kv::atomic_write;
use crate::store::QuoteStore;

/// File name offered for exports
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// An export ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Write the export to `path` atomically
    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        atomic_write(path, &self.bytes)
    }
}

/// Serialize a collection for download
pub fn export_json(quotes: &[Quote]) -> serde_json::Result<ExportFile> {
    let mut bytes = serde_json::to_vec_pretty(quotes)?;
    bytes.push(b'\n');
    Ok(ExportFile {
        file_name: EXPORT_FILE_NAME,
        bytes,
    })
}

/// Parse an uploaded file as a JSON array of quotes
pub fn import_json(bytes: &[u8]) -> Result<Vec<Quote>, ParseError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse an uploaded file and merge it into the store
///
/// The store is left unchanged when parsing fails.
pub fn import_into(store: &mut QuoteStore, bytes: &[u8]) -> Result<usize, TransferError> {
    let quotes = import_json(bytes)?;
    Ok(store.import_merge(quotes)?)
}
