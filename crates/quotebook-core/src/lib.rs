//! Quotebook Core Library
//!
//! This crate provides the core functionality for Quotebook, a small
//! quote collection with random display, category filtering, JSON
//! export/import and periodic sync with a remote REST collection.
//!
//! # Architecture
//!
//! The display, the key-value persistence substrate and the remote endpoint
//! are reached through traits (`DisplaySurface`, `KeyValueStore`,
//! `RemoteCollection`), so everything here runs headless.
//!
//! # Quick Start
//!
//! ```text
//! let durable = Arc::new(FileStore::open(config.store_dir())?);
//! let mut app = QuoteApp::open(durable, Arc::new(MemoryStore::new()))?;
//!
//! app.add_quote("Stay hungry.", "Motivation", &mut surface).await?;
//! app.show_quote(&mut surface);
//! ```
//!
//! # Modules
//!
//! - `app`: Command handlers (main entry point)
//! - `store`: Quote collection and its persistence
//! - `categories`: Category list and filter selection
//! - `presenter`: Random selection and rendering
//! - `sync`: Remote reconciliation
//! - `transfer`: JSON export/import
//! - `storage`: Key-value persistence
//! - `config`: Application configuration

pub mod app;
pub mod categories;
pub mod config;
pub mod error;
pub mod models;
pub mod presenter;
pub mod storage;
pub mod store;
pub mod sync;
pub mod transfer;

pub use app::QuoteApp;
pub use categories::CategoryIndex;
pub use config::Config;
pub use error::{NetworkError, ParseError, StoreError, SyncError, TransferError, ValidationError};
pub use models::{seed_quotes, CategoryFilter, Quote};
pub use presenter::{DisplaySurface, NoticeLevel, Presenter};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{LoadSource, QuoteStore};
pub use transfer::{export_json, import_json, ExportFile, EXPORT_FILE_NAME};
