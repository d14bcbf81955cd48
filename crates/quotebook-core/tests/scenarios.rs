//! End-to-end scenarios over file-backed storage and an in-memory remote.

use std::sync::Arc;

use quotebook_core::storage::QUOTES_KEY;
use quotebook_core::sync::{MockRemote, SyncAgent, SyncOutcome, SyncTrigger};
use quotebook_core::{
    export_json, import_json, CategoryIndex, FileStore, KeyValueStore, Quote, QuoteStore,
    StoreError, TransferError,
};
use tempfile::TempDir;

fn file_store(temp_dir: &TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::open(temp_dir.path().join("store")).unwrap())
}

#[test]
fn seed_plus_add_yields_three_categories() {
    let temp_dir = TempDir::new().unwrap();
    let kv = file_store(&temp_dir);
    let mut store = QuoteStore::open(kv.clone()).unwrap();
    assert_eq!(store.len(), 3);

    store.add("Stay hungry.", "Motivation").unwrap();

    assert_eq!(store.len(), 4);
    let index = CategoryIndex::new(kv, store.quotes());
    assert_eq!(index.list(), &["Inspiration", "Life", "Motivation"]);
}

#[test]
fn add_is_visible_after_reopen() {
    let temp_dir = TempDir::new().unwrap();

    {
        let mut store = QuoteStore::open(file_store(&temp_dir)).unwrap();
        store.add("Persist me", "Test").unwrap();
    }

    let store = QuoteStore::open(file_store(&temp_dir)).unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.quotes().last(), Some(&Quote::new("Persist me", "Test")));
}

#[test]
fn blank_input_is_rejected_without_touching_disk() {
    let temp_dir = TempDir::new().unwrap();
    let kv = file_store(&temp_dir);
    let mut store = QuoteStore::open(kv.clone()).unwrap();

    let err = store.add("   ", "Life").unwrap_err();

    assert!(matches!(err, StoreError::Validation(_)));
    assert_eq!(store.len(), 3);
    assert!(kv.get(QUOTES_KEY).unwrap().is_none());
}

#[test]
fn export_then_import_appends() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = QuoteStore::open(file_store(&temp_dir)).unwrap();
    store.add("Stay hungry.", "Motivation").unwrap();
    let before = store.quotes().to_vec();

    let exported = vec![Quote::new("X", "A"), Quote::new("Y", "B")];
    let file = export_json(&exported).unwrap();
    let imported = import_json(&file.bytes).unwrap();
    store.import_merge(imported).unwrap();

    let mut expected = before;
    expected.extend(exported);
    assert_eq!(store.quotes(), expected.as_slice());
}

#[test]
fn malformed_import_leaves_collection() {
    let temp_dir = TempDir::new().unwrap();
    let mut store = QuoteStore::open(file_store(&temp_dir)).unwrap();
    let before = store.quotes().to_vec();

    let err = quotebook_core::transfer::import_into(&mut store, b"{not json").unwrap_err();

    assert!(matches!(err, TransferError::Parse(_)));
    assert_eq!(store.quotes(), before.as_slice());
}

#[tokio::test]
async fn reconcile_replaces_local_with_remote() {
    let temp_dir = TempDir::new().unwrap();
    let kv = file_store(&temp_dir);
    let mut store = QuoteStore::open(kv.clone()).unwrap();
    store.add("Only here", "Local").unwrap();
    let mut categories = CategoryIndex::new(kv.clone(), store.quotes());

    let remote = Arc::new(MockRemote::with_records([("A", "X")]));
    let agent = SyncAgent::new(remote.clone());

    let outcome = agent
        .reconcile(&mut store, &mut categories, SyncTrigger::Scheduled)
        .await
        .unwrap();

    assert!(matches!(outcome, SyncOutcome::Completed(_)));
    assert_eq!(store.quotes(), &[Quote::new("X", "A")]);
    assert_eq!(categories.list(), &["A"]);

    // The replacement survives a restart
    let reopened = QuoteStore::open(kv).unwrap();
    assert_eq!(reopened.quotes(), &[Quote::new("X", "A")]);
    assert_eq!(remote.created(), vec![Quote::new("X", "A")]);
}
