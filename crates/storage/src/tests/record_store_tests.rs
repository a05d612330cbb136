use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::*;
use crate::{MemorySlots, Storage, TracingDiagnostics};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    name: String,
    amount: f64,
}

fn entry(name: &str, amount: f64) -> Entry {
    Entry {
        name: name.to_string(),
        amount,
    }
}

#[derive(Default)]
struct RecordingDiagnostics {
    seen: Mutex<Vec<(String, String)>>,
}

impl RecordingDiagnostics {
    fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().expect("diagnostics lock").clone()
    }
}

impl Diagnostics for RecordingDiagnostics {
    fn discarded_slot(&self, key: &str, reason: &str) {
        self.seen
            .lock()
            .expect("diagnostics lock")
            .push((key.to_string(), reason.to_string()));
    }
}

async fn open(slots: &Arc<MemorySlots>) -> RecordStore<Entry> {
    RecordStore::open(slots.clone(), "entries", Arc::new(TracingDiagnostics))
        .await
        .expect("open")
}

#[tokio::test]
async fn absent_slot_opens_empty_without_diagnostics() {
    let slots = Arc::new(MemorySlots::new());
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let store: RecordStore<Entry> = RecordStore::open(slots, "entries", diagnostics.clone())
        .await
        .expect("open");
    assert!(store.is_empty());
    assert!(diagnostics.seen().is_empty());
}

#[tokio::test]
async fn null_slot_opens_empty() {
    let slots = Arc::new(MemorySlots::new());
    slots.insert_raw("entries", "null");
    let store = open(&slots).await;
    assert!(store.is_empty());
}

#[tokio::test]
async fn corrupt_slot_opens_empty_and_reports() {
    let slots = Arc::new(MemorySlots::new());
    slots.insert_raw("entries", "{not json");
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let store: RecordStore<Entry> =
        RecordStore::open(slots.clone(), "entries", diagnostics.clone())
            .await
            .expect("open");

    assert!(store.is_empty());
    let seen = diagnostics.seen();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "entries");
    assert!(seen[0].1.starts_with("unparsable json"), "{}", seen[0].1);
    // Nothing is written until the next mutation.
    assert_eq!(slots.raw("entries").as_deref(), Some("{not json"));
}

#[tokio::test]
async fn wrongly_shaped_slot_opens_empty_and_reports() {
    let slots = Arc::new(MemorySlots::new());
    slots.insert_raw("entries", r#"{"name":"solo","amount":1}"#);
    let diagnostics = Arc::new(RecordingDiagnostics::default());
    let store: RecordStore<Entry> = RecordStore::open(slots, "entries", diagnostics.clone())
        .await
        .expect("open");

    assert!(store.is_empty());
    assert!(diagnostics.seen()[0].1.starts_with("unexpected shape"));
}

#[tokio::test]
async fn entries_filled_in_on_load_are_written_back_once() {
    let slots = Arc::new(MemorySlots::new());
    slots.insert_raw("entries", r#"[{"name":"a","amount":1}]"#);

    let store = open(&slots).await;
    assert_eq!(store.records(), &[entry("a", 1.0)]);
    assert_eq!(
        slots.raw("entries").as_deref(),
        Some(r#"[{"name":"a","amount":1.0}]"#)
    );

    // Canonical contents are left as they are.
    slots.insert_raw("entries", r#"[{"name":"b","amount":2.5}]"#);
    let store = open(&slots).await;
    assert_eq!(store.len(), 1);
    assert_eq!(
        slots.raw("entries").as_deref(),
        Some(r#"[{"name":"b","amount":2.5}]"#)
    );
}

#[tokio::test]
async fn append_persists_whole_sequence_in_order() {
    let slots = Arc::new(MemorySlots::new());
    let mut store = open(&slots).await;
    store.append(entry("first", 100.0)).await.expect("append");
    store.append(entry("second", 50.0)).await.expect("append");

    let persisted: Vec<Entry> =
        serde_json::from_str(&slots.raw("entries").expect("slot")).expect("json");
    assert_eq!(persisted, store.records());

    let reopened = open(&slots).await;
    assert_eq!(reopened.records(), &[entry("first", 100.0), entry("second", 50.0)]);
}

#[tokio::test]
async fn delete_at_removes_one_and_ignores_out_of_range() {
    let slots = Arc::new(MemorySlots::new());
    let mut store = open(&slots).await;
    store.append(entry("a", 1.0)).await.expect("append");
    store.append(entry("b", 2.0)).await.expect("append");

    assert_eq!(store.delete_at(5).await.expect("delete"), None);
    assert_eq!(store.len(), 2);

    let removed = store.delete_at(0).await.expect("delete");
    assert_eq!(removed, Some(entry("a", 1.0)));
    assert_eq!(open(&slots).await.records(), &[entry("b", 2.0)]);
}

#[tokio::test]
async fn delete_first_only_removes_first_duplicate() {
    let slots = Arc::new(MemorySlots::new());
    let mut store = open(&slots).await;
    store.append(entry("dup", 1.0)).await.expect("append");
    store.append(entry("other", 2.0)).await.expect("append");
    store.append(entry("dup", 3.0)).await.expect("append");

    let removed = store
        .delete_first(|e| e.name == "dup")
        .await
        .expect("delete");
    assert_eq!(removed, Some((0, entry("dup", 1.0))));
    assert_eq!(store.records(), &[entry("other", 2.0), entry("dup", 3.0)]);

    let missing = store
        .delete_first(|e| e.name == "nobody")
        .await
        .expect("delete");
    assert_eq!(missing, None);
}

#[tokio::test]
async fn failed_persist_rolls_back_memory_and_keeps_slot() {
    let slots = Arc::new(MemorySlots::with_quota(60));
    let mut store = open(&slots).await;
    store.append(entry("a", 1.0)).await.expect("append");
    let before = slots.raw("entries");

    let err = store
        .append(entry(&"x".repeat(80), 2.0))
        .await
        .expect_err("quota");
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    assert_eq!(store.records(), &[entry("a", 1.0)]);
    assert_eq!(slots.raw("entries"), before);
}

#[tokio::test]
async fn overwrite_and_clear_replace_sequence() {
    let slots = Arc::new(MemorySlots::new());
    let mut store = open(&slots).await;
    store.append(entry("a", 1.0)).await.expect("append");

    store
        .overwrite(vec![entry("x", 9.0), entry("y", 8.0)])
        .await
        .expect("overwrite");
    assert_eq!(open(&slots).await.len(), 2);

    store.clear().await.expect("clear");
    assert!(store.is_empty());
    assert_eq!(slots.raw("entries").as_deref(), Some("[]"));
}

#[tokio::test]
async fn round_trips_through_sqlite_slots() {
    let storage: Arc<dyn SlotStore> = Arc::new(Storage::new("sqlite::memory:").await.expect("db"));
    let mut store: RecordStore<Entry> =
        RecordStore::open(storage.clone(), "entries", Arc::new(TracingDiagnostics))
            .await
            .expect("open");
    store.append(entry("a", 10.5)).await.expect("append");
    store.append(entry("b", 0.25)).await.expect("append");

    let reopened: RecordStore<Entry> =
        RecordStore::open(storage, "entries", Arc::new(TracingDiagnostics))
            .await
            .expect("reopen");
    assert_eq!(reopened.records(), store.records());
}
