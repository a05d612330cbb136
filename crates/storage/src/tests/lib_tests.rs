use super::*;

#[tokio::test]
async fn absent_slot_reads_as_none() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let value = storage.read_slot("donations").await.expect("read");
    assert_eq!(value, None);
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn write_overwrites_previous_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.write_slot("donations", "[]").await.expect("first write");
    storage
        .write_slot("donations", r#"[{"charityName":"A"}]"#)
        .await
        .expect("second write");

    let value = storage.read_slot("donations").await.expect("read");
    assert_eq!(value.as_deref(), Some(r#"[{"charityName":"A"}]"#));
    assert_eq!(
        storage.list_slot_keys().await.expect("keys"),
        vec!["donations".to_string()]
    );
}

#[tokio::test]
async fn remove_slot_forgets_value() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.write_slot("volunteerLogs", "[]").await.expect("write");
    storage.remove_slot("volunteerLogs").await.expect("remove");
    assert_eq!(storage.read_slot("volunteerLogs").await.expect("read"), None);
}

#[tokio::test]
async fn quota_counts_other_slots_and_rejects_oversized_writes() {
    let storage = Storage::new("sqlite::memory:")
        .await
        .expect("db")
        .with_quota(Some(40));
    storage.write_slot("a", "0123456789").await.expect("fits");

    let err = storage
        .write_slot("b", "0123456789012345678901234567890")
        .await
        .expect_err("over quota");
    assert!(matches!(err, StorageError::QuotaExceeded { quota: 40, .. }));
    assert_eq!(storage.read_slot("b").await.expect("read"), None);

    // Rewriting the same slot only charges the new value.
    storage
        .write_slot("a", "0123456789012345678901234")
        .await
        .expect("rewrite fits");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("forms.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.write_slot("eventSignups", "[]").await.expect("write");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    let reopened = Storage::new(&database_url).await.expect("reopen");
    assert_eq!(
        reopened.read_slot("eventSignups").await.expect("read").as_deref(),
        Some("[]")
    );
}

#[test]
fn sqlite_path_ignores_memory_and_query_string() {
    assert_eq!(sqlite_path("sqlite::memory:"), None);
    assert_eq!(
        sqlite_path("sqlite://./data/forms.db?mode=rwc"),
        Some(PathBuf::from("./data/forms.db"))
    );
    assert_eq!(sqlite_path("postgres://localhost/db"), None);
    assert_eq!(
        sqlite_path("sqlite:///var/lib/forms.db"),
        Some(PathBuf::from("/var/lib/forms.db"))
    );
    assert_eq!(sqlite_path("sqlite:forms.db"), Some(PathBuf::from("forms.db")));
    assert_eq!(sqlite_path("sqlite://"), None);
}

#[tokio::test]
async fn memory_slots_enforce_quota() {
    let slots = MemorySlots::with_quota(12);
    slots.write_slot("k", "12345").await.expect("fits");
    let err = slots
        .write_slot("other", "123456789")
        .await
        .expect_err("over quota");
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));
    assert_eq!(slots.raw("k").as_deref(), Some("12345"));
    assert_eq!(slots.raw("other"), None);
}
