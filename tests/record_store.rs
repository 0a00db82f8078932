use chrono::Local;
use portalchat::models::SessionRecord;
use portalchat::store::{
    record_key, FileStore, KeyValueStore, MemoryStore, RecordStore, ACTIVE_PORTAL_KEY,
};
use std::fs;
use tempfile::TempDir;

fn sample_record() -> SessionRecord {
    SessionRecord {
        last_question: Some("What now?".to_string()),
        last_answer: Some("Breathe.".to_string()),
        resume_code: Some("rc-1".to_string()),
        notes: Some("felt calm".to_string()),
        day: 4,
        updated_at: Some(Local::now()),
    }
}

#[test]
fn test_record_round_trips_through_namespaced_keys() {
    let mut records = RecordStore::new(Box::new(MemoryStore::new()));
    let record = sample_record();
    records.save("awakening", &record).unwrap();

    let loaded = records.load("awakening").unwrap();
    assert_eq!(loaded.last_question, record.last_question);
    assert_eq!(loaded.last_answer, record.last_answer);
    assert_eq!(loaded.resume_code, record.resume_code);
    assert_eq!(loaded.notes, record.notes);
    assert_eq!(loaded.day, 4);
    assert_eq!(
        loaded.updated_at.map(|t| t.timestamp()),
        record.updated_at.map(|t| t.timestamp())
    );
}

#[test]
fn test_missing_record_is_none() {
    let records = RecordStore::new(Box::new(MemoryStore::new()));
    assert!(records.load("awakening").is_none());
}

#[test]
fn test_writes_use_portal_prefixed_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");

    let mut records = RecordStore::new(Box::new(FileStore::open(&path).unwrap()));
    records.save("strength", &sample_record()).unwrap();
    records.set_active_portal("strength").unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(
        reopened.get(&record_key("strength", "lastQuestion")),
        Some("What now?".to_string())
    );
    assert_eq!(
        reopened.get("portal.strength.day"),
        Some("4".to_string())
    );
    assert_eq!(reopened.get(ACTIVE_PORTAL_KEY), Some("strength".to_string()));
}

#[test]
fn test_unparsable_day_falls_back_and_large_day_is_clamped() {
    let mut store = MemoryStore::new();
    store.set("portal.a.day", "many").unwrap();
    store.set("portal.b.day", "99").unwrap();
    let records = RecordStore::new(Box::new(store));

    assert_eq!(records.load("a").unwrap().day, 1);
    assert_eq!(records.load("b").unwrap().day, 30);
}

#[test]
fn test_save_removes_cleared_fields() {
    let mut records = RecordStore::new(Box::new(MemoryStore::new()));
    records.save("a", &sample_record()).unwrap();

    let mut record = records.load("a").unwrap();
    record.notes = None;
    records.save("a", &record).unwrap();

    assert_eq!(records.load("a").unwrap().notes, None);
}

#[test]
fn test_remove_only_touches_one_portal() {
    let mut records = RecordStore::new(Box::new(MemoryStore::new()));
    records.save("a", &sample_record()).unwrap();
    records.save("ab", &sample_record()).unwrap();
    records.set_active_portal("a").unwrap();

    records.remove("a").unwrap();

    assert!(records.load("a").is_none());
    assert!(records.load("ab").is_some());
    assert_eq!(records.active_portal(), Some("a".to_string()));
}

#[test]
fn test_clear_removes_everything() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("store.json");

    let mut records = RecordStore::new(Box::new(FileStore::open(&path).unwrap()));
    records.save("a", &sample_record()).unwrap();
    records.set_active_portal("a").unwrap();
    records.clear().unwrap();

    let reopened = RecordStore::new(Box::new(FileStore::open(&path).unwrap()));
    assert!(reopened.load("a").is_none());
    assert!(reopened.active_portal().is_none());
}

#[test]
fn test_corrupt_store_file_starts_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.json");
    fs::write(&path, "{not json").unwrap();

    let mut store = FileStore::open(&path).unwrap();
    assert!(store.keys().is_empty());

    store.set("activePortal", "a").unwrap();
    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("activePortal"), Some("a".to_string()));
}

#[test]
fn test_last_write_wins() {
    let mut records = RecordStore::new(Box::new(MemoryStore::new()));
    let mut first = sample_record();
    first.last_answer = Some("first".to_string());
    let mut second = sample_record();
    second.last_answer = Some("second".to_string());

    records.save("a", &first).unwrap();
    records.save("a", &second).unwrap();

    assert_eq!(
        records.load("a").unwrap().last_answer,
        Some("second".to_string())
    );
}

#[test]
fn test_failed_write_leaves_store_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    fs::write(&blocker, "a plain file").unwrap();

    // parent directory cannot be created because `blocker` is a file
    let mut store = FileStore::open(blocker.join("store.json")).unwrap();

    assert!(store.set("activePortal", "a").is_err());
    assert_eq!(store.get("activePortal"), None);
    assert!(store.keys().is_empty());
}
