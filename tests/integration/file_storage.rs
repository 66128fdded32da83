//! Integration tests for the file-backed persistence adapter.
//!
//! Each test runs against its own temporary directory.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use todolist::persistence::{FileStorage, PersistenceAdapter, PersistenceError};
use todolist::tasks::{LoadWarning, TaskListStore};

fn temp_storage() -> (tempfile::TempDir, FileStorage) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let storage = FileStorage::new(dir.path().join("data"));
    (dir, storage)
}

#[test]
fn missing_file_loads_as_none() {
    let (_dir, storage) = temp_storage();
    assert_eq!(storage.load("tasks").unwrap(), None);
}

#[test]
fn save_creates_directory_and_file() {
    let (dir, storage) = temp_storage();
    storage.save("tasks", "[]").unwrap();
    let path = dir.path().join("data").join("tasks.json");
    assert_eq!(std::fs::read_to_string(path).unwrap(), "[]");
}

#[test]
fn save_then_load_round_trips() {
    let (_dir, storage) = temp_storage();
    storage.save("tasks", r#"[{"id":1,"name":"a","isCompleted":false}]"#).unwrap();
    assert_eq!(
        storage.load("tasks").unwrap().as_deref(),
        Some(r#"[{"id":1,"name":"a","isCompleted":false}]"#)
    );
}

#[test]
fn save_replaces_whole_value_and_leaves_no_temp_file() {
    let (dir, storage) = temp_storage();
    storage.save("tasks", "a much longer first value").unwrap();
    storage.save("tasks", "short").unwrap();
    assert_eq!(storage.load("tasks").unwrap().as_deref(), Some("short"));

    let entries: Vec<_> = std::fs::read_dir(dir.path().join("data"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, ["tasks.json"]);
}

#[test]
fn keys_map_to_separate_files() {
    let (_dir, storage) = temp_storage();
    storage.save("home", "1").unwrap();
    storage.save("work", "2").unwrap();
    assert_eq!(storage.load("home").unwrap().as_deref(), Some("1"));
    assert_eq!(storage.load("work").unwrap().as_deref(), Some("2"));
}

#[test]
fn path_traversal_keys_are_rejected() {
    let (_dir, storage) = temp_storage();
    assert!(matches!(
        storage.save("../outside", "x"),
        Err(PersistenceError::InvalidKey(_))
    ));
}

#[test]
fn unreadable_slot_reports_io_error() {
    let (dir, storage) = temp_storage();
    // A directory where the slot file should be cannot be read as a string.
    std::fs::create_dir_all(dir.path().join("data").join("tasks.json")).unwrap();
    assert!(matches!(
        storage.load("tasks"),
        Err(PersistenceError::Io { .. })
    ));
}

#[test]
fn store_persists_across_sessions_on_disk() {
    let (_dir, storage) = temp_storage();
    let id = {
        let mut store = TaskListStore::new(storage.clone());
        store.set_draft_name("Water plants");
        let id = store.add_task().unwrap();
        store.toggle_completion(id).unwrap();
        id
    };

    let store = TaskListStore::new(storage.clone());
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(store.tasks()[0].id, id);
    assert_eq!(store.tasks()[0].name, "Water plants");
    assert!(store.tasks()[0].completed);

    let raw = std::fs::read_to_string(storage.path_for("tasks").unwrap()).unwrap();
    assert!(raw.contains("\"isCompleted\":true"));
}

#[test]
fn store_on_unreadable_slot_starts_empty_with_warning() {
    let (dir, storage) = temp_storage();
    std::fs::create_dir_all(dir.path().join("data").join("tasks.json")).unwrap();
    let store = TaskListStore::new(storage);
    assert!(store.tasks().is_empty());
    assert!(matches!(
        store.load_warning(),
        Some(LoadWarning::ReadFailed { .. })
    ));
}

#[test]
fn corrupt_file_is_backed_up_next_to_slot() {
    let (dir, storage) = temp_storage();
    storage.save("tasks", "{{{").unwrap();
    let store = TaskListStore::new(storage);
    assert!(store.tasks().is_empty());
    let backup = dir.path().join("data").join("tasks.corrupt.json");
    assert_eq!(std::fs::read_to_string(backup).unwrap(), "{{{");
}

#[test]
fn non_utf8_slot_is_backed_up_before_next_save() {
    let (dir, storage) = temp_storage();
    let data = dir.path().join("data");
    std::fs::create_dir_all(&data).unwrap();
    let original: &[u8] = b"[{\"id\":1,\"name\":\"Caf\xe9\",\"isCompleted\":false}]";
    std::fs::write(data.join("tasks.json"), original).unwrap();

    let mut store = TaskListStore::new(storage);
    assert!(store.tasks().is_empty());
    assert!(matches!(
        store.load_warning(),
        Some(LoadWarning::Corrupt { backup_key: Some(k), .. }) if k == "tasks.corrupt"
    ));

    store.set_draft_name("new");
    store.add_task().unwrap();
    assert_eq!(
        std::fs::read(data.join("tasks.corrupt.json")).unwrap(),
        original
    );
}

#[test]
fn corrupt_backups_are_never_overwritten() {
    let (dir, storage) = temp_storage();
    storage.save("tasks", "first").unwrap();
    let _ = TaskListStore::new(storage.clone());
    storage.save("tasks", "second").unwrap();
    let _ = TaskListStore::new(storage.clone());

    let data = dir.path().join("data");
    assert_eq!(
        std::fs::read_to_string(data.join("tasks.corrupt.json")).unwrap(),
        "first"
    );
    assert_eq!(
        std::fs::read_to_string(data.join("tasks.corrupt-1.json")).unwrap(),
        "second"
    );
}

#[test]
fn failed_rename_removes_temp_file() {
    let (dir, storage) = temp_storage();
    // A non-empty directory in place of the slot makes the rename fail.
    let slot = dir.path().join("data").join("tasks.json");
    std::fs::create_dir_all(&slot).unwrap();
    std::fs::write(slot.join("keep"), "x").unwrap();

    assert!(matches!(
        storage.save("tasks", "[]"),
        Err(PersistenceError::Io { .. })
    ));
    let entries: Vec<_> = std::fs::read_dir(dir.path().join("data"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(entries, ["tasks.json"]);
}
