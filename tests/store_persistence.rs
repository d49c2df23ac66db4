use nebula::filter::Filter;
use nebula::persistence::{MemoryPersistence, SlotPersistence, TaskPersistence, DEFAULT_SLOT_KEY};
use nebula::storage::Storage;
use nebula::store::TaskStore;

fn slot_store(dir: &std::path::Path) -> TaskStore<SlotPersistence> {
    TaskStore::open(SlotPersistence::new(Storage::new(dir), DEFAULT_SLOT_KEY)).unwrap()
}

#[test]
fn reopened_store_sees_the_same_tasks() {
    let dir = tempfile::tempdir().unwrap();

    let mut store = slot_store(dir.path());
    let milk = store.add("Buy milk").unwrap().unwrap();
    store.add("Walk dog").unwrap();
    store.toggle(&milk.id).unwrap();
    let before = store.all().to_vec();
    drop(store);

    let reopened = slot_store(dir.path());
    assert_eq!(reopened.all(), before.as_slice());
    assert_eq!(reopened.active_count(), 1);
    assert_eq!(reopened.all()[0].text, "Walk dog");
}

#[test]
fn slot_file_uses_camel_case_records() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = slot_store(dir.path());
    store.add("Buy milk").unwrap();

    let raw = std::fs::read_to_string(dir.path().join("nebula-tasks.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &value[0];
    assert_eq!(record["text"], "Buy milk");
    assert_eq!(record["completed"], false);
    assert!(record["createdAt"].as_i64().unwrap() > 0);
    assert!(record["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[test]
fn invariant_violations_load_as_empty() {
    let duplicate = r#"[
        {"id":"a","text":"one","completed":false,"createdAt":1},
        {"id":"a","text":"two","completed":false,"createdAt":2}
    ]"#;
    let blank = r#"[{"id":"a","text":"   ","completed":false,"createdAt":1}]"#;
    let wrong_shape = r#"{"tasks":[]}"#;

    for raw in [duplicate, blank, wrong_shape, "", "null"] {
        let store = TaskStore::open(MemoryPersistence::with_raw(raw)).unwrap();
        assert!(store.all().is_empty(), "expected empty for {raw:?}");
    }
}

#[test]
fn unknown_fields_are_tolerated() {
    let raw = r#"[{"id":"a","text":"one","completed":true,"createdAt":1,"color":"red"}]"#;
    let store = TaskStore::open(MemoryPersistence::with_raw(raw)).unwrap();
    assert_eq!(store.all().len(), 1);
    assert!(store.all()[0].completed);
}

#[test]
fn failed_write_keeps_memory_state() {
    let mut store = TaskStore::open(MemoryPersistence::read_only()).unwrap();

    assert!(store.add("Buy milk").is_err());
    assert_eq!(store.all().len(), 1);
    assert_eq!(store.active_count(), 1);
    assert!(store.persistence().raw().is_none());
}

#[test]
fn every_mutation_reaches_the_port() {
    let mut store = TaskStore::open(MemoryPersistence::new()).unwrap();
    let a = store.add("A").unwrap().unwrap();
    let b = store.add("B").unwrap().unwrap();

    store.toggle(&b.id).unwrap();
    let saved = store.persistence().load().unwrap();
    assert_eq!(saved.all(), store.all());

    store.delete(&a.id).unwrap();
    assert_eq!(store.persistence().load().unwrap().len(), 1);

    assert_eq!(store.clear_completed().unwrap(), 1);
    assert_eq!(store.persistence().raw().as_deref(), Some("[]"));
}

#[test]
fn view_reflects_filter_and_counts() {
    let mut store = TaskStore::open(MemoryPersistence::new()).unwrap();
    let a = store.add("A").unwrap().unwrap();
    store.add("B").unwrap();
    store.toggle(&a.id).unwrap();

    let active = store.view(Filter::Active);
    assert_eq!(active.tasks.len(), 1);
    assert_eq!(active.tasks[0].text, "B");
    assert_eq!(active.total, 2);
    assert!(active.has_completed);
    assert_eq!(active.items_left_label(), "1 items left");

    let completed = store.view(Filter::Completed);
    assert_eq!(completed.tasks[0].id, a.id);
}

#[test]
fn separate_keys_are_separate_lists() {
    let dir = tempfile::tempdir().unwrap();
    let storage = Storage::new(dir.path());

    let mut home = TaskStore::open(SlotPersistence::new(storage.clone(), "home")).unwrap();
    let mut work = TaskStore::open(SlotPersistence::new(storage, "work")).unwrap();
    home.add("dishes").unwrap();
    work.add("report").unwrap();
    work.add("email").unwrap();

    assert_eq!(slot_store(dir.path()).all().len(), 0);
    let home = TaskStore::open(SlotPersistence::new(Storage::new(dir.path()), "home")).unwrap();
    assert_eq!(home.all().len(), 1);
}

#[test]
fn unreadable_slot_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = slot_store(dir.path());
    for text in ["one", "two", "three"] {
        store.add(text).unwrap();
    }
    drop(store);

    let lock_path = dir.path().join("nebula-tasks.json.lock");
    let held = nebula::lock::FileLock::acquire(&lock_path, 50).unwrap();
    let blocked = TaskStore::open(SlotPersistence::new(
        Storage::new(dir.path()).with_lock_timeout(50),
        DEFAULT_SLOT_KEY,
    ));
    assert!(matches!(blocked, Err(nebula::Error::LockFailed(_))));
    drop(held);

    let mut store = slot_store(dir.path());
    store.add("new").unwrap();
    let texts: Vec<String> = slot_store(dir.path())
        .all()
        .iter()
        .map(|task| task.text.clone())
        .collect();
    assert_eq!(texts, vec!["new", "three", "two", "one"]);
}
