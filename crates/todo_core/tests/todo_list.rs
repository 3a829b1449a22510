use std::cell::Cell;
use todo_core::db::open_db;
use todo_core::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageResult,
    TodoError, TodoId, TodoList, TodoPatch, TodoStorage, TodoValidationError, STORAGE_KEY,
};

fn memory_list(store: &MemoryKeyValueStore) -> TodoList<&MemoryKeyValueStore> {
    let mut list = TodoList::new(TodoStorage::new(store));
    list.initialize();
    list
}

/// Store whose writes can be switched to fail.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryKeyValueStore,
    fail_writes: Cell<bool>,
}

impl KeyValueStore for FlakyStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.inner.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        if self.fail_writes.get() {
            return Err(StorageError::Corrupted("disk full".to_string()));
        }
        self.inner.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.inner.remove_item(key)
    }
}

#[test]
fn add_buy_groceries_scenario() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);

    let created = list.add("Buy groceries", "medium", "2025-12-31").unwrap();

    assert_eq!(list.count(), 1);
    assert_eq!(list.items().len(), 1);
    assert_eq!(list.items()[0].name, "Buy groceries");
    assert_eq!(list.items()[0].priority, "medium");
    assert_eq!(list.items()[0], created);
}

#[test]
fn add_trims_name_and_increments_count_by_one() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);

    for (i, name) in ["  a", "b  ", " \tc d\n"].iter().enumerate() {
        let created = list.add(name, "low", "2025-01-01").unwrap();
        assert_eq!(created.name, name.trim());
        assert_eq!(list.count(), i + 1);
    }
}

#[test]
fn add_rejects_blank_names_without_mutation() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    list.add("keep", "high", "2025-01-01").unwrap();

    for name in ["", " ", "\t\n  "] {
        let err = list.add(name, "high", "2025-01-01").unwrap_err();
        assert_eq!(err, TodoError::Validation(TodoValidationError::MissingName));
        assert_eq!(list.count(), 1);
    }
}

#[test]
fn add_rejects_unknown_priorities() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);

    for priority in ["", "urgent", "High", "MEDIUM", " low "] {
        let err = list.add("task", priority, "2025-01-01").unwrap_err();
        assert_eq!(
            err,
            TodoError::Validation(TodoValidationError::InvalidPriority)
        );
    }
    assert_eq!(list.count(), 0);
    assert_eq!(store.get_item(STORAGE_KEY).unwrap(), None);
}

#[test]
fn add_rejects_missing_due_date() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);

    let err = list.add("task", "low", "").unwrap_err();
    assert_eq!(err.to_string(), "Due date is required");
}

#[test]
fn every_mutation_is_persisted() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    let storage = TodoStorage::new(&store);

    let first = list.add("first", "low", "2025-01-01").unwrap();
    assert_eq!(storage.load(), list.items());

    list.update(
        first.id(),
        &TodoPatch {
            priority: Some("high".to_string()),
            ..TodoPatch::default()
        },
    )
    .unwrap();
    assert_eq!(storage.load(), list.items());

    list.remove(first.id()).unwrap();
    assert!(storage.load().is_empty());
}

#[test]
fn remove_second_of_three_keeps_relative_order() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    let first = list.add("one", "high", "2025-01-01").unwrap();
    let second = list.add("two", "medium", "2025-01-02").unwrap();
    let third = list.add("three", "low", "2025-01-03").unwrap();

    let removed = list.remove(second.id()).unwrap();

    assert_eq!(removed, second);
    assert_eq!(list.count(), 2);
    let ids: Vec<TodoId> = list.items().iter().map(|item| item.id()).collect();
    assert_eq!(ids, vec![first.id(), third.id()]);
}

#[test]
fn remove_twice_returns_not_found() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    let item = list.add("once", "low", "2025-01-01").unwrap();

    list.remove(item.id()).unwrap();
    assert_eq!(
        list.remove(item.id()).unwrap_err(),
        TodoError::NotFound(item.id())
    );
    assert_eq!(list.count(), 0);
}

#[test]
fn update_keeps_position_and_identity() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    list.add("one", "high", "2025-01-01").unwrap();
    let middle = list.add("two", "medium", "2025-01-02").unwrap();
    list.add("three", "low", "2025-01-03").unwrap();

    let patch = TodoPatch {
        name: Some("  two, revised ".to_string()),
        priority: Some("low".to_string()),
        due_date: Some("2026-02-02".to_string()),
    };
    let updated = list.update(middle.id(), &patch).unwrap();

    assert_eq!(updated.id(), middle.id());
    assert_eq!(updated.created_at(), middle.created_at());
    assert_eq!(updated.name, "two, revised");
    assert_eq!(list.items()[1], updated);
    assert_eq!(list.get(middle.id()), Some(&updated));
}

#[test]
fn update_unknown_id_returns_not_found_and_leaves_state() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    list.add("one", "high", "2025-01-01").unwrap();
    let before = list.items().to_vec();

    let missing = TodoId::from(42);
    let err = list
        .update(
            missing,
            &TodoPatch {
                name: Some("x".to_string()),
                ..TodoPatch::default()
            },
        )
        .unwrap_err();

    assert_eq!(err, TodoError::NotFound(missing));
    assert_eq!(list.items(), before.as_slice());
}

#[test]
fn update_with_invalid_fields_leaves_state() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    let item = list.add("one", "high", "2025-01-01").unwrap();

    let err = list
        .update(
            item.id(),
            &TodoPatch {
                name: Some("   ".to_string()),
                priority: Some("low".to_string()),
                ..TodoPatch::default()
            },
        )
        .unwrap_err();

    assert_eq!(err, TodoError::Validation(TodoValidationError::MissingName));
    assert_eq!(list.items(), &[item.clone()]);
    assert_eq!(TodoStorage::new(&store).load(), vec![item]);
}

#[test]
fn initialize_restores_previous_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.sqlite3");

    let saved = {
        let conn = open_db(&path).unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();
        let mut list = TodoList::new(TodoStorage::new(store));
        list.initialize();
        list.add("first", "high", "2025-01-01").unwrap();
        list.add("second", "low", "2025-01-02").unwrap();
        list.items().to_vec()
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteKeyValueStore::try_new(&conn).unwrap();
    let mut list = TodoList::new(TodoStorage::new(store));
    assert_eq!(list.initialize(), saved.as_slice());
    assert_eq!(list.count(), 2);

    let third = list.add("third", "medium", "2025-01-03").unwrap();
    assert!(saved.iter().all(|item| item.id() != third.id()));
}

#[test]
fn new_ids_stay_above_loaded_ids() {
    let store = MemoryKeyValueStore::new();
    let far_future_id = u64::MAX / 2;
    store
        .set_item(
            STORAGE_KEY,
            &format!(
                r#"[{{"id": {far_future_id}, "name": "future", "priority": "low", "dueDate": "2025-01-01", "createdAt": "2025-01-01T00:00:00.000Z"}}]"#
            ),
        )
        .unwrap();

    let mut list = memory_list(&store);
    let created = list.add("next", "low", "2025-01-01").unwrap();
    assert!(created.id().value() > far_future_id);
}

#[test]
fn initialize_with_corrupted_storage_starts_empty() {
    let store = MemoryKeyValueStore::new();
    store.set_item(STORAGE_KEY, "]]]").unwrap();

    let list = memory_list(&store);
    assert!(list.is_empty());
}

#[test]
fn persistence_failure_is_not_fatal() {
    let store = FlakyStore::default();
    let mut list = TodoList::new(TodoStorage::new(&store));
    list.initialize();
    list.add("saved", "low", "2025-01-01").unwrap();
    assert_eq!(list.last_persist_error(), None);

    store.fail_writes.set(true);
    let unsaved = list.add("unsaved", "high", "2025-01-01").unwrap();
    assert_eq!(list.count(), 2);
    assert!(list.last_persist_error().unwrap().contains("disk full"));
    assert_eq!(TodoStorage::new(&store).load().len(), 1);

    store.fail_writes.set(false);
    list.remove(unsaved.id()).unwrap();
    assert_eq!(list.last_persist_error(), None);
}

#[test]
fn reset_clears_memory_and_storage() {
    let store = MemoryKeyValueStore::new();
    let mut list = memory_list(&store);
    list.add("one", "high", "2025-01-01").unwrap();

    list.reset().unwrap();

    assert!(list.is_empty());
    assert_eq!(store.get_item(STORAGE_KEY).unwrap(), None);
}
