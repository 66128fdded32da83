//! Property-based tests for `TaskListStore` invariants.
//!
//! Uses proptest to verify:
//! 1. Distinct non-empty adds all succeed and keep names unique.
//! 2. Empty and duplicate adds never change the list.
//! 3. Toggling the same id twice restores the original state.
//! 4. Confirmed deletes remove exactly one task and keep relative order.
//! 5. After any operation sequence the slot matches memory, names stay unique
//!    and ids are never reused.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::collections::HashSet;

use proptest::prelude::*;
use todolist::persistence::InMemoryStorage;
use todolist::tasks::{TaskListStore, ValidationError};
use todolist_proto::codec::{self, DEFAULT_STORAGE_KEY};
use todolist_proto::task::{Task, TaskId};

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z ]{1,12}"
}

fn arb_distinct_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::hash_set(arb_name(), 0..20).prop_map(|set| set.into_iter().collect())
}

fn store_with(names: &[String]) -> (TaskListStore<InMemoryStorage>, InMemoryStorage) {
    let storage = InMemoryStorage::new();
    let mut store = TaskListStore::new(storage.clone());
    for name in names {
        store.set_draft_name(name.clone());
        store.add_task().unwrap();
    }
    (store, storage)
}

fn stored(storage: &InMemoryStorage) -> Vec<Task> {
    storage
        .get(DEFAULT_STORAGE_KEY)
        .map(|payload| codec::decode(&payload).unwrap())
        .unwrap_or_default()
}

fn names_unique(tasks: &[Task]) -> bool {
    let mut seen = HashSet::new();
    tasks.iter().all(|t| !t.name.is_empty() && seen.insert(t.name.as_str()))
}

/// A user action against the store, with indexes resolved modulo list length.
#[derive(Debug, Clone)]
enum Op {
    SetDraft(String),
    Add,
    Toggle(usize),
    OpenEdit(usize),
    CloseEdit,
    ConfirmEdit,
    OpenDelete(usize),
    CloseDelete,
    ConfirmDelete,
    DeleteImmediate(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop_oneof![arb_name(), Just(String::new())].prop_map(Op::SetDraft),
        Just(Op::Add),
        any::<usize>().prop_map(Op::Toggle),
        any::<usize>().prop_map(Op::OpenEdit),
        Just(Op::CloseEdit),
        Just(Op::ConfirmEdit),
        any::<usize>().prop_map(Op::OpenDelete),
        Just(Op::CloseDelete),
        Just(Op::ConfirmDelete),
        any::<usize>().prop_map(Op::DeleteImmediate),
    ]
}

fn id_at(store: &TaskListStore<InMemoryStorage>, index: usize) -> TaskId {
    let tasks = store.tasks();
    if tasks.is_empty() {
        TaskId::from_raw(0)
    } else {
        tasks[index % tasks.len()].id
    }
}

fn apply(store: &mut TaskListStore<InMemoryStorage>, op: &Op) {
    match op {
        Op::SetDraft(name) => store.set_draft_name(name.clone()),
        Op::Add => {
            let _ = store.add_task();
        }
        Op::Toggle(i) => {
            let id = id_at(store, *i);
            store.toggle_completion(id).unwrap();
        }
        Op::OpenEdit(i) => {
            let id = id_at(store, *i);
            store.open_edit(id);
        }
        Op::CloseEdit => store.close_edit(),
        Op::ConfirmEdit => {
            let _ = store.confirm_edit();
        }
        Op::OpenDelete(i) => {
            let id = id_at(store, *i);
            store.open_confirm_delete(id);
        }
        Op::CloseDelete => store.close_confirm_delete(),
        Op::ConfirmDelete => store.confirm_delete().unwrap(),
        Op::DeleteImmediate(i) => {
            let id = id_at(store, *i);
            store.delete_task_immediate(id).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn distinct_adds_all_succeed(names in arb_distinct_names()) {
        let (store, storage) = store_with(&names);
        prop_assert_eq!(store.tasks().len(), names.len());
        prop_assert!(names_unique(store.tasks()));
        let stored_names: Vec<&str> = store.tasks().iter().map(|t| t.name.as_str()).collect();
        let expected: Vec<&str> = names.iter().map(String::as_str).collect();
        prop_assert_eq!(stored_names, expected);
        if !names.is_empty() {
            prop_assert_eq!(stored(&storage), store.tasks());
        }
    }

    #[test]
    fn empty_add_never_changes_list(names in arb_distinct_names()) {
        let (mut store, _) = store_with(&names);
        store.set_draft_name("");
        prop_assert!(store.add_task().is_err());
        prop_assert_eq!(store.tasks().len(), names.len());
        prop_assert_eq!(store.last_error(), Some(ValidationError::EmptyName));
    }

    #[test]
    fn duplicate_add_never_changes_list(names in arb_distinct_names(), pick in any::<usize>()) {
        prop_assume!(!names.is_empty());
        let (mut store, _) = store_with(&names);
        let before = store.tasks().to_vec();
        store.set_draft_name(names[pick % names.len()].clone());
        prop_assert!(store.add_task().is_err());
        prop_assert_eq!(store.tasks(), before.as_slice());
        prop_assert_eq!(store.last_error(), Some(ValidationError::DuplicateName));
    }

    #[test]
    fn toggle_twice_is_identity(names in arb_distinct_names(), pick in any::<usize>(), absent in any::<bool>()) {
        let (mut store, _) = store_with(&names);
        let before = store.tasks().to_vec();
        let id = if absent || names.is_empty() {
            TaskId::from_raw(u64::MAX)
        } else {
            store.tasks()[pick % names.len()].id
        };
        store.toggle_completion(id).unwrap();
        store.toggle_completion(id).unwrap();
        prop_assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn rename_to_other_name_is_rejected(names in arb_distinct_names(), a in any::<usize>(), b in any::<usize>()) {
        prop_assume!(names.len() >= 2);
        let (t, u) = (a % names.len(), b % names.len());
        prop_assume!(t != u);
        let (mut store, _) = store_with(&names);
        let t_id = store.tasks()[t].id;
        store.open_edit(t_id);
        store.set_draft_name(names[u].clone());
        prop_assert!(store.confirm_edit().is_err());
        prop_assert_eq!(&store.tasks()[t].name, &names[t]);
        prop_assert_eq!(&store.tasks()[u].name, &names[u]);
        prop_assert!(store.is_editing());

        // Renaming to its own name always succeeds.
        store.set_draft_name(names[t].clone());
        prop_assert!(store.confirm_edit().is_ok());
        prop_assert!(!store.is_editing());
    }

    #[test]
    fn confirm_delete_removes_exactly_target(names in arb_distinct_names(), pick in any::<usize>()) {
        prop_assume!(!names.is_empty());
        let (mut store, storage) = store_with(&names);
        let mut expected = store.tasks().to_vec();
        let target = expected.remove(pick % names.len());
        store.open_confirm_delete(target.id);
        store.confirm_delete().unwrap();
        prop_assert_eq!(store.tasks(), expected.as_slice());
        prop_assert_eq!(stored(&storage), expected);
    }

    #[test]
    fn invariants_hold_after_any_sequence(ops in prop::collection::vec(arb_op(), 0..60)) {
        let storage = InMemoryStorage::new();
        let mut store = TaskListStore::new(storage.clone());
        let mut seen_ids = HashSet::new();
        let mut max_id: Option<TaskId> = None;
        for op in &ops {
            apply(&mut store, op);
            prop_assert!(names_unique(store.tasks()));
            if let Some(target) = store.pending_edit() {
                prop_assert!(store.task(target).is_some());
            }
            if storage.write_count() > 0 {
                prop_assert_eq!(stored(&storage), store.tasks());
            }
            // Ids are never reused: every newly seen id is above all earlier ones.
            for task in store.tasks() {
                if seen_ids.insert(task.id) {
                    prop_assert!(max_id.is_none_or(|max| task.id > max));
                    max_id = Some(task.id);
                }
            }
        }

        // A reopened store sees exactly the same list.
        let reopened = TaskListStore::new(storage);
        prop_assert_eq!(reopened.tasks(), store.tasks());
    }
}
