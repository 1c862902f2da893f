use std::cell::RefCell;
use std::rc::Rc;

use keepsake_core::{
    Entry, EntryKind, EntryStore, ItemStatus, MemoryAdapter, MoodLevel, StoreChange, StoreError,
    ValidationError,
};
use uuid::Uuid;

fn open_store() -> EntryStore<MemoryAdapter> {
    EntryStore::open(MemoryAdapter::new())
}

fn item_with_fixed_id(id: &str, title: &str) -> Entry {
    Entry::with_id(Uuid::parse_str(id).unwrap(), EntryKind::Item, title)
}

#[test]
fn add_and_get_roundtrip() {
    let mut store = open_store();

    let entry = Entry::new(EntryKind::Item, "garden trowel");
    let saved = store.add_entry(entry.clone()).unwrap();
    assert_eq!(saved, entry);

    let loaded = store.get_entry(entry.id).unwrap();
    assert_eq!(loaded, entry);
}

#[test]
fn add_persists_before_returning() {
    let mut store = open_store();

    let entry = Entry::new(EntryKind::Item, "garden trowel");
    store.add_entry(entry.clone()).unwrap();

    let persisted = store.adapter().saved_snapshot();
    assert_eq!(persisted.entries.len(), 1);
    assert_eq!(persisted.entries[0].id, entry.id);
}

#[test]
fn duplicate_id_is_rejected_before_any_change() {
    let mut store = open_store();

    let entry = Entry::new(EntryKind::Item, "hammer");
    store.add_entry(entry.clone()).unwrap();

    let twin = Entry::with_id(entry.id, EntryKind::Item, "impostor");
    let err = store.add_entry(twin).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::DuplicateId(id)) if id == entry.id
    ));
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn update_bumps_updated_at_strictly_and_preserves_identity() {
    let mut store = open_store();

    let entry = Entry::new(EntryKind::Item, "hand plane");
    let saved = store.add_entry(entry).unwrap();

    let mut change = saved.clone();
    change.body = "restored in 2024".to_string();
    // A hostile caller cannot rewrite identity fields.
    change.created_at = 1;
    change.kind = EntryKind::Victory;

    let updated = store.update_entry(change).unwrap();
    assert!(updated.updated_at > saved.updated_at);
    assert_eq!(updated.created_at, saved.created_at);
    assert_eq!(updated.kind, EntryKind::Item);
    assert_eq!(updated.body, "restored in 2024");
}

#[test]
fn update_without_changes_is_a_noop() {
    let mut store = open_store();

    let saved = store.add_entry(Entry::new(EntryKind::Item, "chisel")).unwrap();
    let saves_before = store.adapter().save_count();

    let unchanged = store.update_entry(saved.clone()).unwrap();
    assert_eq!(unchanged.updated_at, saved.updated_at);
    assert_eq!(store.adapter().save_count(), saves_before);
}

#[test]
fn update_not_found_returns_not_found() {
    let mut store = open_store();

    let entry = Entry::new(EntryKind::Item, "missing");
    let err = store.update_entry(entry.clone()).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(id) if id == entry.id));
}

#[test]
fn delete_then_get_returns_absent_and_is_idempotent() {
    let mut store = open_store();

    let entry = Entry::new(EntryKind::Item, "whisk");
    store.add_entry(entry.clone()).unwrap();

    let removed = store.delete_entry(entry.id).unwrap();
    assert_eq!(removed.len(), 1);
    assert!(store.get_entry(entry.id).is_none());

    // A double tap must not surface an error.
    let removed_again = store.delete_entry(entry.id).unwrap();
    assert!(removed_again.is_empty());
}

#[test]
fn mood_entries_are_unique_per_calendar_day() {
    let mut store = open_store();

    let mut first = Entry::new(EntryKind::Mood, "");
    first.mood = Some(MoodLevel::Good);
    first.entry_date = Some(1_000);
    store.add_entry(first).unwrap();

    let mut second = Entry::new(EntryKind::Mood, "");
    second.mood = Some(MoodLevel::Bad);
    second.entry_date = Some(5_000); // same day, later millisecond
    let err = store.add_entry(second).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::DuplicateEntryDate { day: 0 })
    ));

    let mut next_day = Entry::new(EntryKind::Mood, "");
    next_day.mood = Some(MoodLevel::Okay);
    next_day.entry_date = Some(86_400_000);
    store.add_entry(next_day).unwrap();
}

#[test]
fn future_dated_entries_are_rejected() {
    let mut store = open_store();

    let mut entry = Entry::new(EntryKind::Victory, "time travel");
    entry.entry_date = Some(keepsake_core::time::now_ms() + 2 * 86_400_000);
    let err = store.add_entry(entry).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::FutureDate { .. })
    ));
}

#[test]
fn entry_referencing_unknown_collection_is_rejected() {
    let mut store = open_store();

    let mut entry = Entry::new(EntryKind::Item, "orphan");
    entry.collection_id = Some(Uuid::from_u128(404));
    let err = store.add_entry(entry).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::UnknownCollection(_))
    ));
}

#[test]
fn failed_save_rolls_back_the_mutation() {
    let mut store = open_store();

    let kept = store.add_entry(Entry::new(EntryKind::Item, "kept")).unwrap();

    store.adapter().set_fail_saves(true);
    let err = store
        .add_entry(Entry::new(EntryKind::Item, "never lands"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Persistence(_)));

    // Live state still matches the last persisted snapshot.
    assert_eq!(store.entries().len(), 1);
    assert_eq!(store.get_entry(kept.id).unwrap(), kept);
    assert_eq!(store.adapter().saved_snapshot().entries.len(), 1);

    store.adapter().set_fail_saves(false);
    store.add_entry(Entry::new(EntryKind::Item, "lands now")).unwrap();
    assert_eq!(store.entries().len(), 2);
}

#[test]
fn failed_save_emits_no_notification() {
    let mut store = open_store();
    let events: Rc<RefCell<Vec<StoreChange>>> = Rc::default();

    let sink = Rc::clone(&events);
    store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    store.adapter().set_fail_saves(true);
    let _ = store.add_entry(Entry::new(EntryKind::Item, "doomed"));
    assert!(events.borrow().is_empty());
}

#[test]
fn subscribers_receive_events_until_unsubscribed() {
    let mut store = open_store();
    let events: Rc<RefCell<Vec<StoreChange>>> = Rc::default();

    let sink = Rc::clone(&events);
    let subscription = store.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    let entry = store.add_entry(Entry::new(EntryKind::Item, "bell")).unwrap();
    store.delete_entry(entry.id).unwrap();
    assert_eq!(
        events.borrow().as_slice(),
        &[
            StoreChange::EntryAdded(entry.id),
            StoreChange::EntryDeleted(entry.id),
        ]
    );

    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));

    store.add_entry(Entry::new(EntryKind::Item, "silent")).unwrap();
    assert_eq!(events.borrow().len(), 2);
}

#[test]
fn reads_hand_out_detached_copies() {
    let mut store = open_store();

    let entry = store.add_entry(Entry::new(EntryKind::Item, "original")).unwrap();

    let mut copy = store.get_entry(entry.id).unwrap();
    copy.title = "mutated copy".to_string();
    let mut all = store.entries();
    all.clear();

    assert_eq!(store.get_entry(entry.id).unwrap().title, "original");
    assert_eq!(store.entries().len(), 1);
}

#[test]
fn entries_keep_insertion_order() {
    let mut store = open_store();

    let a = item_with_fixed_id("00000000-0000-4000-8000-000000000003", "c");
    let b = item_with_fixed_id("00000000-0000-4000-8000-000000000001", "a");
    let c = item_with_fixed_id("00000000-0000-4000-8000-000000000002", "b");
    store.add_entry(a.clone()).unwrap();
    store.add_entry(b.clone()).unwrap();
    store.add_entry(c.clone()).unwrap();

    let ids: Vec<_> = store.entries().into_iter().map(|entry| entry.id).collect();
    assert_eq!(ids, vec![a.id, b.id, c.id]);
}

#[test]
fn store_reopens_from_persisted_snapshot() {
    let mut store = open_store();
    let mut entry = Entry::new(EntryKind::Item, "survivor");
    entry.is_favorite = true;
    store.add_entry(entry.clone()).unwrap();

    let snapshot = store.adapter().saved_snapshot();
    let reopened = EntryStore::open(MemoryAdapter::with_snapshot(snapshot));
    assert_eq!(reopened.get_entry(entry.id).unwrap(), entry);
}

#[test]
fn item_status_change_is_an_effective_update() {
    let mut store = open_store();

    let mut entry = Entry::new(EntryKind::Item, "mixer");
    entry.status = Some(ItemStatus::InUse);
    let saved = store.add_entry(entry).unwrap();

    let mut change = saved.clone();
    change.status = Some(ItemStatus::Retired);
    let updated = store.update_entry(change).unwrap();
    assert_eq!(updated.status, Some(ItemStatus::Retired));
    assert!(updated.updated_at > saved.updated_at);
}
