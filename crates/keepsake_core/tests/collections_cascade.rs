use keepsake_core::{
    Collection, Entry, EntryFilter, EntryKind, EntryStore, FavoriteSort, MemoryAdapter,
    MemoryPhotoManager, StoreError, Tracker, ValidationError,
};

fn open_tracker() -> Tracker<MemoryAdapter, MemoryPhotoManager> {
    Tracker::new(EntryStore::open(MemoryAdapter::new()), MemoryPhotoManager::new())
}

fn item_in(collection: &Collection, title: &str) -> Entry {
    let mut entry = Entry::new(EntryKind::Item, title);
    entry.collection_id = Some(collection.id);
    entry
}

#[test]
fn collection_names_are_unique_case_insensitively() {
    let mut tracker = open_tracker();

    tracker.add_collection(Collection::new("Stamps")).unwrap();
    let err = tracker.add_collection(Collection::new("  stamps ")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(ValidationError::DuplicateCollectionName(_))
    ));
}

#[test]
fn collection_update_keeps_identity_and_bumps_timestamp() {
    let mut tracker = open_tracker();

    let saved = tracker.add_collection(Collection::new("Sewing kit")).unwrap();

    let mut change = saved.clone();
    change.name = "Sewing box".to_string();
    let updated = tracker.update_collection(change).unwrap();
    assert_eq!(updated.id, saved.id);
    assert_eq!(updated.created_at, saved.created_at);
    assert!(updated.updated_at > saved.updated_at);

    let unchanged = tracker.update_collection(updated.clone()).unwrap();
    assert_eq!(unchanged.updated_at, updated.updated_at);
}

#[test]
fn renaming_a_collection_to_its_own_name_is_allowed() {
    let mut tracker = open_tracker();

    let saved = tracker.add_collection(Collection::new("Brushes")).unwrap();
    let unchanged = tracker.update_collection(saved.clone()).unwrap();
    assert_eq!(unchanged, saved);
}

#[test]
fn deleting_a_container_removes_its_items_from_every_query() {
    let mut tracker = open_tracker();

    let stamps = tracker.add_collection(Collection::new("Stamps")).unwrap();
    let first = tracker.add_entry(item_in(&stamps, "Penny Black")).unwrap();
    let second = tracker.add_entry(item_in(&stamps, "Blue Mauritius")).unwrap();
    let loose = tracker.add_entry(Entry::new(EntryKind::Item, "loose magnifier")).unwrap();

    tracker.delete_collection(stamps.id).unwrap();

    assert!(tracker.collection(stamps.id).is_none());
    assert!(tracker.entry(first.id).is_none());
    assert!(tracker.entry(second.id).is_none());
    assert_eq!(tracker.snapshot().entries_in(stamps.id).len(), 0);

    let everything = keepsake_core::filter_entries(
        &tracker.entries(),
        &EntryFilter::default(),
    );
    assert_eq!(everything.len(), 1);
    assert_eq!(everything[0].id, loose.id);
}

#[test]
fn cascade_also_prunes_favorites() {
    let mut tracker = open_tracker();

    let kit = tracker.add_collection(Collection::new("Travel kit")).unwrap();
    let brush = tracker.add_entry(item_in(&kit, "Blue Brush")).unwrap();
    tracker.toggle_favorite(brush.id).unwrap();
    assert_eq!(tracker.favorites(FavoriteSort::Title).len(), 1);

    tracker.delete_collection(kit.id).unwrap();
    assert!(tracker.favorites(FavoriteSort::Title).is_empty());
}

#[test]
fn deleting_a_missing_collection_is_a_noop() {
    let mut tracker = open_tracker();
    tracker.delete_collection(uuid::Uuid::from_u128(7)).unwrap();
}
