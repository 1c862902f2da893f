use keepsake_core::db::{open_db, open_db_in_memory};
use keepsake_core::{
    Collection, Entry, EntryKind, EntryStore, ItemCondition, ItemStatus, JsonFileAdapter,
    MoodLevel, PersistenceAdapter, SqliteAdapter, StoreSnapshot,
};
use uuid::Uuid;

fn sample_snapshot() -> StoreSnapshot {
    let collection = Collection::with_id(Uuid::from_u128(100), "Stamps");

    let mut item = Entry::with_id(Uuid::from_u128(1), EntryKind::Item, "Penny Black");
    item.category = Some("stamps".to_string());
    item.status = Some(ItemStatus::Stored);
    item.condition = Some(ItemCondition::Fair);
    item.collection_id = Some(collection.id);
    item.photo_ids = vec!["photo-0".to_string()];
    item.is_favorite = true;

    let mut mood = Entry::with_id(Uuid::from_u128(2), EntryKind::Mood, "");
    mood.mood = Some(MoodLevel::Good);
    mood.entry_date = Some(86_400_000);
    mood.body = "sunny walk".to_string();

    let mut recipe = Entry::with_id(Uuid::from_u128(3), EntryKind::Recipe, "Lemon tart");
    recipe.ingredients = vec!["4 lemons".to_string(), "200g sugar".to_string()];

    StoreSnapshot {
        entries: vec![item, mood, recipe],
        collections: vec![collection],
    }
}

// ── JSON file adapter ─────────────────────────────────────────────────

#[test]
fn json_save_then_load_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = JsonFileAdapter::new(dir.path().join("records.json"));

    let snapshot = sample_snapshot();
    adapter.save(&snapshot).unwrap();
    assert_eq!(adapter.load(), snapshot);
}

#[test]
fn json_load_of_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = JsonFileAdapter::new(dir.path().join("never-written.json"));
    assert_eq!(adapter.load(), StoreSnapshot::default());
}

#[test]
fn json_load_of_corrupt_file_recovers_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    std::fs::write(&path, "{ this is not json").unwrap();

    let adapter = JsonFileAdapter::new(&path);
    assert_eq!(adapter.load(), StoreSnapshot::default());
}

#[test]
fn json_save_leaves_no_temp_file_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");
    let adapter = JsonFileAdapter::new(&path);

    adapter.save(&sample_snapshot()).unwrap();
    assert!(path.exists());
    assert!(!path.with_extension("tmp").exists());
}

#[test]
fn json_save_replaces_the_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let adapter = JsonFileAdapter::new(dir.path().join("records.json"));

    adapter.save(&sample_snapshot()).unwrap();
    let smaller = StoreSnapshot {
        entries: vec![Entry::with_id(Uuid::from_u128(9), EntryKind::Item, "only one")],
        collections: Vec::new(),
    };
    adapter.save(&smaller).unwrap();
    assert_eq!(adapter.load(), smaller);
}

#[test]
fn store_state_survives_a_restart_on_the_json_adapter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.json");

    let entry = Entry::new(EntryKind::Item, "persistent pin");
    {
        let mut store = EntryStore::open(JsonFileAdapter::new(&path));
        store.add_entry(entry.clone()).unwrap();
    }

    let reopened = EntryStore::open(JsonFileAdapter::new(&path));
    assert_eq!(reopened.get_entry(entry.id).unwrap(), entry);
}

// ── SQLite adapter ────────────────────────────────────────────────────

#[test]
fn sqlite_save_then_load_roundtrips() {
    let adapter = SqliteAdapter::try_new(open_db_in_memory().unwrap()).unwrap();

    let snapshot = sample_snapshot();
    adapter.save(&snapshot).unwrap();
    assert_eq!(adapter.load(), snapshot);
}

#[test]
fn sqlite_save_replaces_the_previous_contents() {
    let adapter = SqliteAdapter::try_new(open_db_in_memory().unwrap()).unwrap();

    adapter.save(&sample_snapshot()).unwrap();
    adapter.save(&StoreSnapshot::default()).unwrap();
    assert_eq!(adapter.load(), StoreSnapshot::default());
}

#[test]
fn sqlite_empty_database_loads_empty() {
    let adapter = SqliteAdapter::try_new(open_db_in_memory().unwrap()).unwrap();
    assert_eq!(adapter.load(), StoreSnapshot::default());
}

#[test]
fn sqlite_rejects_an_unmigrated_connection() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    assert!(SqliteAdapter::try_new(conn).is_err());
}

#[test]
fn sqlite_corrupt_rows_recover_to_empty() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO entries (
            uuid, kind, title, body, ingredients, photo_ids,
            is_favorite, created_at, updated_at
        ) VALUES ('not-a-uuid', 'item', 't', '', '[]', '[]', 0, 0, 0);",
        [],
    )
    .unwrap();

    let adapter = SqliteAdapter::try_new(conn).unwrap();
    assert_eq!(adapter.load(), StoreSnapshot::default());
}

#[test]
fn sqlite_snapshot_survives_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.sqlite3");

    let snapshot = sample_snapshot();
    {
        let adapter = SqliteAdapter::try_new(open_db(&path).unwrap()).unwrap();
        adapter.save(&snapshot).unwrap();
    }

    let adapter = SqliteAdapter::try_new(open_db(&path).unwrap()).unwrap();
    assert_eq!(adapter.load(), snapshot);
}
