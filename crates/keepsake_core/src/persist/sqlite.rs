//! SQLite snapshot adapter.
//!
//! # Responsibility
//! - Map one store snapshot to the `collections`/`entries` tables.
//! - Replace the full table contents atomically on every save.
//!
//! # Invariants
//! - `save` runs inside one immediate transaction; a failed save leaves
//!   the previously committed snapshot untouched.
//! - Rows that fail to decode make `load` fall back to an empty
//!   snapshot rather than surface partial state.

use std::cell::RefCell;

use log::warn;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use uuid::Uuid;

use crate::db::migrations::latest_version;
use crate::model::collection::Collection;
use crate::model::entry::{Entry, EntryKind, ItemCondition, ItemStatus, MoodLevel};
use crate::model::snapshot::StoreSnapshot;
use crate::persist::{PersistError, PersistResult, PersistenceAdapter};

/// Snapshot adapter backed by a migrated SQLite connection.
///
/// The connection is owned by the adapter; open it via
/// [`crate::db::open_db`] or [`crate::db::open_db_in_memory`].
pub struct SqliteAdapter {
    conn: RefCell<Connection>,
}

impl SqliteAdapter {
    /// Constructs an adapter from a migrated/ready connection.
    pub fn try_new(conn: Connection) -> PersistResult<Self> {
        ensure_connection_ready(&conn)?;
        Ok(Self {
            conn: RefCell::new(conn),
        })
    }
}

impl PersistenceAdapter for SqliteAdapter {
    fn load(&self) -> StoreSnapshot {
        match load_snapshot(&self.conn.borrow()) {
            Ok(snapshot) => snapshot,
            Err(message) => {
                warn!(
                    "event=snapshot_load module=persist status=recovered reason=corrupt backend=sqlite error={message}"
                );
                StoreSnapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> PersistResult<()> {
        let mut conn = self.conn.borrow_mut();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute("DELETE FROM entries;", [])?;
        tx.execute("DELETE FROM collections;", [])?;

        for collection in &snapshot.collections {
            tx.execute(
                "INSERT INTO collections (uuid, name, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    collection.id.to_string(),
                    collection.name.as_str(),
                    collection.created_at,
                    collection.updated_at,
                ],
            )?;
        }

        for entry in &snapshot.entries {
            tx.execute(
                "INSERT INTO entries (
                    uuid,
                    kind,
                    title,
                    body,
                    mood,
                    entry_date,
                    category,
                    status,
                    condition,
                    ingredients,
                    collection_uuid,
                    photo_ids,
                    is_favorite,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15);",
                params![
                    entry.id.to_string(),
                    kind_to_db(entry.kind),
                    entry.title.as_str(),
                    entry.body.as_str(),
                    entry.mood.map(mood_to_db),
                    entry.entry_date,
                    entry.category.as_deref(),
                    entry.status.map(status_to_db),
                    entry.condition.map(condition_to_db),
                    serde_json::to_string(&entry.ingredients)?,
                    entry.collection_id.map(|id| id.to_string()),
                    serde_json::to_string(&entry.photo_ids)?,
                    bool_to_int(entry.is_favorite),
                    entry.created_at,
                    entry.updated_at,
                ],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

fn load_snapshot(conn: &Connection) -> Result<StoreSnapshot, String> {
    let mut snapshot = StoreSnapshot::default();

    let mut stmt = conn
        .prepare(
            "SELECT uuid, name, created_at, updated_at
             FROM collections
             ORDER BY rowid ASC;",
        )
        .map_err(|err| err.to_string())?;
    let mut rows = stmt.query([]).map_err(|err| err.to_string())?;
    while let Some(row) = rows.next().map_err(|err| err.to_string())? {
        snapshot.collections.push(parse_collection_row(row)?);
    }

    let mut stmt = conn
        .prepare(
            "SELECT
                uuid,
                kind,
                title,
                body,
                mood,
                entry_date,
                category,
                status,
                condition,
                ingredients,
                collection_uuid,
                photo_ids,
                is_favorite,
                created_at,
                updated_at
             FROM entries
             ORDER BY rowid ASC;",
        )
        .map_err(|err| err.to_string())?;
    let mut rows = stmt.query([]).map_err(|err| err.to_string())?;
    while let Some(row) = rows.next().map_err(|err| err.to_string())? {
        snapshot.entries.push(parse_entry_row(row)?);
    }

    Ok(snapshot)
}

fn parse_collection_row(row: &Row<'_>) -> Result<Collection, String> {
    let uuid_text: String = get(row, "uuid")?;
    Ok(Collection {
        id: parse_uuid(&uuid_text, "collections.uuid")?,
        name: get(row, "name")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn parse_entry_row(row: &Row<'_>) -> Result<Entry, String> {
    let uuid_text: String = get(row, "uuid")?;
    let kind_text: String = get(row, "kind")?;
    let kind = parse_kind(&kind_text)
        .ok_or_else(|| format!("invalid kind `{kind_text}` in entries.kind"))?;

    let mood = match get::<Option<String>>(row, "mood")? {
        Some(value) => Some(
            parse_mood(&value).ok_or_else(|| format!("invalid mood `{value}` in entries.mood"))?,
        ),
        None => None,
    };
    let status = match get::<Option<String>>(row, "status")? {
        Some(value) => Some(
            parse_status(&value)
                .ok_or_else(|| format!("invalid status `{value}` in entries.status"))?,
        ),
        None => None,
    };
    let condition = match get::<Option<String>>(row, "condition")? {
        Some(value) => Some(
            parse_condition(&value)
                .ok_or_else(|| format!("invalid condition `{value}` in entries.condition"))?,
        ),
        None => None,
    };

    let ingredients_text: String = get(row, "ingredients")?;
    let ingredients: Vec<String> = serde_json::from_str(&ingredients_text)
        .map_err(|err| format!("invalid entries.ingredients json: {err}"))?;
    let photo_ids_text: String = get(row, "photo_ids")?;
    let photo_ids: Vec<String> = serde_json::from_str(&photo_ids_text)
        .map_err(|err| format!("invalid entries.photo_ids json: {err}"))?;

    let collection_id = match get::<Option<String>>(row, "collection_uuid")? {
        Some(value) => Some(parse_uuid(&value, "entries.collection_uuid")?),
        None => None,
    };

    let is_favorite = match get::<i64>(row, "is_favorite")? {
        0 => false,
        1 => true,
        other => return Err(format!("invalid is_favorite value `{other}`")),
    };

    Ok(Entry {
        id: parse_uuid(&uuid_text, "entries.uuid")?,
        kind,
        title: get(row, "title")?,
        body: get(row, "body")?,
        mood,
        entry_date: get(row, "entry_date")?,
        category: get(row, "category")?,
        status,
        condition,
        ingredients,
        collection_id,
        photo_ids,
        is_favorite,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn get<T: rusqlite::types::FromSql>(row: &Row<'_>, column: &str) -> Result<T, String> {
    row.get(column)
        .map_err(|err| format!("column `{column}`: {err}"))
}

fn parse_uuid(value: &str, column: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value).map_err(|_| format!("invalid uuid value `{value}` in {column}"))
}

fn kind_to_db(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Mood => "mood",
        EntryKind::Item => "item",
        EntryKind::Recipe => "recipe",
        EntryKind::Victory => "victory",
    }
}

fn parse_kind(value: &str) -> Option<EntryKind> {
    match value {
        "mood" => Some(EntryKind::Mood),
        "item" => Some(EntryKind::Item),
        "recipe" => Some(EntryKind::Recipe),
        "victory" => Some(EntryKind::Victory),
        _ => None,
    }
}

fn mood_to_db(mood: MoodLevel) -> &'static str {
    match mood {
        MoodLevel::Awful => "awful",
        MoodLevel::Bad => "bad",
        MoodLevel::Okay => "okay",
        MoodLevel::Good => "good",
        MoodLevel::Great => "great",
    }
}

fn parse_mood(value: &str) -> Option<MoodLevel> {
    match value {
        "awful" => Some(MoodLevel::Awful),
        "bad" => Some(MoodLevel::Bad),
        "okay" => Some(MoodLevel::Okay),
        "good" => Some(MoodLevel::Good),
        "great" => Some(MoodLevel::Great),
        _ => None,
    }
}

fn status_to_db(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::InUse => "in_use",
        ItemStatus::Stored => "stored",
        ItemStatus::Loaned => "loaned",
        ItemStatus::Retired => "retired",
    }
}

fn parse_status(value: &str) -> Option<ItemStatus> {
    match value {
        "in_use" => Some(ItemStatus::InUse),
        "stored" => Some(ItemStatus::Stored),
        "loaned" => Some(ItemStatus::Loaned),
        "retired" => Some(ItemStatus::Retired),
        _ => None,
    }
}

fn condition_to_db(condition: ItemCondition) -> &'static str {
    match condition {
        ItemCondition::Mint => "mint",
        ItemCondition::Good => "good",
        ItemCondition::Fair => "fair",
        ItemCondition::Worn => "worn",
        ItemCondition::Damaged => "damaged",
    }
}

fn parse_condition(value: &str) -> Option<ItemCondition> {
    match value {
        "mint" => Some(ItemCondition::Mint),
        "good" => Some(ItemCondition::Good),
        "fair" => Some(ItemCondition::Fair),
        "worn" => Some(ItemCondition::Worn),
        "damaged" => Some(ItemCondition::Damaged),
        _ => None,
    }
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> PersistResult<()> {
    let version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if version != latest_version() {
        return Err(PersistError::Schema(format!(
            "connection not migrated: user_version {version}, expected {}",
            latest_version()
        )));
    }

    for table in ["collections", "entries"] {
        if !table_exists(conn, table)? {
            return Err(PersistError::Schema(format!("missing table `{table}`")));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> PersistResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
