//! Persistence adapter contracts and implementations.
//!
//! # Responsibility
//! - Define the durable load/save contract for whole store snapshots.
//! - Keep encoding and storage details out of the store itself.
//!
//! # Invariants
//! - `load` is total: missing or corrupt data yields an empty snapshot
//!   so the app stays usable, and the recovery is logged.
//! - `save` is atomic from the caller's view: after a failure the
//!   previously saved snapshot is still what `load` returns.

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::db::DbError;
use crate::model::snapshot::StoreSnapshot;

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileAdapter;
pub use memory::MemoryAdapter;
pub use sqlite::SqliteAdapter;

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable write failure reported back to the store.
#[derive(Debug)]
pub enum PersistError {
    Io(std::io::Error),
    Encode(serde_json::Error),
    Db(DbError),
    /// Backing database is not in the shape this binary expects.
    Schema(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "snapshot i/o failure: {err}"),
            Self::Encode(err) => write!(f, "snapshot encoding failure: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Schema(detail) => write!(f, "snapshot schema mismatch: {detail}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Schema(_) => None,
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable storage backend for one store's snapshot.
pub trait PersistenceAdapter {
    /// Returns the last durably saved snapshot, or an empty one when no
    /// snapshot exists or the stored data cannot be decoded.
    fn load(&self) -> StoreSnapshot;

    /// Durably writes the full snapshot. Either the whole snapshot is
    /// visible on the next `load`, or the previous one still is.
    fn save(&self, snapshot: &StoreSnapshot) -> PersistResult<()>;
}
