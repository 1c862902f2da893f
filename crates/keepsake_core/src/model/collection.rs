//! Collection container model.
//!
//! # Responsibility
//! - Define the named container that exclusively owns a set of entries.
//!
//! # Invariants
//! - `name` is unique case-insensitively within one store.
//! - Owned entries reference the collection via `Entry::collection_id`
//!   and are removed together with it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::entry::ValidationError;
use crate::time::now_ms;

/// Stable identifier for a collection.
pub type CollectionId = Uuid;

pub const COLLECTION_NAME_MAX_CHARS: usize = 80;

/// Named grouping that exclusively owns entries (e.g. a stamp album or a
/// brush kit).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Stable global ID referenced by owned entries.
    pub id: CollectionId,
    pub name: String,
    /// Unix epoch milliseconds. Immutable after creation.
    pub created_at: i64,
    /// Unix epoch milliseconds. Never decreases; >= `created_at`.
    pub updated_at: i64,
}

impl Collection {
    /// Creates a new collection with a generated stable ID and current
    /// timestamps.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates a new collection with a caller-provided stable ID.
    pub fn with_id(id: CollectionId, name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id,
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Checks structural field rules. Name uniqueness needs sibling
    /// collections and lives in the store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyField { field: "name" });
        }
        let actual_chars = self.name.chars().count();
        if actual_chars > COLLECTION_NAME_MAX_CHARS {
            return Err(ValidationError::FieldTooLong {
                field: "name",
                max_chars: COLLECTION_NAME_MAX_CHARS,
                actual_chars,
            });
        }
        Ok(())
    }
}
