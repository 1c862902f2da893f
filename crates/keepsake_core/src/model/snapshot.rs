//! Store snapshot value type.
//!
//! # Responsibility
//! - Bundle entries and collections into the unit of persistence and the
//!   immutable value handed to readers.
//!
//! # Invariants
//! - Sequences keep insertion order; readers never observe a
//!   half-applied mutation because the store swaps whole snapshots.

use serde::{Deserialize, Serialize};

use crate::model::collection::{Collection, CollectionId};
use crate::model::entry::{Entry, EntryId};

/// Immutable copy of store state, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub entries: Vec<Entry>,
    pub collections: Vec<Collection>,
}

impl StoreSnapshot {
    pub fn entry(&self, id: EntryId) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn collection(&self, id: CollectionId) -> Option<&Collection> {
        self.collections.iter().find(|collection| collection.id == id)
    }

    /// Entries owned by the given collection, in insertion order.
    pub fn entries_in(&self, id: CollectionId) -> Vec<&Entry> {
        self.entries
            .iter()
            .filter(|entry| entry.collection_id == Some(id))
            .collect()
    }
}
