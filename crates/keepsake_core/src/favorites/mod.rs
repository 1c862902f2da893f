//! Cross-cutting favorites index.
//!
//! # Responsibility
//! - Track which entries are favorited, independent of the container
//!   that owns them.
//! - Resolve the favorites list against a snapshot in caller-selected
//!   order.
//!
//! # Invariants
//! - The index and the entries' `is_favorite` flags never disagree; the
//!   service layer changes both inside one synchronous call.
//! - Deleted entries are pruned in the same operation that removed
//!   them. A dangling id is a cascade bug: debug builds assert, release
//!   builds skip and log it.

use log::error;

use crate::model::entry::{Entry, EntryId};
use crate::model::snapshot::StoreSnapshot;

/// Sort options for the favorites screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteSort {
    /// Owning collection name (case-insensitive); loose entries last.
    CollectionName,
    /// Newest first.
    CreatedAt,
    /// Case-insensitive alphabetical title order.
    Title,
}

/// Insertion-ordered set of favorited entry ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FavoritesIndex {
    ids: Vec<EntryId>,
}

impl FavoritesIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the index from the `is_favorite` flags in a freshly
    /// loaded snapshot.
    pub fn rebuild(snapshot: &StoreSnapshot) -> Self {
        Self {
            ids: snapshot
                .entries
                .iter()
                .filter(|entry| entry.is_favorite)
                .map(|entry| entry.id)
                .collect(),
        }
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Adds an id, keeping existing ids in place.
    pub fn insert(&mut self, id: EntryId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    pub fn remove(&mut self, id: EntryId) {
        self.ids.retain(|candidate| *candidate != id);
    }

    /// Drops every id that was just deleted from the store, directly or
    /// via a container cascade.
    pub fn prune(&mut self, deleted: &[EntryId]) {
        self.ids.retain(|candidate| !deleted.contains(candidate));
    }

    /// Favorited entries resolved against `snapshot`, sorted per
    /// `sort`. Ties are broken by id so the order is reproducible.
    pub fn resolve(&self, snapshot: &StoreSnapshot, sort: FavoriteSort) -> Vec<Entry> {
        let mut entries: Vec<Entry> = Vec::with_capacity(self.ids.len());
        for id in &self.ids {
            match snapshot.entry(*id) {
                Some(entry) => entries.push(entry.clone()),
                None => {
                    debug_assert!(false, "favorites index holds dangling id {id}");
                    error!(
                        "event=favorites_resolve module=favorites status=dangling entry={id}"
                    );
                }
            }
        }

        let collection_key = |entry: &Entry| -> (bool, String) {
            let name = entry
                .collection_id
                .and_then(|id| snapshot.collection(id))
                .map(|collection| collection.name.to_lowercase());
            (name.is_none(), name.unwrap_or_default())
        };

        entries.sort_by(|a, b| {
            let primary = match sort {
                FavoriteSort::CollectionName => collection_key(a).cmp(&collection_key(b)),
                FavoriteSort::CreatedAt => b.created_at.cmp(&a.created_at),
                FavoriteSort::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            };
            primary.then_with(|| a.id.cmp(&b.id))
        });
        entries
    }
}
