//! Tracker use-case service.
//!
//! # Responsibility
//! - Provide the CRUD, favorites and photo-cleanup entry points one app
//!   screen set consumes.
//! - Keep the favorites index consistent with entry flags inside the
//!   same synchronous call that mutates the store.
//!
//! # Invariants
//! - Entity deletion is authoritative: photo cleanup is best-effort and
//!   a failed photo delete never fails the operation.
//! - Every delete path (direct or collection cascade) prunes the
//!   favorites index before returning.

use log::warn;

use crate::favorites::{FavoriteSort, FavoritesIndex};
use crate::model::collection::{Collection, CollectionId};
use crate::model::entry::{Entry, EntryId};
use crate::model::snapshot::StoreSnapshot;
use crate::photo::PhotoManager;
use crate::persist::PersistenceAdapter;
use crate::store::{EntryStore, StoreChange, StoreError, StoreResult, SubscriberId};

/// Use-case facade owning one record store, its favorites index and the
/// photo collaborator.
pub struct Tracker<P: PersistenceAdapter, M: PhotoManager> {
    store: EntryStore<P>,
    favorites: FavoritesIndex,
    photos: M,
}

impl<P: PersistenceAdapter, M: PhotoManager> Tracker<P, M> {
    /// Wraps an opened store, rebuilding the favorites index from the
    /// loaded snapshot's flags.
    pub fn new(store: EntryStore<P>, photos: M) -> Self {
        let favorites = FavoritesIndex::rebuild(&store.snapshot());
        Self {
            store,
            favorites,
            photos,
        }
    }

    // ── Entries ───────────────────────────────────────────────────────

    pub fn add_entry(&mut self, entry: Entry) -> StoreResult<Entry> {
        let saved = self.store.add_entry(entry)?;
        if saved.is_favorite {
            self.favorites.insert(saved.id);
        }
        Ok(saved)
    }

    pub fn update_entry(&mut self, entry: Entry) -> StoreResult<Entry> {
        let saved = self.store.update_entry(entry)?;
        if saved.is_favorite {
            self.favorites.insert(saved.id);
        } else {
            self.favorites.remove(saved.id);
        }
        Ok(saved)
    }

    /// Deletes an entry, prunes its favorites reference and releases its
    /// photos. Missing ids are a successful no-op.
    pub fn delete_entry(&mut self, id: EntryId) -> StoreResult<()> {
        let removed = self.store.delete_entry(id)?;
        self.release(&removed);
        Ok(())
    }

    pub fn entry(&self, id: EntryId) -> Option<Entry> {
        self.store.get_entry(id)
    }

    pub fn entries(&self) -> Vec<Entry> {
        self.store.entries()
    }

    // ── Collections ───────────────────────────────────────────────────

    pub fn add_collection(&mut self, collection: Collection) -> StoreResult<Collection> {
        self.store.add_collection(collection)
    }

    pub fn update_collection(&mut self, collection: Collection) -> StoreResult<Collection> {
        self.store.update_collection(collection)
    }

    /// Deletes a collection and everything it owns; owned entries leave
    /// the favorites index and release their photos in the same call.
    pub fn delete_collection(&mut self, id: CollectionId) -> StoreResult<()> {
        let removed = self.store.delete_collection(id)?;
        self.release(&removed);
        Ok(())
    }

    pub fn collection(&self, id: CollectionId) -> Option<Collection> {
        self.store.get_collection(id)
    }

    pub fn collections(&self) -> Vec<Collection> {
        self.store.collections()
    }

    // ── Favorites ─────────────────────────────────────────────────────

    /// Flips the entry's favorite flag through a store update and keeps
    /// the index in sync in the same logical operation.
    pub fn toggle_favorite(&mut self, id: EntryId) -> StoreResult<Entry> {
        let mut entry = self.store.get_entry(id).ok_or(StoreError::NotFound(id))?;
        entry.is_favorite = !entry.is_favorite;
        self.update_entry(entry)
    }

    /// Favorited entries in caller-selected order.
    pub fn favorites(&self, sort: FavoriteSort) -> Vec<Entry> {
        self.favorites.resolve(&self.store.snapshot(), sort)
    }

    // ── Reads and notification ────────────────────────────────────────

    pub fn snapshot(&self) -> StoreSnapshot {
        self.store.snapshot()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&StoreChange) + 'static) -> SubscriberId {
        self.store.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.store.unsubscribe(id)
    }

    /// The photo collaborator, for capture/display flows in the UI.
    pub fn photos(&self) -> &M {
        &self.photos
    }

    // ── Internals ─────────────────────────────────────────────────────

    /// Releases cross-cutting references of entries the store just
    /// removed. Photo cleanup failures are logged and swallowed.
    fn release(&mut self, removed: &[Entry]) {
        if removed.is_empty() {
            return;
        }

        let ids: Vec<EntryId> = removed.iter().map(|entry| entry.id).collect();
        self.favorites.prune(&ids);

        for entry in removed {
            for photo_id in &entry.photo_ids {
                if let Err(err) = self.photos.delete(photo_id) {
                    warn!(
                        "event=photo_release module=service status=error entry={} photo={photo_id} error={err}",
                        entry.id
                    );
                }
            }
        }
    }
}
