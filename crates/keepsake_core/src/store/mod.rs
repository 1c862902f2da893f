//! Authoritative entry store.
//!
//! # Responsibility
//! - Own the live in-memory snapshot for one record set and keep it in
//!   lockstep with durable storage.
//! - Enforce store-level uniqueness rules on every write path.
//! - Deliver change notifications synchronously after each mutation.
//!
//! # Invariants
//! - Every mutation validates before touching state and persists a
//!   working copy before the live snapshot is swapped; a failed save
//!   leaves live state equal to the last persisted snapshot.
//! - `created_at`, `id` and `kind` survive updates unchanged; effective
//!   updates bump `updated_at` strictly.
//! - Deleting a collection removes every owned entry in the same
//!   mutation.
//! - Deleting an absent id is a successful no-op, so a double tap in the
//!   UI never surfaces an error dialog.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

use log::{debug, error, info};
use uuid::Uuid;

use crate::model::collection::{Collection, CollectionId};
use crate::model::entry::{Entry, EntryId, EntryKind, ValidationError};
use crate::model::snapshot::StoreSnapshot;
use crate::persist::{PersistError, PersistenceAdapter};
use crate::time::{day_index, now_ms};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error taxonomy for all CRUD entry points.
#[derive(Debug)]
pub enum StoreError {
    Validation(ValidationError),
    /// Update targeting an id the store does not hold.
    NotFound(Uuid),
    /// Durable write failed; the mutation was rolled back.
    Persistence(PersistError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "record not found: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<PersistError> for StoreError {
    fn from(value: PersistError) -> Self {
        Self::Persistence(value)
    }
}

/// Change notification delivered synchronously after a successful
/// mutation. Carries ids only, never live references; subscribers
/// re-read an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    EntryAdded(EntryId),
    EntryUpdated(EntryId),
    EntryDeleted(EntryId),
    CollectionAdded(CollectionId),
    CollectionUpdated(CollectionId),
    CollectionDeleted {
        id: CollectionId,
        removed_entries: Vec<EntryId>,
    },
}

pub type SubscriberId = u64;

type ChangeCallback = Box<dyn FnMut(&StoreChange)>;

/// Authoritative in-memory + durable representation of one record set.
///
/// All operations run on one logical thread; reads hand out cloned,
/// immutable values.
pub struct EntryStore<P: PersistenceAdapter> {
    adapter: P,
    state: StoreSnapshot,
    subscribers: Vec<(SubscriberId, ChangeCallback)>,
    next_subscriber: SubscriberId,
}

impl<P: PersistenceAdapter> EntryStore<P> {
    /// Opens a store from the adapter's last durable snapshot (empty on
    /// first run or after corrupt-data recovery).
    pub fn open(adapter: P) -> Self {
        let state = adapter.load();
        info!(
            "event=store_open module=store status=ok entries={} collections={}",
            state.entries.len(),
            state.collections.len()
        );
        Self {
            adapter,
            state,
            subscribers: Vec::new(),
            next_subscriber: 0,
        }
    }

    /// The adapter backing this store. Mainly useful to tests and tools.
    pub fn adapter(&self) -> &P {
        &self.adapter
    }

    // ── Entries ───────────────────────────────────────────────────────

    /// Validates and persists a new entry. The entry is durable before
    /// this returns.
    pub fn add_entry(&mut self, entry: Entry) -> StoreResult<Entry> {
        entry.validate()?;
        if self.state.entry(entry.id).is_some() {
            return Err(ValidationError::DuplicateId(entry.id).into());
        }
        self.check_store_rules(&entry, None)?;

        let mut working = self.state.clone();
        working.entries.push(entry.clone());
        self.commit(working, "add_entry")?;
        self.notify(&StoreChange::EntryAdded(entry.id));
        Ok(entry)
    }

    /// Re-validates and persists changed fields of an existing entry.
    ///
    /// `id`, `kind` and `created_at` are taken from the stored entry
    /// regardless of the request. When no effective field differs the
    /// stored entry is returned untouched: no save, no notification, no
    /// `updated_at` bump.
    pub fn update_entry(&mut self, entry: Entry) -> StoreResult<Entry> {
        let current = self
            .state
            .entry(entry.id)
            .cloned()
            .ok_or(StoreError::NotFound(entry.id))?;

        let mut incoming = entry;
        incoming.id = current.id;
        incoming.kind = current.kind;
        incoming.created_at = current.created_at;
        incoming.updated_at = current.updated_at;

        if incoming == current {
            return Ok(current);
        }

        incoming.validate()?;
        self.check_store_rules(&incoming, Some(incoming.id))?;
        // Strictly greater even when the wall clock has not advanced a
        // full millisecond since the previous write.
        incoming.updated_at = now_ms().max(current.updated_at + 1);

        let mut working = self.state.clone();
        if let Some(slot) = working
            .entries
            .iter_mut()
            .find(|candidate| candidate.id == incoming.id)
        {
            *slot = incoming.clone();
        }
        self.commit(working, "update_entry")?;
        self.notify(&StoreChange::EntryUpdated(incoming.id));
        Ok(incoming)
    }

    /// Removes an entry. Missing ids are a successful no-op. Returns the
    /// removed entries so callers can release cross-cutting references
    /// (favorites, photos) in the same logical operation.
    pub fn delete_entry(&mut self, id: EntryId) -> StoreResult<Vec<Entry>> {
        let Some(removed) = self.state.entry(id).cloned() else {
            return Ok(Vec::new());
        };

        let mut working = self.state.clone();
        working.entries.retain(|entry| entry.id != id);
        self.commit(working, "delete_entry")?;
        self.notify(&StoreChange::EntryDeleted(id));
        Ok(vec![removed])
    }

    pub fn get_entry(&self, id: EntryId) -> Option<Entry> {
        self.state.entry(id).cloned()
    }

    /// All entries in insertion order.
    pub fn entries(&self) -> Vec<Entry> {
        self.state.entries.clone()
    }

    // ── Collections ───────────────────────────────────────────────────

    pub fn add_collection(&mut self, collection: Collection) -> StoreResult<Collection> {
        collection.validate()?;
        if self.state.collection(collection.id).is_some() {
            return Err(ValidationError::DuplicateId(collection.id).into());
        }
        self.check_collection_name(&collection)?;

        let mut working = self.state.clone();
        working.collections.push(collection.clone());
        self.commit(working, "add_collection")?;
        self.notify(&StoreChange::CollectionAdded(collection.id));
        Ok(collection)
    }

    pub fn update_collection(&mut self, collection: Collection) -> StoreResult<Collection> {
        let current = self
            .state
            .collection(collection.id)
            .cloned()
            .ok_or(StoreError::NotFound(collection.id))?;

        let mut incoming = collection;
        incoming.id = current.id;
        incoming.created_at = current.created_at;
        incoming.updated_at = current.updated_at;

        if incoming == current {
            return Ok(current);
        }

        incoming.validate()?;
        self.check_collection_name(&incoming)?;
        incoming.updated_at = now_ms().max(current.updated_at + 1);

        let mut working = self.state.clone();
        if let Some(slot) = working
            .collections
            .iter_mut()
            .find(|candidate| candidate.id == incoming.id)
        {
            *slot = incoming.clone();
        }
        self.commit(working, "update_collection")?;
        self.notify(&StoreChange::CollectionUpdated(incoming.id));
        Ok(incoming)
    }

    /// Removes a collection and every entry it owns in one mutation.
    /// Missing ids are a successful no-op. Returns the removed entries.
    pub fn delete_collection(&mut self, id: CollectionId) -> StoreResult<Vec<Entry>> {
        if self.state.collection(id).is_none() {
            return Ok(Vec::new());
        }

        let removed: Vec<Entry> = self
            .state
            .entries
            .iter()
            .filter(|entry| entry.collection_id == Some(id))
            .cloned()
            .collect();

        let mut working = self.state.clone();
        working.entries.retain(|entry| entry.collection_id != Some(id));
        working.collections.retain(|collection| collection.id != id);
        self.commit(working, "delete_collection")?;
        self.notify(&StoreChange::CollectionDeleted {
            id,
            removed_entries: removed.iter().map(|entry| entry.id).collect(),
        });
        Ok(removed)
    }

    pub fn get_collection(&self, id: CollectionId) -> Option<Collection> {
        self.state.collection(id).cloned()
    }

    /// All collections in insertion order.
    pub fn collections(&self) -> Vec<Collection> {
        self.state.collections.clone()
    }

    /// Immutable copy of the full store state for query and statistics
    /// layers.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.clone()
    }

    // ── Change notification ───────────────────────────────────────────

    /// Registers a callback invoked synchronously after every successful
    /// mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&StoreChange) + 'static) -> SubscriberId {
        let id = self.next_subscriber;
        self.next_subscriber += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Returns whether it existed.
    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(candidate, _)| *candidate != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, change: &StoreChange) {
        for (_, callback) in &mut self.subscribers {
            callback(change);
        }
    }

    // ── Internals ─────────────────────────────────────────────────────

    /// Rules that need a clock or sibling records: future dates, one
    /// mood entry per calendar day, known collection references.
    fn check_store_rules(
        &self,
        entry: &Entry,
        exclude: Option<EntryId>,
    ) -> Result<(), ValidationError> {
        if let Some(date_ms) = entry.entry_date {
            let now = now_ms();
            if day_index(date_ms) > day_index(now) {
                return Err(ValidationError::FutureDate {
                    date_ms,
                    now_ms: now,
                });
            }

            if entry.kind == EntryKind::Mood {
                let day = day_index(date_ms);
                let occupied = self.state.entries.iter().any(|other| {
                    Some(other.id) != exclude
                        && other.kind == EntryKind::Mood
                        && other.entry_date.map(day_index) == Some(day)
                });
                if occupied {
                    return Err(ValidationError::DuplicateEntryDate { day });
                }
            }
        }

        if let Some(collection_id) = entry.collection_id {
            if self.state.collection(collection_id).is_none() {
                return Err(ValidationError::UnknownCollection(collection_id));
            }
        }

        Ok(())
    }

    fn check_collection_name(&self, collection: &Collection) -> Result<(), ValidationError> {
        let name = collection.name.trim().to_lowercase();
        let taken = self.state.collections.iter().any(|other| {
            other.id != collection.id && other.name.trim().to_lowercase() == name
        });
        if taken {
            return Err(ValidationError::DuplicateCollectionName(
                collection.name.clone(),
            ));
        }
        Ok(())
    }

    /// Persists the working copy, then swaps it into live state. On
    /// failure the working copy is dropped and live state stays at the
    /// last persisted snapshot.
    fn commit(&mut self, working: StoreSnapshot, op: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        match self.adapter.save(&working) {
            Ok(()) => {
                self.state = working;
                debug!(
                    "event=store_commit module=store status=ok op={op} duration_ms={}",
                    started_at.elapsed().as_millis()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_commit module=store status=error op={op} duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(StoreError::Persistence(err))
            }
        }
    }
}
