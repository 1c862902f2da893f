//! Pure filtering, search and sorting over store snapshots.
//!
//! # Responsibility
//! - Turn a snapshot into exactly the sequence a list view renders.
//! - Keep every transformation side-effect-free and deterministic.
//!
//! # Invariants
//! - Predicates combine with logical AND; blank search text matches
//!   everything.
//! - Every sort is total: equal primary keys fall back to id order, so
//!   identical inputs always produce identical output.

use crate::model::collection::{Collection, CollectionId};
use crate::model::entry::{Entry, EntryKind, ItemCondition, ItemStatus};

/// Inclusive timestamp range in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start_ms: i64,
    pub end_ms: i64,
}

impl DateRange {
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    pub fn contains(&self, timestamp_ms: i64) -> bool {
        timestamp_ms >= self.start_ms && timestamp_ms <= self.end_ms
    }
}

/// AND-combined predicates for entry list views.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    pub kind: Option<EntryKind>,
    /// Case-insensitive category equality.
    pub category: Option<String>,
    pub status: Option<ItemStatus>,
    pub condition: Option<ItemCondition>,
    /// Restrict to entries owned by this collection.
    pub collection: Option<CollectionId>,
    /// Inclusive range over `entry_date`; entries without a date never
    /// match a range filter.
    pub date_range: Option<DateRange>,
    /// Case-insensitive substring search over the kind's text fields.
    pub search_text: Option<String>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref() {
            let matches = entry
                .category
                .as_deref()
                .is_some_and(|value| value.eq_ignore_ascii_case(category));
            if !matches {
                return false;
            }
        }

        if let Some(status) = self.status {
            if entry.status != Some(status) {
                return false;
            }
        }

        if let Some(condition) = self.condition {
            if entry.condition != Some(condition) {
                return false;
            }
        }

        if let Some(collection) = self.collection {
            if entry.collection_id != Some(collection) {
                return false;
            }
        }

        if let Some(range) = self.date_range {
            let in_range = entry
                .entry_date
                .is_some_and(|date_ms| range.contains(date_ms));
            if !in_range {
                return false;
            }
        }

        if let Some(needle) = self.search_text.as_deref() {
            if !search_matches(entry, needle) {
                return false;
            }
        }

        true
    }
}

/// Returns whether the entry's searchable text contains `needle`,
/// case-insensitively. Blank search text matches everything.
fn search_matches(entry: &Entry, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }

    let haystacks: Vec<&str> = match entry.kind {
        EntryKind::Mood | EntryKind::Item | EntryKind::Victory => {
            vec![entry.title.as_str(), entry.body.as_str()]
        }
        EntryKind::Recipe => {
            let mut fields = vec![entry.title.as_str(), entry.body.as_str()];
            fields.extend(entry.ingredients.iter().map(String::as_str));
            fields
        }
    };

    haystacks
        .iter()
        .any(|haystack| haystack.to_lowercase().contains(&needle))
}

/// Applies the filter, preserving snapshot order.
pub fn filter_entries(entries: &[Entry], filter: &EntryFilter) -> Vec<Entry> {
    entries
        .iter()
        .filter(|entry| filter.matches(entry))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort key for entry lists. Each key carries a natural default
/// direction via [`EntrySort::by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrySortKey {
    /// Case-insensitive alphabetical title order.
    Title,
    CreatedAt,
    UpdatedAt,
    /// Domain priority order of `ItemStatus`; entries without a status
    /// sort last.
    Status,
    /// Domain rank order of `ItemCondition`, best first; entries
    /// without a condition sort last.
    Condition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntrySort {
    pub key: EntrySortKey,
    pub direction: SortDirection,
}

impl EntrySort {
    /// Sort by `key` in its natural direction: alphabetical and status
    /// keys ascending, timestamps newest first.
    pub fn by(key: EntrySortKey) -> Self {
        let direction = match key {
            EntrySortKey::Title | EntrySortKey::Status | EntrySortKey::Condition => {
                SortDirection::Ascending
            }
            EntrySortKey::CreatedAt | EntrySortKey::UpdatedAt => SortDirection::Descending,
        };
        Self { key, direction }
    }

    pub fn reversed(mut self) -> Self {
        self.direction = match self.direction {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        };
        self
    }
}

/// Returns a sorted copy. Ties on the primary key are broken by id so
/// the output order is reproducible across runs.
pub fn sort_entries(entries: &[Entry], sort: EntrySort) -> Vec<Entry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        let primary = match sort.key {
            EntrySortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            EntrySortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            EntrySortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            EntrySortKey::Status => status_slot(a).cmp(&status_slot(b)),
            EntrySortKey::Condition => condition_slot(a).cmp(&condition_slot(b)),
        };
        let primary = match sort.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });
    sorted
}

fn status_slot(entry: &Entry) -> u8 {
    entry.status.map_or(u8::MAX, ItemStatus::priority)
}

fn condition_slot(entry: &Entry) -> u8 {
    // Best condition first under the natural ascending direction.
    entry
        .condition
        .map_or(u8::MAX, |condition| u8::MAX - 1 - condition.rank())
}

/// Sort key for collection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionSortKey {
    /// Case-insensitive alphabetical name order.
    Name,
    CreatedAt,
    /// Number of owned entries, largest first by default.
    EntryCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionSort {
    pub key: CollectionSortKey,
    pub direction: SortDirection,
}

impl CollectionSort {
    pub fn by(key: CollectionSortKey) -> Self {
        let direction = match key {
            CollectionSortKey::Name => SortDirection::Ascending,
            CollectionSortKey::CreatedAt | CollectionSortKey::EntryCount => {
                SortDirection::Descending
            }
        };
        Self { key, direction }
    }
}

/// Returns a sorted copy of the collections. `entries` supplies the
/// child counts for [`CollectionSortKey::EntryCount`].
pub fn sort_collections(
    collections: &[Collection],
    entries: &[Entry],
    sort: CollectionSort,
) -> Vec<Collection> {
    let count_for = |id: CollectionId| -> usize {
        entries
            .iter()
            .filter(|entry| entry.collection_id == Some(id))
            .count()
    };

    let mut sorted = collections.to_vec();
    sorted.sort_by(|a, b| {
        let primary = match sort.key {
            CollectionSortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            CollectionSortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            CollectionSortKey::EntryCount => count_for(a.id).cmp(&count_for(b.id)),
        };
        let primary = match sort.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    });
    sorted
}
