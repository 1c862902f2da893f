//! Core domain logic for Keepsake personal-tracking apps.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod favorites;
pub mod logging;
pub mod model;
pub mod persist;
pub mod photo;
pub mod query;
pub mod service;
pub mod stats;
pub mod store;
pub mod time;

pub use favorites::{FavoriteSort, FavoritesIndex};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collection::{Collection, CollectionId};
pub use model::entry::{
    Entry, EntryId, EntryKind, ItemCondition, ItemStatus, MoodLevel, ValidationError,
};
pub use model::snapshot::StoreSnapshot;
pub use persist::{
    JsonFileAdapter, MemoryAdapter, PersistError, PersistenceAdapter, SqliteAdapter,
};
pub use photo::{MemoryPhotoManager, PhotoError, PhotoManager};
pub use query::{
    filter_entries, sort_collections, sort_entries, CollectionSort, CollectionSortKey, DateRange,
    EntryFilter, EntrySort, EntrySortKey, SortDirection,
};
pub use service::tracker::Tracker;
pub use stats::{
    age_in_days, average, count_by, distribution, extremum, percentage, AverageOutcome, Extremum,
    Facet, FacetCount, Metric, MIN_AVERAGE_SAMPLES,
};
pub use store::{EntryStore, StoreChange, StoreError, StoreResult, SubscriberId};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
