//! Process-local adapter for tests and UI previews.
//!
//! # Responsibility
//! - Hold the saved snapshot in memory with no durability.
//! - Allow tests to inject save failures and observe save traffic.

use std::cell::{Cell, RefCell};
use std::io;

use crate::model::snapshot::StoreSnapshot;
use crate::persist::{PersistError, PersistResult, PersistenceAdapter};

/// In-memory snapshot adapter. Single-threaded by design, matching the
/// store's execution model.
#[derive(Default)]
pub struct MemoryAdapter {
    snapshot: RefCell<StoreSnapshot>,
    fail_saves: Cell<bool>,
    save_count: Cell<u64>,
}

impl MemoryAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a pre-populated snapshot, as if it had been saved by a
    /// previous run.
    pub fn with_snapshot(snapshot: StoreSnapshot) -> Self {
        Self {
            snapshot: RefCell::new(snapshot),
            fail_saves: Cell::new(false),
            save_count: Cell::new(0),
        }
    }

    /// Makes every subsequent `save` fail until turned off again.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }

    /// The snapshot the last successful `save` wrote.
    pub fn saved_snapshot(&self) -> StoreSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Number of successful saves observed.
    pub fn save_count(&self) -> u64 {
        self.save_count.get()
    }
}

impl PersistenceAdapter for MemoryAdapter {
    fn load(&self) -> StoreSnapshot {
        self.snapshot.borrow().clone()
    }

    fn save(&self, snapshot: &StoreSnapshot) -> PersistResult<()> {
        if self.fail_saves.get() {
            return Err(PersistError::Io(io::Error::other("injected save failure")));
        }
        *self.snapshot.borrow_mut() = snapshot.clone();
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
