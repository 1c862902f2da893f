//! JSON document adapter with atomic file replacement.
//!
//! # Responsibility
//! - Persist one store snapshot as a single JSON document on disk.
//!
//! # Invariants
//! - Writes go to a temp file, are synced, then renamed over the target,
//!   so a crash leaves either the old or the new document, never a
//!   partial one.
//! - A missing or undecodable document loads as an empty snapshot.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::warn;

use crate::model::snapshot::StoreSnapshot;
use crate::persist::{PersistResult, PersistenceAdapter};

/// Snapshot adapter backed by one JSON file.
pub struct JsonFileAdapter {
    path: PathBuf,
}

impl JsonFileAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceAdapter for JsonFileAdapter {
    fn load(&self) -> StoreSnapshot {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return StoreSnapshot::default();
            }
            Err(err) => {
                warn!(
                    "event=snapshot_load module=persist status=recovered reason=unreadable path={} error={err}",
                    self.path.display()
                );
                return StoreSnapshot::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(
                    "event=snapshot_load module=persist status=recovered reason=corrupt path={} error={err}",
                    self.path.display()
                );
                StoreSnapshot::default()
            }
        }
    }

    fn save(&self, snapshot: &StoreSnapshot) -> PersistResult<()> {
        let encoded = serde_json::to_string(snapshot)?;
        let temp_path = self.path.with_extension("tmp");

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = File::create(&temp_path)?;
        file.write_all(encoded.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
