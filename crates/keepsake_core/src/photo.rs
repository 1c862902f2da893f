//! Photo collaborator contract.
//!
//! # Responsibility
//! - Define the identifier-based contract the core uses to reference
//!   photos without owning their binary lifecycle.
//!
//! # Invariants
//! - Entries store identifier strings only; bytes live behind this
//!   trait.
//! - Photo deletion is best-effort from the core's point of view: a
//!   failed delete never blocks an entity delete.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PhotoResult<T> = Result<T, PhotoError>;

#[derive(Debug)]
pub enum PhotoError {
    Io(std::io::Error),
    UnknownPhoto(String),
}

impl Display for PhotoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "photo i/o failure: {err}"),
            Self::UnknownPhoto(photo_id) => write!(f, "unknown photo: {photo_id}"),
        }
    }
}

impl Error for PhotoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::UnknownPhoto(_) => None,
        }
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// External collaborator owning photo binaries. Implemented by the
/// platform layer; the core only relays identifiers.
pub trait PhotoManager {
    /// Stores the bytes and returns the opaque identifier an entry can
    /// carry in `photo_ids`.
    fn save(&self, bytes: &[u8]) -> PhotoResult<String>;

    /// Loads the bytes behind an identifier, when they still exist.
    fn load(&self, photo_id: &str) -> Option<Vec<u8>>;

    /// Removes the bytes behind an identifier.
    fn delete(&self, photo_id: &str) -> PhotoResult<()>;
}

/// Process-local photo manager for tests and UI previews.
#[derive(Default)]
pub struct MemoryPhotoManager {
    photos: RefCell<HashMap<String, Vec<u8>>>,
    next_id: Cell<u64>,
    fail_deletes: Cell<bool>,
}

impl MemoryPhotoManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent `delete` fail until turned off again.
    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.set(fail);
    }

    pub fn photo_count(&self) -> usize {
        self.photos.borrow().len()
    }
}

impl PhotoManager for MemoryPhotoManager {
    fn save(&self, bytes: &[u8]) -> PhotoResult<String> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let photo_id = format!("photo-{id}");
        self.photos
            .borrow_mut()
            .insert(photo_id.clone(), bytes.to_vec());
        Ok(photo_id)
    }

    fn load(&self, photo_id: &str) -> Option<Vec<u8>> {
        self.photos.borrow().get(photo_id).cloned()
    }

    fn delete(&self, photo_id: &str) -> PhotoResult<()> {
        if self.fail_deletes.get() {
            return Err(PhotoError::Io(std::io::Error::other(
                "injected photo delete failure",
            )));
        }
        if self.photos.borrow_mut().remove(photo_id).is_none() {
            return Err(PhotoError::UnknownPhoto(photo_id.to_string()));
        }
        Ok(())
    }
}
