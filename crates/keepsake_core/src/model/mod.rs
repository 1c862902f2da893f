//! Unified domain model for the personal-tracking record apps.
//!
//! # Responsibility
//! - Define the canonical record shared by every app projection.
//! - Own field-level validation rules enforced before persistence.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - `created_at` never changes after creation; `updated_at` never
//!   decreases.
//! - A collection exclusively owns the entries that reference it.

pub mod collection;
pub mod entry;
pub mod snapshot;
