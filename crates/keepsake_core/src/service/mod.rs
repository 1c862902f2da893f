//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store, favorites and photo collaborators into the
//!   use-case level API the presentation layer calls.
//! - Keep UI layers decoupled from storage details.

pub mod tracker;
