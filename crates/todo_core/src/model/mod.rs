//! Domain model for the todo store.
//!
//! # Responsibility
//! - Define the canonical todo record and its completion lifecycle.
//!
//! # Invariants
//! - Every persisted item is identified by a stable `TodoId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod todo;
