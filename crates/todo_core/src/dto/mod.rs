//! Wire-facing request/response shapes.
//!
//! # Responsibility
//! - Map stored todo records to their externally visible form.
//! - Define the upsert request accepted by the service.
//!
//! # Invariants
//! - Mapping is pure; no storage access happens here.
//! - `completedAt` is omitted (never `null`) for in-progress items.

pub mod todo_dto;
