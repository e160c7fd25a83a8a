//! Storage layer for SocialGraph
//!
//! This crate provides the document store the graph is built on:
//! - [`DocumentBackend`]: the async contract (find, insert, update, delete, scan)
//! - [`Update`]: `$set`, `$addToSet` and `$pull` operators
//! - [`MemoryBackend`]: in-process implementation with generated 12-byte keys
//! - [`Deadline`]: per-call timeout decorator
//!
//! With the `testing` feature, `testing::FaultyBackend` injects failures.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod deadline;
pub mod memory;
#[cfg(feature = "testing")]
pub mod testing;

pub use backend::{DeleteOutcome, DocumentBackend, InsertOutcome, Update, UpdateOutcome};
pub use deadline::{Deadline, DEFAULT_TIMEOUT};
pub use memory::MemoryBackend;
