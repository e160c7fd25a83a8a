//! Graph engine for SocialGraph
//!
//! This crate turns the document backend's CRUD primitives into an
//! edge-consistent social graph:
//! - User records: create, get, patch, delete
//! - Friendships: symmetric add/remove, friend lists, no self-edges
//! - Integrity: reference sweep on delete, out-of-band repair pass
//! - Configuration: collection, per-call deadline, repair policy
//!
//! Every operation is a short sequence of single-document backend calls.
//! Nothing is retried and nothing is rolled back; failures between the
//! steps of a two-step write are reported with their own error kind.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod graph;

pub use config::{ConfigError, GraphConfig};
pub use graph::types::{RepairAction, RepairPolicy, RepairReport};
pub use graph::GraphStore;
