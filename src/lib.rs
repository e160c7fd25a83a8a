//! SocialGraph: an edge-consistent social graph over a document store.
//!
//! Users are documents; a friendship is an entry in each user's friend set.
//! The store offers per-document atomicity only, so this crate enforces the
//! graph's invariants itself:
//! - friendships are symmetric (eventually; two writes, not one)
//! - nobody is their own friend
//! - deleting a user removes it from every friend set
//!
//! # Quick start
//!
//! ```ignore
//! use socialgraph::{GraphStore, NewUser};
//!
//! let graph = GraphStore::in_memory();
//! let alice = graph.create_user(NewUser::named("Alice").with_age(30)).await?;
//! let bob = graph.create_user(NewUser::named("Bob")).await?;
//! graph.make_friends(&alice.to_string(), &bob.to_string()).await?;
//! ```
//!
//! Use [`SocialGraph`] or [`Executor`] for the command-level boundary with
//! stable error kinds and status classes.

pub mod types;

pub use types::*;

pub use socialgraph_core::{decode, encode};
pub use socialgraph_engine::GraphStore;
pub use socialgraph_executor::{Executor, SocialGraph};
pub use socialgraph_storage::{Deadline, DocumentBackend, MemoryBackend, Update};
