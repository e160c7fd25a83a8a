//! Typed client over the executor.
//!
//! [`SocialGraph`] wraps an [`Executor`] and turns each command's [`Output`]
//! back into a concrete Rust type, for callers that do not want to match on
//! outputs themselves.

mod graph;

use crate::Executor;
use socialgraph_engine::{GraphConfig, GraphStore};

/// Typed handle to a social graph.
#[derive(Debug, Clone)]
pub struct SocialGraph {
    executor: Executor,
}

impl SocialGraph {
    /// Open a graph over an existing store.
    pub fn new(store: GraphStore) -> Self {
        Self {
            executor: Executor::new(store),
        }
    }

    /// Open a fresh in-memory graph.
    pub fn in_memory() -> Self {
        Self {
            executor: Executor::in_memory(),
        }
    }

    /// Open a fresh in-memory graph with `config`.
    pub fn in_memory_with_config(config: GraphConfig) -> Self {
        Self {
            executor: Executor::in_memory_with_config(config),
        }
    }

    /// The executor behind this handle.
    pub fn executor(&self) -> &Executor {
        &self.executor
    }
}
