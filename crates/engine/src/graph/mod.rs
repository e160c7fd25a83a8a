//! Social graph over a document backend.
//!
//! Users are documents in one collection; a friendship is a pair of entries,
//! one in each user's `friends` array. The backend only guarantees atomicity
//! per document, so every edge mutation is two writes and every delete is
//! followed by a collection-wide sweep.
//!
//! [`GraphStore`] is split across files by concern:
//! - `users`: record CRUD
//! - `friends`: edge add/remove and friend lists
//! - `integrity`: the delete sweep and the repair pass

pub mod friends;
pub mod integrity;
pub mod types;
pub mod users;

use std::fmt;
use std::sync::Arc;

use socialgraph_core::{GraphError, GraphResult, UserId};
use socialgraph_storage::{Deadline, DocumentBackend, MemoryBackend};

use crate::config::GraphConfig;

/// Edge-consistent social graph store.
///
/// Cheap to clone; clones share the backend. Holds no mutable state of its
/// own, so any number of tasks can drive it concurrently.
#[derive(Clone)]
pub struct GraphStore {
    backend: Arc<dyn DocumentBackend>,
    config: Arc<GraphConfig>,
}

impl GraphStore {
    /// Create a store over `backend`.
    ///
    /// Every backend call is bounded by `config.operation_timeout_ms`.
    pub fn new<B>(backend: B, config: GraphConfig) -> Self
    where
        B: DocumentBackend + 'static,
    {
        let backend = Deadline::new(backend, config.timeout());
        Self {
            backend: Arc::new(backend),
            config: Arc::new(config),
        }
    }

    /// Create a store over a fresh [`MemoryBackend`] with default config.
    pub fn in_memory() -> Self {
        Self::in_memory_with_config(GraphConfig::default())
    }

    /// Create a store over a fresh [`MemoryBackend`].
    pub fn in_memory_with_config(config: GraphConfig) -> Self {
        Self::new(MemoryBackend::new(), config)
    }

    /// The store's configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    fn collection(&self) -> &str {
        &self.config.collection
    }

    /// Fail `NotFound` unless a document exists for `id`.
    pub(crate) async fn ensure_exists(&self, id: &UserId) -> GraphResult<()> {
        match self.backend.find_one(self.collection(), id.key()).await? {
            Some(_) => Ok(()),
            None => Err(GraphError::not_found(id)),
        }
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
