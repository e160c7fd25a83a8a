//! Per-call deadlines for backend operations
//!
//! [`Deadline`] decorates any [`DocumentBackend`] so that every call is
//! bounded by a fixed timeout. A call that runs past it fails with
//! `BackendTimeout`; nothing is retried and any effect the backend already
//! applied stays applied.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;

use socialgraph_core::{Document, DocumentKey, GraphError, GraphResult};

use crate::backend::{DeleteOutcome, DocumentBackend, InsertOutcome, Update, UpdateOutcome};

/// Default per-call deadline
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Backend decorator bounding every call by a deadline
#[derive(Debug, Clone)]
pub struct Deadline<B> {
    inner: B,
    timeout: Duration,
}

impl<B> Deadline<B> {
    /// Wrap `inner`, bounding each call by `timeout`
    pub fn new(inner: B, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        call: impl Future<Output = GraphResult<T>>,
    ) -> GraphResult<T> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    operation,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Backend call exceeded deadline"
                );
                Err(GraphError::backend_timeout(operation, self.timeout))
            }
        }
    }
}

#[async_trait]
impl<B: DocumentBackend> DocumentBackend for Deadline<B> {
    async fn find_one(
        &self,
        collection: &str,
        key: &DocumentKey,
    ) -> GraphResult<Option<Document>> {
        self.bounded("find_one", self.inner.find_one(collection, key))
            .await
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> GraphResult<InsertOutcome> {
        self.bounded("insert_one", self.inner.insert_one(collection, doc))
            .await
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &DocumentKey,
        update: Update,
    ) -> GraphResult<UpdateOutcome> {
        self.bounded("update_one", self.inner.update_one(collection, key, update))
            .await
    }

    async fn update_many(&self, collection: &str, update: Update) -> GraphResult<UpdateOutcome> {
        self.bounded("update_many", self.inner.update_many(collection, update))
            .await
    }

    async fn delete_one(&self, collection: &str, key: &DocumentKey) -> GraphResult<DeleteOutcome> {
        self.bounded("delete_one", self.inner.delete_one(collection, key))
            .await
    }

    async fn scan(&self, collection: &str) -> GraphResult<Vec<(DocumentKey, Document)>> {
        self.bounded("scan", self.inner.scan(collection)).await
    }
}
