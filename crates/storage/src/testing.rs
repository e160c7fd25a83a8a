//! Fault injection for backend tests
//!
//! [`FaultyBackend`] wraps another backend and, on request, makes chosen
//! calls fail, stall, report an unmatched update, or return a bogus
//! inserted key. Everything else is forwarded untouched.
//!
//! ```ignore
//! let backend = FaultyBackend::new(MemoryBackend::new());
//! backend.fail_next_for(Op::UpdateOne, bob_key);
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use socialgraph_core::{Document, DocumentKey, GraphError, GraphResult};

use crate::backend::{DeleteOutcome, DocumentBackend, InsertOutcome, Update, UpdateOutcome};

/// Backend operation selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// `find_one`
    FindOne,
    /// `insert_one`
    InsertOne,
    /// `update_one`
    UpdateOne,
    /// `update_many`
    UpdateMany,
    /// `delete_one`
    DeleteOne,
    /// `scan`
    Scan,
}

impl Op {
    /// Backend method name
    pub fn name(&self) -> &'static str {
        match self {
            Op::FindOne => "find_one",
            Op::InsertOne => "insert_one",
            Op::UpdateOne => "update_one",
            Op::UpdateMany => "update_many",
            Op::DeleteOne => "delete_one",
            Op::Scan => "scan",
        }
    }
}

#[derive(Debug)]
struct Failure {
    op: Op,
    key: Option<DocumentKey>,
    /// None fails every matching call
    remaining: Option<usize>,
}

impl Failure {
    fn matches(&self, op: Op, key: Option<&DocumentKey>) -> bool {
        self.op == op && (self.key.is_none() || self.key.as_ref() == key)
    }
}

#[derive(Debug, Default)]
struct Rules {
    failures: Vec<Failure>,
    delays: HashMap<Op, Duration>,
    unmatched: Vec<(Op, DocumentKey)>,
    mangled_insert_id: Option<Value>,
    calls: HashMap<Op, usize>,
}

impl Rules {
    /// Record a call and consume the first failure rule it trips
    fn trip(&mut self, op: Op, key: Option<&DocumentKey>) -> bool {
        *self.calls.entry(op).or_insert(0) += 1;

        let Some(pos) = self.failures.iter().position(|f| f.matches(op, key)) else {
            return false;
        };
        if let Some(remaining) = self.failures[pos].remaining.as_mut() {
            *remaining -= 1;
            if *remaining == 0 {
                self.failures.remove(pos);
            }
        }
        true
    }

    fn is_unmatched(&self, op: Op, key: &DocumentKey) -> bool {
        self.unmatched.iter().any(|(o, k)| *o == op && k == key)
    }
}

/// Backend wrapper that injects failures on demand
#[derive(Debug)]
pub struct FaultyBackend<B> {
    inner: B,
    rules: Mutex<Rules>,
}

impl<B> FaultyBackend<B> {
    /// Wrap `inner` with no faults armed
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            rules: Mutex::new(Rules::default()),
        }
    }

    /// The wrapped backend
    pub fn inner(&self) -> &B {
        &self.inner
    }

    /// Fail the next call of `op`, whatever its key
    pub fn fail_next(&self, op: Op) {
        self.push_failure(op, None, Some(1));
    }

    /// Fail the next call of `op` that addresses `key`
    pub fn fail_next_for(&self, op: Op, key: DocumentKey) {
        self.push_failure(op, Some(key), Some(1));
    }

    /// Fail every call of `op` until [`clear`](Self::clear)
    pub fn fail_always(&self, op: Op) {
        self.push_failure(op, None, None);
    }

    /// Sleep for `duration` before forwarding each call of `op`
    pub fn delay(&self, op: Op, duration: Duration) {
        self.rules.lock().delays.insert(op, duration);
    }

    /// Make `update_one` on `key` report zero matches without applying
    pub fn report_unmatched_for(&self, op: Op, key: DocumentKey) {
        self.rules.lock().unmatched.push((op, key));
    }

    /// Replace every inserted id reported to the caller with `value`.
    ///
    /// The document is still stored under its real key.
    pub fn mangle_insert_ids(&self, value: Value) {
        self.rules.lock().mangled_insert_id = Some(value);
    }

    /// Disarm every fault
    pub fn clear(&self) {
        let mut rules = self.rules.lock();
        rules.failures.clear();
        rules.delays.clear();
        rules.unmatched.clear();
        rules.mangled_insert_id = None;
    }

    /// How many times `op` has been called
    pub fn calls(&self, op: Op) -> usize {
        self.rules.lock().calls.get(&op).copied().unwrap_or(0)
    }

    fn push_failure(&self, op: Op, key: Option<DocumentKey>, remaining: Option<usize>) {
        self.rules.lock().failures.push(Failure { op, key, remaining });
    }

    /// Apply the armed delay and failure for one call
    async fn intercept(&self, op: Op, key: Option<&DocumentKey>) -> GraphResult<()> {
        // Lock is released before sleeping
        let (delay, tripped) = {
            let mut rules = self.rules.lock();
            let tripped = rules.trip(op, key);
            (rules.delays.get(&op).copied(), tripped)
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if tripped {
            return Err(GraphError::backend(op.name(), "injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl<B: DocumentBackend> DocumentBackend for FaultyBackend<B> {
    async fn find_one(
        &self,
        collection: &str,
        key: &DocumentKey,
    ) -> GraphResult<Option<Document>> {
        self.intercept(Op::FindOne, Some(key)).await?;
        self.inner.find_one(collection, key).await
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> GraphResult<InsertOutcome> {
        self.intercept(Op::InsertOne, None).await?;
        let outcome = self.inner.insert_one(collection, doc).await?;
        let mangled = self.rules.lock().mangled_insert_id.clone();
        Ok(match mangled {
            Some(inserted_id) => InsertOutcome { inserted_id },
            None => outcome,
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &DocumentKey,
        update: Update,
    ) -> GraphResult<UpdateOutcome> {
        self.intercept(Op::UpdateOne, Some(key)).await?;
        if self.rules.lock().is_unmatched(Op::UpdateOne, key) {
            return Ok(UpdateOutcome::default());
        }
        self.inner.update_one(collection, key, update).await
    }

    async fn update_many(&self, collection: &str, update: Update) -> GraphResult<UpdateOutcome> {
        self.intercept(Op::UpdateMany, None).await?;
        self.inner.update_many(collection, update).await
    }

    async fn delete_one(&self, collection: &str, key: &DocumentKey) -> GraphResult<DeleteOutcome> {
        self.intercept(Op::DeleteOne, Some(key)).await?;
        self.inner.delete_one(collection, key).await
    }

    async fn scan(&self, collection: &str) -> GraphResult<Vec<(DocumentKey, Document)>> {
        self.intercept(Op::Scan, None).await?;
        self.inner.scan(collection).await
    }
}
