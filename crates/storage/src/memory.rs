//! In-process document backend
//!
//! Stands in for the remote document store: same contract, same per-document
//! atomicity, no cross-document transactions.
//!
//! # Design
//!
//! - DashMap: one shard per collection, sharded locking across collections
//! - FxHashMap: O(1) lookups by key within a collection
//! - Keys: 4-byte timestamp, 5 bytes fixed per backend, 3-byte counter
//!
//! A single-document call locks only its collection's shard for the length
//! of that call. `update_many` holds the shard while it walks every
//! document, so each document is updated atomically but concurrent callers
//! may observe the sweep half-way.

use async_trait::async_trait;
use dashmap::DashMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};

use socialgraph_core::{encode, Document, DocumentKey, GraphResult, KEY_LEN};

use crate::backend::{DeleteOutcome, DocumentBackend, InsertOutcome, Update, UpdateOutcome};

/// Per-collection shard holding that collection's documents
#[derive(Debug, Default)]
pub struct Collection {
    /// Documents by key
    pub(crate) docs: FxHashMap<DocumentKey, Document>,
}

impl Collection {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in this collection
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    /// Check if collection is empty
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Generates unique 12-byte document keys
struct KeyGenerator {
    /// Fixed per generator
    process: [u8; 5],
    counter: AtomicU32,
}

impl KeyGenerator {
    fn new() -> Self {
        let seed: [u8; 8] = rand::random();
        let mut process = [0u8; 5];
        process.copy_from_slice(&seed[..5]);
        let start = u32::from_be_bytes([0, seed[5], seed[6], seed[7]]);
        Self {
            process,
            counter: AtomicU32::new(start),
        }
    }

    fn next(&self) -> DocumentKey {
        let seconds = chrono::Utc::now().timestamp() as u32;
        let count = self.counter.fetch_add(1, Ordering::AcqRel) & 0x00FF_FFFF;

        let mut key = [0u8; KEY_LEN];
        key[..4].copy_from_slice(&seconds.to_be_bytes());
        key[4..9].copy_from_slice(&self.process);
        key[9..].copy_from_slice(&count.to_be_bytes()[1..]);
        DocumentKey::from_bytes(key)
    }
}

/// In-memory [`DocumentBackend`]
///
/// # Thread Safety
///
/// All operations are thread-safe. Clone the surrounding `Arc` to share one
/// backend between stores.
///
/// # Example
///
/// ```ignore
/// use socialgraph_storage::{DocumentBackend, MemoryBackend};
///
/// let backend = MemoryBackend::new();
/// let inserted = backend.insert_one("users", Document::new()).await?;
/// ```
pub struct MemoryBackend {
    collections: DashMap<String, Collection>,
    keys: KeyGenerator,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self {
            collections: DashMap::new(),
            keys: KeyGenerator::new(),
        }
    }

    /// Number of collections that have ever received a document
    pub fn collection_count(&self) -> usize {
        self.collections.len()
    }

    /// Number of documents in a collection
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }

    /// Check if a collection holds no documents
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    /// Total documents across all collections
    pub fn total_documents(&self) -> usize {
        self.collections.iter().map(|entry| entry.value().len()).sum()
    }

    /// Store a document under a caller-chosen key, replacing any previous one.
    ///
    /// Bypasses key generation; used to seed fixtures and to replay data.
    pub fn put_raw(&self, collection: &str, key: DocumentKey, doc: Document) {
        self.collections
            .entry(collection.to_string())
            .or_insert_with(Collection::new)
            .docs
            .insert(key, doc);
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryBackend")
            .field("collection_count", &self.collection_count())
            .field("total_documents", &self.total_documents())
            .finish()
    }
}

#[async_trait]
impl DocumentBackend for MemoryBackend {
    async fn find_one(
        &self,
        collection: &str,
        key: &DocumentKey,
    ) -> GraphResult<Option<Document>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|c| c.docs.get(key).cloned()))
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> GraphResult<InsertOutcome> {
        let key = self.keys.next();
        self.put_raw(collection, key, doc);
        Ok(InsertOutcome {
            inserted_id: Value::String(encode(&key)),
        })
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &DocumentKey,
        update: Update,
    ) -> GraphResult<UpdateOutcome> {
        let Some(mut shard) = self.collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        match shard.docs.get_mut(key) {
            Some(doc) => {
                let modified = update.apply(doc)?;
                Ok(UpdateOutcome {
                    matched: 1,
                    modified: u64::from(modified),
                })
            }
            None => Ok(UpdateOutcome::default()),
        }
    }

    async fn update_many(&self, collection: &str, update: Update) -> GraphResult<UpdateOutcome> {
        let Some(mut shard) = self.collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        let mut outcome = UpdateOutcome::default();
        for doc in shard.docs.values_mut() {
            outcome.matched += 1;
            if update.apply(doc)? {
                outcome.modified += 1;
            }
        }
        Ok(outcome)
    }

    async fn delete_one(&self, collection: &str, key: &DocumentKey) -> GraphResult<DeleteOutcome> {
        let removed = self
            .collections
            .get_mut(collection)
            .and_then(|mut c| c.docs.remove(key));
        Ok(DeleteOutcome {
            deleted: u64::from(removed.is_some()),
        })
    }

    async fn scan(&self, collection: &str) -> GraphResult<Vec<(DocumentKey, Document)>> {
        Ok(self
            .collections
            .get(collection)
            .map(|c| {
                c.docs
                    .iter()
                    .map(|(key, doc)| (*key, doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}
