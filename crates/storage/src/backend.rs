//! Document backend contract
//!
//! The graph layer consumes a document store through [`DocumentBackend`]:
//! point lookup, insert with a generated key, single-document update,
//! collection-wide update, delete and a full scan. Each call is atomic for
//! the one document it touches and nothing more. The backend has no notion
//! of edges or referential integrity.
//!
//! Updates are expressed as [`Update`] operators with `$set`, `$addToSet`
//! and `$pull` semantics. [`Update::apply`] is the reference implementation
//! of those semantics, shared by the in-process backends.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use socialgraph_core::{Document, DocumentKey, GraphError, GraphResult};

/// A single-document update operator
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    /// Overwrite the listed fields, leave every other field untouched
    Set(Document),
    /// Append `value` to the array `field` unless it is already present
    AddToSet {
        /// Array field
        field: String,
        /// Element to insert
        value: Value,
    },
    /// Remove every occurrence of `value` from the array `field`
    Pull {
        /// Array field
        field: String,
        /// Element to remove
        value: Value,
    },
}

impl Update {
    /// `$set` the given fields
    pub fn set(fields: Document) -> Self {
        Update::Set(fields)
    }

    /// `$addToSet` one element
    pub fn add_to_set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Update::AddToSet {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `$pull` one element
    pub fn pull(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Update::Pull {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Operator name, for logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            Update::Set(_) => "$set",
            Update::AddToSet { .. } => "$addToSet",
            Update::Pull { .. } => "$pull",
        }
    }

    /// Apply this operator to a document in place.
    ///
    /// Returns whether the document changed.
    ///
    /// # Errors
    ///
    /// `BackendFailure` if `$addToSet`/`$pull` target a field that exists
    /// and is not an array.
    pub fn apply(&self, doc: &mut Document) -> GraphResult<bool> {
        match self {
            Update::Set(fields) => {
                let mut modified = false;
                for (name, value) in fields {
                    if doc.get(name) != Some(value) {
                        doc.insert(name.clone(), value.clone());
                        modified = true;
                    }
                }
                Ok(modified)
            }
            Update::AddToSet { field, value } => match doc.get_mut(field) {
                None => {
                    doc.insert(field.clone(), Value::Array(vec![value.clone()]));
                    Ok(true)
                }
                Some(Value::Array(items)) => {
                    if items.contains(value) {
                        Ok(false)
                    } else {
                        items.push(value.clone());
                        Ok(true)
                    }
                }
                Some(_) => Err(not_an_array(self, field)),
            },
            Update::Pull { field, value } => match doc.get_mut(field) {
                None => Ok(false),
                Some(Value::Array(items)) => {
                    let before = items.len();
                    items.retain(|item| item != value);
                    Ok(items.len() != before)
                }
                Some(_) => Err(not_an_array(self, field)),
            },
        }
    }
}

fn not_an_array(update: &Update, field: &str) -> GraphError {
    GraphError::backend(
        "update",
        format!("cannot apply {} to non-array field '{}'", update.name(), field),
    )
}

/// Result of an insert
#[derive(Debug, Clone, PartialEq)]
pub struct InsertOutcome {
    /// Key the backend assigned, in whatever form the backend reports it
    pub inserted_id: Value,
}

/// Result of an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Documents selected by the filter
    pub matched: u64,
    /// Documents actually changed
    pub modified: u64,
}

/// Result of a delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOutcome {
    /// Documents removed
    pub deleted: u64,
}

/// A document store addressed by backend-assigned keys
///
/// Implementations are shared across concurrent tasks, so every method
/// takes `&self`. Every method is atomic for the single document it
/// touches; `update_many` is atomic per document, not as a whole.
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Look up one document by key
    async fn find_one(&self, collection: &str, key: &DocumentKey)
        -> GraphResult<Option<Document>>;

    /// Insert a document, letting the backend assign its key
    async fn insert_one(&self, collection: &str, doc: Document) -> GraphResult<InsertOutcome>;

    /// Apply an update to the document with the given key
    async fn update_one(
        &self,
        collection: &str,
        key: &DocumentKey,
        update: Update,
    ) -> GraphResult<UpdateOutcome>;

    /// Apply an update to every document in the collection
    async fn update_many(&self, collection: &str, update: Update) -> GraphResult<UpdateOutcome>;

    /// Delete the document with the given key
    async fn delete_one(&self, collection: &str, key: &DocumentKey) -> GraphResult<DeleteOutcome>;

    /// Read every document in the collection
    async fn scan(&self, collection: &str) -> GraphResult<Vec<(DocumentKey, Document)>>;
}

#[async_trait]
impl<B: DocumentBackend + ?Sized> DocumentBackend for Arc<B> {
    async fn find_one(
        &self,
        collection: &str,
        key: &DocumentKey,
    ) -> GraphResult<Option<Document>> {
        (**self).find_one(collection, key).await
    }

    async fn insert_one(&self, collection: &str, doc: Document) -> GraphResult<InsertOutcome> {
        (**self).insert_one(collection, doc).await
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &DocumentKey,
        update: Update,
    ) -> GraphResult<UpdateOutcome> {
        (**self).update_one(collection, key, update).await
    }

    async fn update_many(&self, collection: &str, update: Update) -> GraphResult<UpdateOutcome> {
        (**self).update_many(collection, update).await
    }

    async fn delete_one(&self, collection: &str, key: &DocumentKey) -> GraphResult<DeleteOutcome> {
        (**self).delete_one(collection, key).await
    }

    async fn scan(&self, collection: &str) -> GraphResult<Vec<(DocumentKey, Document)>> {
        (**self).scan(collection).await
    }
}
