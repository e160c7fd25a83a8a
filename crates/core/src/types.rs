//! User record model
//!
//! A user is stored as a schema-less JSON document. Only fields carrying a
//! non-default value are ever written, and friend entries are stored as
//! encoded identifier strings. The document key lives in the backend, never
//! in the document body.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{GraphError, GraphResult};
use crate::id::{DocumentKey, UserId};

/// A schema-less stored document
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Field names used in user documents
pub mod fields {
    /// Display name
    pub const NAME: &str = "name";
    /// Age in years
    pub const AGE: &str = "age";
    /// Array of encoded friend identifiers
    pub const FRIENDS: &str = "friends";
    /// Identity fields that are never written through a patch
    pub const IDENTITY: [&str; 2] = ["id", "_id"];
}

/// A user: one node of the social graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend-assigned identifier
    pub id: UserId,
    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Age in years
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Identifiers of this user's friends
    #[serde(default)]
    pub friends: BTreeSet<UserId>,
}

/// Shape of a stored document body
#[derive(Deserialize)]
struct StoredUser {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    age: Option<u32>,
    #[serde(default)]
    friends: BTreeSet<UserId>,
}

impl User {
    /// Rebuild a user from its backend key and stored document.
    ///
    /// Empty names and zero ages read back as absent, matching how they are
    /// (not) written.
    ///
    /// # Errors
    ///
    /// `BackendFailure` (operation `decode`) if the document does not have
    /// the user shape.
    pub fn from_document(key: DocumentKey, doc: Document) -> GraphResult<Self> {
        let stored: StoredUser = serde_json::from_value(serde_json::Value::Object(doc))
            .map_err(|e| {
                GraphError::backend("decode", format!("document {}: {}", key, e))
            })?;
        Ok(User {
            id: UserId::from(key),
            name: stored.name.filter(|n| !n.is_empty()),
            age: stored.age.filter(|a| *a != 0),
            friends: stored.friends,
        })
    }

    /// Check whether `other` is in this user's friend set
    pub fn is_friend_of(&self, other: &UserId) -> bool {
        self.friends.contains(other)
    }
}

/// Payload for creating a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Age in years
    #[serde(default)]
    pub age: Option<u32>,
}

impl NewUser {
    /// A new user with only a name
    pub fn named(name: impl Into<String>) -> Self {
        NewUser {
            name: Some(name.into()),
            age: None,
        }
    }

    /// Set the age
    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// The document to insert: non-default fields only, no friends yet
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            doc.insert(fields::NAME.to_string(), name.clone().into());
        }
        if let Some(age) = self.age.filter(|a| *a != 0) {
            doc.insert(fields::AGE.to_string(), age.into());
        }
        doc
    }
}

/// Field-level update for a user
///
/// Absent or zero-valued fields (empty name, zero age, empty friend set)
/// leave the stored field untouched. An `id` in the payload is accepted and
/// ignored: identity is never patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// Ignored identity field
    #[serde(default, alias = "_id", skip_serializing)]
    pub id: Option<String>,
    /// New display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New age
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Replacement friend set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friends: Option<BTreeSet<UserId>>,
}

impl UserPatch {
    /// An empty patch
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the age
    pub fn age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    /// Replace the friend set
    pub fn friends(mut self, friends: impl IntoIterator<Item = UserId>) -> Self {
        self.friends = Some(friends.into_iter().collect());
        self
    }

    /// Fields to `$set`: every non-default field, never an identity field
    pub fn set_fields(&self) -> Document {
        let mut doc = Document::new();
        if let Some(name) = self.name.as_ref().filter(|n| !n.is_empty()) {
            doc.insert(fields::NAME.to_string(), name.clone().into());
        }
        if let Some(age) = self.age.filter(|a| *a != 0) {
            doc.insert(fields::AGE.to_string(), age.into());
        }
        if let Some(friends) = self.friends.as_ref().filter(|f| !f.is_empty()) {
            let encoded: Vec<serde_json::Value> =
                friends.iter().map(|f| f.to_string().into()).collect();
            doc.insert(fields::FRIENDS.to_string(), encoded.into());
        }
        for identity in fields::IDENTITY {
            doc.remove(identity);
        }
        doc
    }

    /// True if applying this patch would change nothing
    pub fn is_noop(&self) -> bool {
        self.set_fields().is_empty()
    }

    /// True if the patch's friend set names `id`
    pub fn references(&self, id: &UserId) -> bool {
        self.friends
            .as_ref()
            .map(|f| f.contains(id))
            .unwrap_or(false)
    }
}
