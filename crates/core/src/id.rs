//! Identifier codec
//!
//! The backend addresses documents by a 12-byte [`DocumentKey`]. At the
//! boundary that key travels as an opaque 24-character hex string. This
//! module is the only place the two forms are converted, and therefore the
//! only place that decides whether a string is a valid identifier.
//!
//! [`UserId`] is the boundary type: a key that has already passed
//! [`decode`]. Holding a `UserId` means the string was well-formed, not that
//! the user exists.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{GraphError, GraphResult};

/// Length of a backend key in bytes
pub const KEY_LEN: usize = 12;

/// Length of the encoded (hex) form of a key
pub const ENCODED_LEN: usize = KEY_LEN * 2;

/// Backend key of a stored document
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey([u8; KEY_LEN]);

impl DocumentKey {
    /// Create a key from raw bytes
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        DocumentKey(bytes)
    }

    /// Raw bytes of the key
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentKey({})", encode(self))
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(self))
    }
}

/// Decode the boundary string form into a backend key.
///
/// Accepts exactly [`ENCODED_LEN`] hex digits, either case.
///
/// # Errors
///
/// `InvalidIdentifier` on a wrong length or a non-hex character.
pub fn decode(raw: &str) -> GraphResult<DocumentKey> {
    let bytes = raw.as_bytes();
    if bytes.len() != ENCODED_LEN {
        return Err(GraphError::invalid_identifier(
            raw,
            format!(
                "expected {} hex characters, got {} bytes",
                ENCODED_LEN,
                bytes.len()
            ),
        ));
    }

    let mut key = [0u8; KEY_LEN];
    hex::decode_to_slice(bytes, &mut key).map_err(|e| match e {
        hex::FromHexError::InvalidHexCharacter { index, .. } => GraphError::invalid_identifier(
            raw,
            format!("non-hex character at byte {}", index),
        ),
        other => GraphError::invalid_identifier(raw, other.to_string()),
    })?;
    Ok(DocumentKey(key))
}

/// Encode a backend key into its boundary string form (lower-case hex).
pub fn encode(key: &DocumentKey) -> String {
    hex::encode(key.as_bytes())
}

/// Whether `raw` is already in the form [`encode`] produces.
pub fn is_canonical(raw: &str) -> bool {
    decode(raw).map_or(false, |key| encode(&key) == raw)
}

/// Identifier of a user, as exposed at the boundary
///
/// Serializes as its encoded string. Deserializing runs [`decode`], so a
/// malformed identifier never makes it into a typed payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(DocumentKey);

impl UserId {
    /// Parse a boundary string into a user ID
    pub fn parse(raw: &str) -> GraphResult<Self> {
        decode(raw).map(UserId)
    }

    /// The backend key this ID addresses
    pub fn key(&self) -> &DocumentKey {
        &self.0
    }
}

impl From<DocumentKey> for UserId {
    fn from(key: DocumentKey) -> Self {
        UserId(key)
    }
}

impl fmt::Debug for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UserId({})", encode(&self.0))
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&encode(&self.0))
    }
}

impl FromStr for UserId {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UserId::parse(s)
    }
}

impl Serialize for UserId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        UserId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
