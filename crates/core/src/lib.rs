//! Core types for SocialGraph
//!
//! This crate defines the vocabulary every other layer speaks:
//! - [`GraphError`]: the error taxonomy surfaced to callers
//! - [`DocumentKey`] / [`UserId`]: backend keys and their opaque string form
//! - [`User`], [`NewUser`], [`UserPatch`]: the user record model
//!
//! Nothing here touches a backend. Storage and graph logic live in
//! `socialgraph-storage` and `socialgraph-engine`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod id;
pub mod types;

pub use error::{ErrorKind, GraphError, GraphResult};
pub use id::{decode, encode, is_canonical, DocumentKey, UserId, ENCODED_LEN, KEY_LEN};
pub use types::{fields, Document, NewUser, User, UserPatch};
