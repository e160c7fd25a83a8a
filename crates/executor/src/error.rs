//! Boundary error type.
//!
//! Every failure returned by the executor has a stable `kind` string and an
//! HTTP-style status class, so callers can branch on either without looking
//! at messages.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned by command execution.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind")]
pub enum Error {
    /// Malformed identifier.
    #[error("invalid identifier '{raw}': {reason}")]
    InvalidIdentifier {
        /// Rejected input.
        raw: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Referenced user does not exist.
    #[error("user not found: {id}")]
    NotFound {
        /// Identifier of the missing user.
        id: String,
    },

    /// A user cannot befriend itself.
    #[error("user {id} cannot be its own friend")]
    SelfReferenceConflict {
        /// Identifier of the user.
        id: String,
    },

    /// One side of an edge write did not apply.
    #[error("edge write failed: {reason}")]
    EdgeWriteFailed {
        /// Details.
        reason: String,
    },

    /// A friendship was left one-sided.
    #[error("edge {source_id} <-> {target_id} left asymmetric: {reason}")]
    PartialEdgeFailure {
        /// Side whose write applied.
        source_id: String,
        /// Side whose write failed.
        target_id: String,
        /// Why the second write failed.
        reason: String,
    },

    /// User deleted, friend-list sweep failed.
    #[error("user {id} was deleted but cleanup failed: {reason}")]
    CleanupFailed {
        /// Identifier of the deleted user.
        id: String,
        /// Why the sweep failed.
        reason: String,
    },

    /// Backend call exceeded its deadline.
    #[error("backend {operation} timed out after {timeout_ms}ms")]
    BackendTimeout {
        /// Backend operation.
        operation: String,
        /// Deadline in milliseconds.
        timeout_ms: u64,
    },

    /// Backend reported an error.
    #[error("backend {operation} failed: {reason}")]
    BackendFailure {
        /// Backend operation.
        operation: String,
        /// Backend message.
        reason: String,
    },

    /// Insert returned no usable key.
    #[error("identity assignment failed: {reason}")]
    IdentityAssignmentFailure {
        /// Details.
        reason: String,
    },

    /// Request could not be parsed.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Details.
        reason: String,
    },

    /// Unexpected internal failure.
    #[error("internal error: {reason}")]
    Internal {
        /// Details.
        reason: String,
    },
}

impl Error {
    /// Stable name of this error's kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::InvalidIdentifier { .. } => "InvalidIdentifier",
            Error::NotFound { .. } => "NotFound",
            Error::SelfReferenceConflict { .. } => "SelfReferenceConflict",
            Error::EdgeWriteFailed { .. } => "EdgeWriteFailed",
            Error::PartialEdgeFailure { .. } => "PartialEdgeFailure",
            Error::CleanupFailed { .. } => "CleanupFailed",
            Error::BackendTimeout { .. } => "BackendTimeout",
            Error::BackendFailure { .. } => "BackendFailure",
            Error::IdentityAssignmentFailure { .. } => "IdentityAssignmentFailure",
            Error::InvalidInput { .. } => "InvalidInput",
            Error::Internal { .. } => "Internal",
        }
    }

    /// HTTP-style status class.
    pub fn status(&self) -> u16 {
        match self {
            Error::InvalidIdentifier { .. } | Error::InvalidInput { .. } => 400,
            Error::NotFound { .. } => 404,
            Error::SelfReferenceConflict { .. } | Error::EdgeWriteFailed { .. } => 409,
            Error::PartialEdgeFailure { .. }
            | Error::CleanupFailed { .. }
            | Error::Internal { .. } => 500,
            Error::BackendFailure { .. } | Error::IdentityAssignmentFailure { .. } => 502,
            Error::BackendTimeout { .. } => 504,
        }
    }

    /// Whether the same request may succeed if sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::BackendTimeout { .. } | Error::BackendFailure { .. }
        )
    }
}
