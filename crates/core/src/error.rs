//! Error taxonomy for graph operations
//!
//! Every failure a caller can observe is one [`GraphError`] variant, and each
//! variant maps to exactly one stable [`ErrorKind`]. Compound failures
//! (`PartialEdgeFailure`, `CleanupFailed`) keep the error that caused them as
//! their [`std::error::Error::source`].
//!
//! Nothing in the core retries. [`GraphError::is_retryable`] tells the caller
//! which kinds are worth another attempt.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Errors produced by the graph storage layer
#[derive(Debug, Error)]
pub enum GraphError {
    /// Boundary input is not a syntactically valid identifier
    #[error("invalid identifier '{raw}': {reason}")]
    InvalidIdentifier {
        /// The rejected input, verbatim
        raw: String,
        /// Why it was rejected
        reason: String,
    },

    /// The referenced user does not exist
    #[error("user not found: {id}")]
    NotFound {
        /// Encoded identifier of the missing user
        id: String,
    },

    /// A user was asked to befriend itself
    #[error("user {id} cannot be its own friend")]
    SelfReferenceConflict {
        /// Encoded identifier of the user
        id: String,
    },

    /// One side of an edge write did not apply
    #[error("failed to add {friend_id} to the friends of {user_id}: {reason}")]
    EdgeWriteFailed {
        /// User whose friend set was being written
        user_id: String,
        /// Friend being added
        friend_id: String,
        /// What the backend reported
        reason: String,
    },

    /// The first side of a two-step edge write applied and the second did not
    #[error("edge {source_id} <-> {target_id} left asymmetric: {cause}")]
    PartialEdgeFailure {
        /// Side whose write applied
        source_id: String,
        /// Side whose write failed
        target_id: String,
        /// Failure of the second write
        #[source]
        cause: Box<GraphError>,
    },

    /// A user was deleted but the friend-set sweep failed
    #[error("user {id} was deleted but friend-list cleanup failed: {cause}")]
    CleanupFailed {
        /// Encoded identifier of the deleted user
        id: String,
        /// Failure of the sweep
        #[source]
        cause: Box<GraphError>,
    },

    /// A backend call ran past its deadline
    #[error("backend {operation} exceeded its {timeout_ms}ms deadline")]
    BackendTimeout {
        /// Backend operation name
        operation: String,
        /// Deadline that was exceeded
        timeout_ms: u64,
    },

    /// The backend reported an error
    #[error("backend {operation} failed: {message}")]
    BackendFailure {
        /// Backend operation name
        operation: String,
        /// Backend error message
        message: String,
    },

    /// An insert succeeded but yielded no usable key
    #[error("backend did not return a usable key: {message}")]
    IdentityAssignmentFailure {
        /// What was wrong with the returned key
        message: String,
    },
}

impl GraphError {
    /// Create an InvalidIdentifier error
    pub fn invalid_identifier(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        GraphError::InvalidIdentifier {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(id: impl fmt::Display) -> Self {
        GraphError::NotFound { id: id.to_string() }
    }

    /// Create a SelfReferenceConflict error
    pub fn self_reference(id: impl fmt::Display) -> Self {
        GraphError::SelfReferenceConflict { id: id.to_string() }
    }

    /// Create an EdgeWriteFailed error
    pub fn edge_write_failed(
        user_id: impl fmt::Display,
        friend_id: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        GraphError::EdgeWriteFailed {
            user_id: user_id.to_string(),
            friend_id: friend_id.to_string(),
            reason: reason.into(),
        }
    }

    /// Create a PartialEdgeFailure wrapping the failure of the second write
    pub fn partial_edge(
        source_id: impl fmt::Display,
        target_id: impl fmt::Display,
        cause: GraphError,
    ) -> Self {
        GraphError::PartialEdgeFailure {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Create a CleanupFailed error wrapping the sweep failure
    pub fn cleanup_failed(id: impl fmt::Display, cause: GraphError) -> Self {
        GraphError::CleanupFailed {
            id: id.to_string(),
            cause: Box::new(cause),
        }
    }

    /// Create a BackendTimeout error
    pub fn backend_timeout(operation: impl Into<String>, timeout: Duration) -> Self {
        GraphError::BackendTimeout {
            operation: operation.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Create a BackendFailure error
    pub fn backend(operation: impl Into<String>, message: impl Into<String>) -> Self {
        GraphError::BackendFailure {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an IdentityAssignmentFailure error
    pub fn identity_assignment(message: impl Into<String>) -> Self {
        GraphError::IdentityAssignmentFailure {
            message: message.into(),
        }
    }

    /// The stable kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            GraphError::InvalidIdentifier { .. } => ErrorKind::InvalidIdentifier,
            GraphError::NotFound { .. } => ErrorKind::NotFound,
            GraphError::SelfReferenceConflict { .. } => ErrorKind::SelfReferenceConflict,
            GraphError::EdgeWriteFailed { .. } => ErrorKind::EdgeWriteFailed,
            GraphError::PartialEdgeFailure { .. } => ErrorKind::PartialEdgeFailure,
            GraphError::CleanupFailed { .. } => ErrorKind::CleanupFailed,
            GraphError::BackendTimeout { .. } => ErrorKind::BackendTimeout,
            GraphError::BackendFailure { .. } => ErrorKind::BackendFailure,
            GraphError::IdentityAssignmentFailure { .. } => ErrorKind::IdentityAssignmentFailure,
        }
    }

    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, GraphError::NotFound { .. })
    }
}

/// Stable, copyable classification of a [`GraphError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Malformed identifier at the boundary
    InvalidIdentifier,
    /// Referenced user is absent
    NotFound,
    /// Self-edge rejected
    SelfReferenceConflict,
    /// Single-side edge write did not apply
    EdgeWriteFailed,
    /// Asymmetric edge left behind
    PartialEdgeFailure,
    /// Sweep after delete failed
    CleanupFailed,
    /// Deadline exceeded
    BackendTimeout,
    /// Backend error
    BackendFailure,
    /// Insert returned no usable key
    IdentityAssignmentFailure,
}

impl ErrorKind {
    /// Name of the kind, as shown at the boundary
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidIdentifier => "InvalidIdentifier",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::SelfReferenceConflict => "SelfReferenceConflict",
            ErrorKind::EdgeWriteFailed => "EdgeWriteFailed",
            ErrorKind::PartialEdgeFailure => "PartialEdgeFailure",
            ErrorKind::CleanupFailed => "CleanupFailed",
            ErrorKind::BackendTimeout => "BackendTimeout",
            ErrorKind::BackendFailure => "BackendFailure",
            ErrorKind::IdentityAssignmentFailure => "IdentityAssignmentFailure",
        }
    }

    /// Transient kinds: the same call may succeed later
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::BackendTimeout | ErrorKind::BackendFailure)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
