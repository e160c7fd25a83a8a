//! Error conversion from graph errors.
//!
//! This module provides the conversion from [`GraphError`] to the
//! executor's [`Error`] type.

use socialgraph_core::{GraphError, GraphResult};

use crate::Error;

/// Convert a GraphError to an executor Error.
///
/// Each core kind maps to the boundary variant of the same name. Compound
/// errors flatten their cause into `reason`.
impl From<GraphError> for Error {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::InvalidIdentifier { raw, reason } => {
                Error::InvalidIdentifier { raw, reason }
            }

            GraphError::NotFound { id } => Error::NotFound { id },

            GraphError::SelfReferenceConflict { id } => Error::SelfReferenceConflict { id },

            edge @ GraphError::EdgeWriteFailed { .. } => Error::EdgeWriteFailed {
                reason: edge.to_string(),
            },

            GraphError::PartialEdgeFailure {
                source_id,
                target_id,
                cause,
            } => Error::PartialEdgeFailure {
                source_id,
                target_id,
                reason: cause.to_string(),
            },

            GraphError::CleanupFailed { id, cause } => Error::CleanupFailed {
                id,
                reason: cause.to_string(),
            },

            GraphError::BackendTimeout {
                operation,
                timeout_ms,
            } => Error::BackendTimeout {
                operation,
                timeout_ms,
            },

            GraphError::BackendFailure { operation, message } => Error::BackendFailure {
                operation,
                reason: message,
            },

            GraphError::IdentityAssignmentFailure { message } => {
                Error::IdentityAssignmentFailure { reason: message }
            }
        }
    }
}

/// Convert a GraphResult to an executor Result.
pub fn convert_result<T>(result: GraphResult<T>) -> crate::Result<T> {
    result.map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_kind_names_match_core() {
        let errors = [
            GraphError::invalid_identifier("x", "short"),
            GraphError::not_found("a"),
            GraphError::self_reference("a"),
            GraphError::edge_write_failed("a", "b", "gone"),
            GraphError::partial_edge("a", "b", GraphError::backend("update_one", "reset")),
            GraphError::cleanup_failed("a", GraphError::backend("update_many", "reset")),
            GraphError::backend_timeout("find_one", Duration::from_secs(5)),
            GraphError::backend("insert_one", "reset"),
            GraphError::identity_assignment("number"),
        ];
        for err in errors {
            let kind = err.kind();
            let retryable = err.is_retryable();
            let converted = Error::from(err);
            assert_eq!(converted.kind(), kind.as_str());
            assert_eq!(converted.is_retryable(), retryable);
        }
    }

    #[test]
    fn test_partial_edge_keeps_cause() {
        let err = GraphError::partial_edge(
            "aaa",
            "bbb",
            GraphError::backend_timeout("update_one", Duration::from_millis(10)),
        );
        match Error::from(err) {
            Error::PartialEdgeFailure {
                source_id,
                target_id,
                reason,
            } => {
                assert_eq!(source_id, "aaa");
                assert_eq!(target_id, "bbb");
                assert!(reason.contains("10ms"));
            }
            other => panic!("Expected PartialEdgeFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_convert_result() {
        let ok: GraphResult<u8> = Ok(1);
        assert_eq!(convert_result(ok).unwrap(), 1);

        let err: GraphResult<u8> = Err(GraphError::not_found("abc"));
        assert_eq!(convert_result(err).unwrap_err().status(), 404);
    }
}
