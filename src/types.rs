//! Public types for the SocialGraph API.
//!
//! This module re-exports types from internal crates with a clean public interface.

// ============================================================================
// Identifiers and records
// ============================================================================

pub use socialgraph_core::{DocumentKey, NewUser, User, UserId, UserPatch};

// ============================================================================
// Errors
// ============================================================================

pub use socialgraph_core::{ErrorKind, GraphError, GraphResult};

// ============================================================================
// Configuration and integrity
// ============================================================================

pub use socialgraph_engine::{ConfigError, GraphConfig, RepairAction, RepairPolicy, RepairReport};

// ============================================================================
// Boundary
// ============================================================================

pub use socialgraph_executor::{Command, Error, Output, Response};
