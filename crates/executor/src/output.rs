//! Command results.

use serde::{Deserialize, Serialize};

use socialgraph_core::{User, UserId};
use socialgraph_engine::RepairReport;

/// Successful result of a [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Output {
    /// Acknowledgement with no payload.
    Unit,
    /// Identifier of a created user.
    Id(UserId),
    /// A full user record.
    User(User),
    /// A list of identifiers, sorted.
    Ids(Vec<UserId>),
    /// Repair pass report.
    Repair(RepairReport),
}
