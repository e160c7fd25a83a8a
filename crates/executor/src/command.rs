//! Commands accepted by the executor.
//!
//! Identifiers travel as raw strings; they are decoded (and rejected with
//! `InvalidIdentifier`) by the graph layer, never here.

use serde::{Deserialize, Serialize};

use socialgraph_engine::RepairPolicy;

/// A request to the social graph.
///
/// Serialized externally tagged:
///
/// ```json
/// {"FriendAdd": {"source": "65a1f0c2e4b0a1b2c3d4e5f6", "target": "65a1f0c2e4b0a1b2c3d4e5f7"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Create a user. Returns `Output::Id`.
    UserCreate {
        /// Display name.
        #[serde(default)]
        name: Option<String>,
        /// Age in years.
        #[serde(default)]
        age: Option<u32>,
    },

    /// Fetch a user. Returns `Output::User`.
    UserGet {
        /// User identifier.
        id: String,
    },

    /// Patch a user's fields. Absent or zero values are left alone.
    /// Returns `Output::Unit`.
    UserUpdate {
        /// User identifier.
        id: String,
        /// New name.
        #[serde(default)]
        name: Option<String>,
        /// New age.
        #[serde(default)]
        age: Option<u32>,
        /// Replacement friend set.
        #[serde(default)]
        friends: Option<Vec<String>>,
    },

    /// Delete a user and sweep it from every friend set.
    /// Returns `Output::Unit`.
    UserDelete {
        /// User identifier.
        id: String,
    },

    /// Make two users friends. Returns `Output::Unit`.
    FriendAdd {
        /// First user.
        source: String,
        /// Second user.
        target: String,
    },

    /// List a user's friends. Returns `Output::Ids`.
    FriendList {
        /// User identifier.
        id: String,
    },

    /// End a friendship. Returns `Output::Unit`.
    FriendRemove {
        /// First user.
        source: String,
        /// Second user.
        target: String,
    },

    /// Run the repair pass. Returns `Output::Repair`.
    Repair {
        /// Overrides the configured policy.
        #[serde(default)]
        policy: Option<RepairPolicy>,
    },
}

impl Command {
    /// Command name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Command::UserCreate { .. } => "UserCreate",
            Command::UserGet { .. } => "UserGet",
            Command::UserUpdate { .. } => "UserUpdate",
            Command::UserDelete { .. } => "UserDelete",
            Command::FriendAdd { .. } => "FriendAdd",
            Command::FriendList { .. } => "FriendList",
            Command::FriendRemove { .. } => "FriendRemove",
            Command::Repair { .. } => "Repair",
        }
    }

    /// True if the command never writes.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Command::UserGet { .. } | Command::FriendList { .. })
    }
}
