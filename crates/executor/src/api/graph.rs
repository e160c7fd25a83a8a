//! Social graph operations on the typed client.

use socialgraph_core::{User, UserId};
use socialgraph_engine::{RepairPolicy, RepairReport};

use super::SocialGraph;
use crate::{Command, Error, Output, Result};

fn unexpected(command: &str, output: Output) -> Error {
    Error::Internal {
        reason: format!("Unexpected output for {}: {:?}", command, output),
    }
}

impl SocialGraph {
    // =========================================================================
    // Users
    // =========================================================================

    /// Create a user and return its identifier.
    pub async fn create_user(&self, name: Option<&str>, age: Option<u32>) -> Result<UserId> {
        match self
            .executor
            .execute(Command::UserCreate {
                name: name.map(|s| s.to_string()),
                age,
            })
            .await?
        {
            Output::Id(id) => Ok(id),
            other => Err(unexpected("UserCreate", other)),
        }
    }

    /// Fetch a user.
    pub async fn get_user(&self, id: &str) -> Result<User> {
        match self
            .executor
            .execute(Command::UserGet { id: id.to_string() })
            .await?
        {
            Output::User(user) => Ok(user),
            other => Err(unexpected("UserGet", other)),
        }
    }

    /// Patch a user's name and/or age.
    pub async fn update_user(&self, id: &str, name: Option<&str>, age: Option<u32>) -> Result<()> {
        self.unit(
            "UserUpdate",
            Command::UserUpdate {
                id: id.to_string(),
                name: name.map(|s| s.to_string()),
                age,
                friends: None,
            },
        )
        .await
    }

    /// Delete a user.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.unit("UserDelete", Command::UserDelete { id: id.to_string() })
            .await
    }

    // =========================================================================
    // Friendships
    // =========================================================================

    /// Make two users friends.
    pub async fn make_friends(&self, source: &str, target: &str) -> Result<()> {
        self.unit(
            "FriendAdd",
            Command::FriendAdd {
                source: source.to_string(),
                target: target.to_string(),
            },
        )
        .await
    }

    /// End a friendship.
    pub async fn delete_friend(&self, source: &str, target: &str) -> Result<()> {
        self.unit(
            "FriendRemove",
            Command::FriendRemove {
                source: source.to_string(),
                target: target.to_string(),
            },
        )
        .await
    }

    /// A user's friends, sorted.
    pub async fn friends(&self, id: &str) -> Result<Vec<UserId>> {
        match self
            .executor
            .execute(Command::FriendList { id: id.to_string() })
            .await?
        {
            Output::Ids(ids) => Ok(ids),
            other => Err(unexpected("FriendList", other)),
        }
    }

    /// Run the repair pass; `None` uses the configured policy.
    pub async fn repair(&self, policy: Option<RepairPolicy>) -> Result<RepairReport> {
        match self.executor.execute(Command::Repair { policy }).await? {
            Output::Repair(report) => Ok(report),
            other => Err(unexpected("Repair", other)),
        }
    }

    async fn unit(&self, name: &str, command: Command) -> Result<()> {
        match self.executor.execute(command).await? {
            Output::Unit => Ok(()),
            other => Err(unexpected(name, other)),
        }
    }
}
