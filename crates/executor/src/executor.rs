//! Command dispatch.

use serde::Serialize;

use socialgraph_engine::{GraphConfig, GraphStore};

use crate::handlers::{friends, users};
use crate::{Command, Error, Output, Result};

/// Dispatches [`Command`]s to the graph store.
///
/// Cheap to clone; every request can run as its own task.
#[derive(Debug, Clone)]
pub struct Executor {
    store: GraphStore,
}

impl Executor {
    /// Create an executor over `store`.
    pub fn new(store: GraphStore) -> Self {
        Self { store }
    }

    /// Create an executor over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(GraphStore::in_memory())
    }

    /// Create an executor over a fresh in-memory store with `config`.
    pub fn in_memory_with_config(config: GraphConfig) -> Self {
        Self::new(GraphStore::in_memory_with_config(config))
    }

    /// Execute one command.
    pub async fn execute(&self, command: Command) -> Result<Output> {
        let command_name = command.name();
        tracing::debug!(
            command = command_name,
            read_only = command.is_read_only(),
            "Executing command"
        );

        let result = match command {
            Command::UserCreate { name, age } => users::user_create(&self.store, name, age).await,
            Command::UserGet { id } => users::user_get(&self.store, id).await,
            Command::UserUpdate {
                id,
                name,
                age,
                friends,
            } => users::user_update(&self.store, id, name, age, friends).await,
            Command::UserDelete { id } => users::user_delete(&self.store, id).await,
            Command::FriendAdd { source, target } => {
                friends::friend_add(&self.store, source, target).await
            }
            Command::FriendList { id } => friends::friend_list(&self.store, id).await,
            Command::FriendRemove { source, target } => {
                friends::friend_remove(&self.store, source, target).await
            }
            Command::Repair { policy } => friends::repair(&self.store, policy).await,
        };

        if let Err(e) = &result {
            tracing::debug!(
                command = command_name,
                kind = e.kind(),
                error = %e,
                "Command failed"
            );
        }
        result
    }

    /// Execute a JSON-encoded command and return a JSON response.
    ///
    /// Never fails: parse errors come back as an `InvalidInput` response.
    pub async fn execute_json(&self, request: &str) -> Response {
        let command: Command = match serde_json::from_str(request) {
            Ok(command) => command,
            Err(e) => {
                return Response::from(Error::InvalidInput {
                    reason: e.to_string(),
                })
            }
        };
        match self.execute(command).await {
            Ok(output) => Response::Ok(output),
            Err(e) => Response::from(e),
        }
    }
}

/// Boundary response: an output or a classified error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    /// Success.
    Ok(Output),
    /// Failure.
    Error {
        /// HTTP-style status class.
        status: u16,
        /// Whether resending may succeed.
        retryable: bool,
        /// The error, tagged with its kind.
        error: Error,
    },
}

impl From<Error> for Response {
    fn from(error: Error) -> Self {
        Response::Error {
            status: error.status(),
            retryable: error.is_retryable(),
            error,
        }
    }
}

impl Response {
    /// Status class: 200 on success.
    pub fn status(&self) -> u16 {
        match self {
            Response::Ok(_) => 200,
            Response::Error { status, .. } => *status,
        }
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => json,
            Err(e) => serde_json::json!({
                "error": {
                    "status": 500,
                    "retryable": false,
                    "error": {"kind": "Internal", "reason": e.to_string()},
                }
            })
            .to_string(),
        }
    }
}
