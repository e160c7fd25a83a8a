//! Graph store configuration.
//!
//! Loaded from TOML; every field has a default so an empty file is valid.
//!
//! ```toml
//! collection = "users"
//! operation_timeout_ms = 5000
//! repair_policy = "restore"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use socialgraph_storage::DEFAULT_TIMEOUT;

use crate::graph::types::RepairPolicy;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Config text is not valid TOML for [`GraphConfig`]
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds an unusable value
    #[error("invalid config field '{field}': {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Configuration for a [`GraphStore`](crate::GraphStore)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Backend collection holding user documents
    pub collection: String,
    /// Deadline applied to every backend call, in milliseconds
    pub operation_timeout_ms: u64,
    /// What the repair pass does with one-sided friendships
    pub repair_policy: RepairPolicy,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            collection: "users".to_string(),
            operation_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            repair_policy: RepairPolicy::default(),
        }
    }
}

impl GraphConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the collection name
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the per-call deadline
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Set the repair policy
    pub fn repair_policy(mut self, policy: RepairPolicy) -> Self {
        self.repair_policy = policy;
        self
    }

    /// The per-call deadline as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.operation_timeout_ms)
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collection.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "collection",
                reason: "must not be empty".to_string(),
            });
        }
        if self.operation_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "operation_timeout_ms",
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
