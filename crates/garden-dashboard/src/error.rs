//! Dashboard errors

use garden_activity::ActivityError;
use garden_core::TaskId;
use garden_store::StoreError;
use std::path::PathBuf;

/// Dashboard operation failure
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Store call failed (after retries, when retryable)
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Routine rule rejected the operation
    #[error("activity error: {0}")]
    Activity(#[from] ActivityError),

    /// Task id not found
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Configuration problem
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Tracing subscriber could not be installed
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl DashboardError {
    /// Check if retrying the whole operation may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_retryable())
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        /// Config path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// File is not valid TOML for the config schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}
