//! Store errors

use garden_core::{TaskId, UserId};
use std::io;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Backend temporarily unreachable
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Filesystem error
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Stored document could not be decoded
    #[error("corrupt document for user {user}: {source}")]
    Corrupt {
        /// Owner of the document
        user: UserId,
        /// Decode error
        #[source]
        source: serde_json::Error,
    },

    /// Document could not be encoded
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// User id unusable as a storage key
    #[error("invalid user id: {0:?}")]
    InvalidUser(String),

    /// Task not present in the user's document
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
}

impl StoreError {
    /// Check if retrying the same call may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable(_) => true,
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::Interrupted | io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            Self::Corrupt { .. }
            | Self::Serialization(_)
            | Self::InvalidUser(_)
            | Self::TaskNotFound(_) => false,
        }
    }
}
