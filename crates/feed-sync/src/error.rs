//! Error types for the feed subscription.

use board_backend::BackendError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Attaching the listener or reading the collection failed.
    #[error("Feed backend error: {0}")]
    Backend(#[from] BackendError),
}

impl FeedError {
    /// Message shown in the notice area.
    pub fn user_message(&self) -> String {
        "Failed to load posts".to_string()
    }
}

/// Result type alias for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;
