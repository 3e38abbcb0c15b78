//! Error types for the assembled client.

use board_config_and_utils::CoreError;
use feed_sync::FeedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] CoreError),

    /// Only the in-memory backend can be wired up.
    #[error("Unsupported backend scheme: {0}")]
    UnsupportedBackend(String),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Timed out waiting for the feed")]
    Timeout,
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
