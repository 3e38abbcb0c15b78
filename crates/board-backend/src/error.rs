//! Error types for backend collaborators.

use thiserror::Error;

/// Errors reported by the database, storage or auth backend.
///
/// The type is `Clone` so a single cancellation can be delivered to every
/// listener on a path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Transport failure (offline, timeout, connection reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend's security rules rejected the request.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Authentication failure.
    ///
    /// `code` is the backend's machine-readable code (e.g.
    /// `auth/wrong-password`); either part may be missing.
    #[error("Auth error: {}", message.as_deref().or(code.as_deref()).unwrap_or("unknown"))]
    Auth {
        code: Option<String>,
        message: Option<String>,
    },

    /// File upload failed.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// A value could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(String),
}

impl BackendError {
    /// Creates an auth error with both a code and a message.
    pub fn auth(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Auth {
            code: Some(code.into()),
            message: Some(message.into()),
        }
    }

    /// Returns true if retrying the same request could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Convenience Result type alias for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
