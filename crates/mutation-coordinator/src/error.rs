//! Error types for mutations.

use board_backend::BackendError;
use board_core::{PostId, ValidationError};
use thiserror::Error;

/// Which mutation failed, for user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Edit,
    Delete,
    Like,
    Comment,
}

impl MutationKind {
    pub fn verb(&self) -> &'static str {
        match self {
            Self::Create => "post",
            Self::Edit => "update",
            Self::Delete => "delete",
            Self::Like => "update like",
            Self::Comment => "comment",
        }
    }
}

impl std::fmt::Display for MutationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.verb())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MutationError {
    /// No identity is signed in.
    #[error("Not logged in")]
    NotLoggedIn,

    /// The signed-in identity does not own the post.
    #[error("Only the author can change this post")]
    NotOwner,

    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    /// Input failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The same submission is already running.
    #[error("Already in progress")]
    AlreadyInFlight,

    /// A modal confirm was triggered with no post selected.
    #[error("No post selected")]
    NothingSelected,

    /// The image upload failed, so the post was not written.
    #[error("Image upload failed: {0}")]
    Upload(#[source] BackendError),

    /// The backend rejected a read or write.
    #[error("Failed to {kind}: {source}")]
    Backend {
        kind: MutationKind,
        #[source]
        source: BackendError,
    },
}

impl MutationError {
    pub(crate) fn backend(kind: MutationKind) -> impl FnOnce(BackendError) -> Self {
        move |source| Self::Backend { kind, source }
    }

    /// Message shown in the notice area.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotLoggedIn => "Please log in first".to_string(),
            Self::NotOwner => "You can only change your own posts".to_string(),
            Self::PostNotFound(_) => "This post no longer exists".to_string(),
            Self::Validation(err) => err.to_string(),
            Self::AlreadyInFlight => "Please wait for the current request to finish".to_string(),
            Self::NothingSelected => "No post selected".to_string(),
            Self::Upload(err) => format!("Failed to post: {}", err),
            Self::Backend { .. } => self.to_string(),
        }
    }

    /// True if the error was raised before anything was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::NotLoggedIn
                | Self::Validation(_)
                | Self::AlreadyInFlight
                | Self::NothingSelected
                | Self::NotOwner
        )
    }
}

/// Result type alias for mutations.
pub type MutationResult<T> = Result<T, MutationError>;
