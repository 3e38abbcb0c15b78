//! Errors raised by the auth flows.

use board_backend::BackendError;
use board_core::ValidationError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Credentials failed local validation; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The same auth request is already running.
    #[error("Request already in progress")]
    AlreadyInFlight,

    #[error("Auth backend error: {0}")]
    Backend(#[from] BackendError),
}

impl AuthError {
    /// Message shown in the notice area.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(err) => err.to_string(),
            Self::AlreadyInFlight => "Please wait for the current request to finish".to_string(),
            Self::Backend(err) => auth_error_message(err),
        }
    }
}

/// Translates a provider error into the message the user sees.
///
/// A machine-readable code wins, then a bare message, then a generic text.
pub fn auth_error_message(err: &BackendError) -> String {
    match err {
        BackendError::Auth {
            code: Some(code), ..
        } => format!("Authentication failed ({})", code),
        BackendError::Auth {
            message: Some(message),
            ..
        } => format!("Something went wrong: {}", message),
        BackendError::Auth { .. } => "Something went wrong".to_string(),
        BackendError::Network(message)
        | BackendError::PermissionDenied(message)
        | BackendError::NotFound(message)
        | BackendError::Upload(message)
        | BackendError::Json(message) => format!("Something went wrong: {}", message),
    }
}

/// Result type alias for auth flows.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_takes_precedence() {
        let err = BackendError::auth("auth/wrong-password", "bad password");
        assert_eq!(
            auth_error_message(&err),
            "Authentication failed (auth/wrong-password)"
        );
    }

    #[test]
    fn message_without_code() {
        let err = BackendError::Auth {
            code: None,
            message: Some("quota".into()),
        };
        assert_eq!(auth_error_message(&err), "Something went wrong: quota");
    }

    #[test]
    fn nothing_to_go_on() {
        let err = BackendError::Auth {
            code: None,
            message: None,
        };
        assert_eq!(auth_error_message(&err), "Something went wrong");
        assert_eq!(
            auth_error_message(&BackendError::Network("offline".into())),
            "Something went wrong: offline"
        );
    }

    #[test]
    fn validation_message_passes_through() {
        let err = AuthError::from(ValidationError::WeakPassword { min: 6 });
        assert_eq!(err.user_message(), "Password must be at least 6 characters");
    }
}
