//! Input validation.
//!
//! Validation runs before any backend call. A failed check never reaches the
//! network and is surfaced to the user immediately.

use thiserror::Error;

/// Default maximum post length, in characters.
pub const MAX_CONTENT_LENGTH: usize = 1000;

/// Default minimum password length for registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validation failures. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some content")]
    EmptyContent,

    #[error("Content must be {max} characters or fewer (got {len})")]
    ContentTooLong { len: usize, max: usize },

    #[error("Please enter a comment")]
    EmptyComment,

    #[error("Please enter your email address")]
    MissingEmail,

    #[error("Please enter your password")]
    MissingPassword,

    #[error("Password must be at least {min} characters")]
    WeakPassword { min: usize },
}

/// Configurable input limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_content_length: usize,
    pub min_password_length: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_content_length: MAX_CONTENT_LENGTH,
            min_password_length: MIN_PASSWORD_LENGTH,
        }
    }
}

impl Limits {
    /// Post content must be non-blank and at most `max_content_length` characters.
    ///
    /// The length check counts the raw text, surrounding whitespace included.
    pub fn validate_content(&self, content: &str) -> Result<(), ValidationError> {
        if content.trim().is_empty() {
            return Err(ValidationError::EmptyContent);
        }
        let len = content.chars().count();
        if len > self.max_content_length {
            return Err(ValidationError::ContentTooLong {
                len,
                max: self.max_content_length,
            });
        }
        Ok(())
    }

    pub fn validate_comment(&self, text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyComment);
        }
        Ok(())
    }

    /// Credentials check. Password strength is only enforced on registration.
    pub fn validate_auth_input(
        &self,
        email: &str,
        password: &str,
        is_register: bool,
    ) -> Result<(), ValidationError> {
        if email.trim().is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if password.trim().is_empty() {
            return Err(ValidationError::MissingPassword);
        }
        if is_register && password.chars().count() < self.min_password_length {
            return Err(ValidationError::WeakPassword {
                min: self.min_password_length,
            });
        }
        Ok(())
    }
}

/// Validates post content against the default limits.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    Limits::default().validate_content(content)
}
