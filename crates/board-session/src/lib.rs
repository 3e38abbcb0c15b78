//! # Board Session
//!
//! The single authoritative "who is signed in" value, and the flows that
//! change it.
//!
//! - [`SessionState`] is replaced wholesale on every auth-stream emission and
//!   read at the moment an action needs it.
//! - [`bind_auth_stream`] forwards the provider's auth-state stream into it.
//! - [`AuthController`] runs login, registration and logout with input
//!   validation and user-facing error messages.

mod controller;
mod error;
mod session;
mod stream;

pub use controller::AuthController;
pub use error::{auth_error_message, AuthError, AuthResult};
pub use session::SessionState;
pub use stream::bind_auth_stream;
