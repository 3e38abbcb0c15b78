//! # Board App
//!
//! Assembles the board client from its parts and exposes it as one
//! [`BoardApp`] context.
//!
//! ```text
//! Config ──> BoardApp
//!              ├── MemoryBackend (database, storage, auth)
//!              ├── SessionState <── auth stream ──> feed resubscribe
//!              ├── AuthController
//!              ├── FeedSubscriptionManager ──> FeedState
//!              ├── MutationCoordinator ──> NotificationEmitter
//!              └── render() ──> board_view::render_page
//! ```

mod app;
mod error;

pub use app::BoardApp;
pub use error::{AppError, AppResult};
