//! # Board Backend
//!
//! Contracts for the external collaborators of the board client: the
//! realtime tree database, blob storage and the auth provider.
//!
//! ```text
//! MutationCoordinator ─┐
//! FeedSubscription ────┼──> Database / FileStorage / AuthService
//! AuthController ──────┘          └── memory::* (tests, demo)
//! ```

mod error;
pub mod memory;
mod traits;
mod value;

pub use error::{BackendError, BackendResult};
pub use traits::{AuthService, Database, FileStorage, ListenEvent, Listener, ListenerId};
pub use value::{child, overlaps, segments, ServerValue};

/// Path of the posts collection.
pub const POSTS_PATH: &str = "posts";

/// Path of the notifications collection.
pub const NOTIFICATIONS_PATH: &str = "notifications";

/// Storage folder for post images.
pub const IMAGES_PATH: &str = "images";
