//! # Mutation Coordinator
//!
//! Validated writes to the posts collection: create, edit, delete, like and
//! comment.
//!
//! ```text
//! UI action ──> validate ──> InFlightGuard ──> Database / FileStorage
//!                  │                               │
//!                  └──> NoticeBoard <── outcome ───┴──> NotificationSink (like/comment)
//! ```
//!
//! Nothing is sent when the session or the input is invalid. Backend
//! failures roll back the UI state the operation touched (disabled controls,
//! the "deleting" marker) and are reported; nothing is retried.

mod coordinator;
mod error;

pub use coordinator::{MutationContext, MutationCoordinator};
pub use error::{MutationError, MutationKind, MutationResult};

#[cfg(test)]
mod tests;
