//! # Notification Emitter
//!
//! Writes a notification for a post's owner when someone else likes or
//! comments on it.
//!
//! ```text
//! MutationCoordinator ──notification_for()──> NotificationSink::emit ──spawn──> notifications/<key>
//! ```
//!
//! - **Fire-and-forget**: the write runs on its own task; a failure is
//!   logged and never reaches the mutation that triggered it.
//! - **Self-suppression**: decided before anything is spawned. Users never
//!   notify themselves, and posts without an owner notify nobody.

mod emitter;
mod sink;

pub use emitter::{notification_for, to_record, NotificationEmitter};
pub use sink::{NotificationSink, NullSink, RecordingSink};
