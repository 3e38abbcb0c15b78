//! # Board Core
//!
//! Shared domain types for the posting board client.
//!
//! ## Crate Structure
//!
//! - [`types`] - Posts, comments, identities, notifications, sort policy
//! - [`hashtags`] - Hashtag extraction from post content
//! - [`validation`] - Input validation run before any network call
//! - [`ui`] - Control enablement, transient notices and form drafts
//!
//! Everything here is backend-agnostic. Crates that talk to the backend
//! (`board-backend`, `feed-sync`, `mutation-coordinator`) build on these types.

pub mod hashtags;
pub mod types;
pub mod ui;
pub mod validation;

pub use hashtags::extract_hashtags;
pub use types::{
    can_mutate, Comment, Identity, LocalFile, Notification, NotificationKind, Post, PostId,
    SortOrder, UserId,
};
pub use ui::{
    CharCount, Control, ControlPanel, Drafts, InFlightGuard, Modal, Notice, NoticeBoard, NoticeKind,
};
pub use validation::{Limits, ValidationError};
