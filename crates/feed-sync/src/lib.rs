//! # Feed Sync
//!
//! Keeps a single live subscription to the posts collection and turns each
//! snapshot into an ordered feed.
//!
//! ```text
//! Database ──snapshot──> FeedSubscriptionManager ──reconcile──> FeedState (watch)
//!                              ^                                     │
//!                 subscribe / unsubscribe / sort change        renderer reads
//! ```
//!
//! Every snapshot rebuilds the feed from scratch. Nothing is patched
//! incrementally, so the view always reflects the latest server state.

mod error;
mod manager;
mod reconcile;

pub use error::{FeedError, FeedResult};
pub use manager::{normalize_tag, FeedState, FeedStatus, FeedSubscriptionManager};
pub use reconcile::{materialize, reconcile, FeedView};

#[cfg(test)]
mod tests;
