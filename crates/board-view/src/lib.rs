//! # Board View
//!
//! Pure presentation: feed state and UI state in, render tree out.
//!
//! ```text
//! FeedState ─┐
//!            ├──> render_page() ──> RenderNode ──> to_html()
//! UiSnapshot ┘
//! ```
//!
//! Nothing here reads live handles or talks to the backend. The caller
//! captures a [`UiSnapshot`] and renders again whenever the feed or the UI
//! state changes.

pub mod components;
mod format;
mod node;
mod page;
mod state;

pub use format::{escape_html, format_timestamp};
pub use node::{el, text, Element, RenderNode};
pub use page::render_page;
pub use state::{PostUi, UiSnapshot};
