//! Whole-page composition.

use feed_sync::FeedState;

use crate::components::{feed, forms};
use crate::node::{el, RenderNode};
use crate::state::UiSnapshot;

/// Renders the board page from the latest feed state and a UI snapshot.
pub fn render_page(state: &FeedState, ui: &UiSnapshot) -> RenderNode {
    el("div")
        .id("board")
        .child(forms::message_area(ui.notice.as_ref()))
        .child(forms::auth_bar(ui))
        .child_opt(forms::post_form(ui))
        .child(feed::render(state, ui))
        .child_opt(forms::modal(ui))
        .into()
}
