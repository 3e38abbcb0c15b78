//! Post list with loading and empty states.

use feed_sync::{FeedState, FeedStatus};

use crate::components::post;
use crate::node::{el, Element};
use crate::state::UiSnapshot;

pub const NO_POSTS: &str = "No posts yet";

/// Renders the post list and the spinner above it.
///
/// A failed feed keeps showing its last good posts; the failure itself is
/// reported through the message area.
pub fn render(feed: &FeedState, ui: &UiSnapshot) -> Element {
    let spinner = feed.is_loading().then(|| {
        el("div")
            .id("loadingSpinner")
            .class("spinner")
            .text("Loading...")
    });

    let list = el("div")
        .id("postsList")
        .attr("data-sort", feed.view.sort.as_str())
        .class_if(matches!(feed.status, FeedStatus::Failed(_)), "stale");

    let list = if feed.view.is_empty() && !feed.is_loading() {
        list.child(el("p").class("no-posts").text(NO_POSTS))
    } else {
        list.children(
            feed.view
                .posts
                .iter()
                .map(|p| post::render(p, ui.viewer.as_ref(), &ui.post(&p.id))),
        )
    };

    el("section").class("feed").child_opt(spinner).child(list)
}
