//! A single post card.

use board_core::{can_mutate, Identity, Post};

use crate::format::format_timestamp;
use crate::node::{el, Element};
use crate::state::PostUi;

/// Renders one post for `viewer`.
///
/// Edit and delete actions only appear for the post's owner.
pub fn render(post: &Post, viewer: Option<&Identity>, ui: &PostUi) -> Element {
    let id = post.id.as_str();

    el("div")
        .id(format!("post-{}", id))
        .class("post")
        .class_if(ui.deleting, "deleting")
        .class_if(ui.highlighted, "updated")
        .attr("data-post-id", id)
        .child(header(post, viewer))
        .child(el("div").class("post-content").text(post.content.clone()))
        .child_opt(image(post))
        .child_opt(hashtags(post))
        .child(like_button(post))
        .child(comments(post, ui))
        .child(footer(post))
}

fn header(post: &Post, viewer: Option<&Identity>) -> Element {
    let actions = can_mutate(post, viewer).then(|| {
        el("div")
            .class("post-actions")
            .child(
                el("button")
                    .class("btn-edit")
                    .attr("data-action", "edit")
                    .text("Edit"),
            )
            .child(
                el("button")
                    .class("btn-delete")
                    .attr("data-action", "delete")
                    .text("Delete"),
            )
    });

    el("div")
        .class("post-header")
        .child(el("span").class("post-author").text(post.author.clone()))
        .child_opt(actions)
}

fn image(post: &Post) -> Option<Element> {
    let url = post.image_url.as_ref()?;
    Some(
        el("div")
            .class("post-image-wrap")
            .child(el("img").class("post-image").attr("src", url.clone())),
    )
}

fn hashtags(post: &Post) -> Option<Element> {
    if post.hashtags.is_empty() {
        return None;
    }
    let tags = post.hashtags.iter().map(|tag| {
        el("span")
            .class("hashtag")
            .attr("data-action", "filter")
            .attr("data-tag", tag.clone())
            .text(tag.clone())
    });
    Some(el("div").class("hashtags").children(tags))
}

fn like_button(post: &Post) -> Element {
    el("div").class("post-actions-like").child(
        el("button")
            .class("like-btn")
            .class_if(post.liked_by_me, "liked")
            .attr("data-action", "like")
            .text(format!("\u{2764}\u{fe0f} {}", post.like_count)),
    )
}

fn comments(post: &Post, ui: &PostUi) -> Element {
    let list = post.comments.iter().map(|comment| {
        el("div")
            .class("comment")
            .child(el("b").text(comment.user.clone()))
            .text(format!(": {}", comment.text))
    });

    let form = el("div")
        .class("comment-form")
        .child(
            el("input")
                .id(format!("comment-input-{}", post.id))
                .class("form-control")
                .attr("placeholder", "Write a comment")
                .attr("value", ui.comment_draft.clone()),
        )
        .child(
            el("button")
                .class("btn-secondary")
                .attr("data-action", "comment")
                .flag("disabled", ui.comment_busy)
                .text("Send"),
        );

    el("div")
        .class("comments")
        .child(el("div").class("comment-list").children(list))
        .child(form)
}

fn footer(post: &Post) -> Element {
    let edited = post.updated_at.map(|at| {
        el("span")
            .class("post-updated")
            .text(format!("(edited: {})", format_timestamp(at)))
    });
    el("div")
        .class("post-footer")
        .child(
            el("span")
                .class("post-time")
                .text(format_timestamp(post.created_at)),
        )
        .child_opt(edited)
}
