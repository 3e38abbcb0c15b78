//! Message area, auth bar, post form and modals.

use board_core::{Modal, Notice};

use crate::node::{el, Element};
use crate::state::UiSnapshot;

/// The single-slot message area. Empty when there is no live notice.
pub fn message_area(notice: Option<&Notice>) -> Element {
    let area = el("div").id("message");
    match notice {
        Some(notice) => area
            .class("message")
            .class(notice.kind.as_str())
            .text(notice.text.clone()),
        None => area.class("message").class("hidden"),
    }
}

pub fn auth_bar(ui: &UiSnapshot) -> Element {
    match &ui.viewer {
        Some(identity) => el("div")
            .class("auth-bar")
            .child(el("span").class("user-email").text(identity.email.clone()))
            .child(
                el("button")
                    .id("logoutButton")
                    .attr("data-action", "logout")
                    .text("Log out"),
            ),
        None => el("div")
            .class("auth-bar")
            .child(
                el("input")
                    .id("emailInput")
                    .attr("type", "email")
                    .attr("placeholder", "Email"),
            )
            .child(
                el("input")
                    .id("passwordInput")
                    .attr("type", "password")
                    .attr("placeholder", "Password"),
            )
            .child(el("button").id("loginButton").text("Log in"))
            .child(el("button").id("registerButton").text("Register")),
    }
}

/// Post form. Only shown to a signed-in user.
pub fn post_form(ui: &UiSnapshot) -> Option<Element> {
    ui.viewer.as_ref()?;
    let count = ui.post_count.map(|count| {
        el("span")
            .id("contentCount")
            .class("char-count")
            .class_if(count.is_over(), "over-limit")
            .text(count.to_string())
    });
    Some(
        el("div")
            .class("post-form")
            .child(
                el("textarea")
                    .id("contentInput")
                    .class("form-control")
                    .attr("placeholder", "What's happening?")
                    .text(ui.post_draft.clone()),
            )
            .child_opt(count)
            .child(
                el("input")
                    .id("imageInput")
                    .attr("type", "file")
                    .attr("accept", "image/*")
                    .class_if(ui.has_image, "has-file"),
            )
            .child(
                el("button")
                    .id("postButton")
                    .class("btn-primary")
                    .flag("disabled", ui.post_busy)
                    .text("Post"),
            ),
    )
}

/// The open modal, if any.
pub fn modal(ui: &UiSnapshot) -> Option<Element> {
    match &ui.modal {
        Modal::Closed => None,
        Modal::Edit(id) => Some(
            el("div")
                .id("editModal")
                .class("modal")
                .attr("data-post-id", id.as_str())
                .child(
                    el("textarea")
                        .id("editContent")
                        .class("form-control")
                        .text(ui.edit_draft.clone()),
                )
                .child(
                    el("div")
                        .class("button-group")
                        .child(
                            el("button")
                                .class("btn-primary")
                                .attr("data-action", "save-edit")
                                .flag("disabled", ui.edit_busy)
                                .text("Save"),
                        )
                        .child(
                            el("button")
                                .class("btn-cancel")
                                .attr("data-action", "cancel-edit")
                                .text("Cancel"),
                        ),
                ),
        ),
        Modal::Delete(id) => Some(
            el("div")
                .id("deleteModal")
                .class("modal")
                .attr("data-post-id", id.as_str())
                .child(el("p").text("Delete this post?"))
                .child(
                    el("div")
                        .class("button-group")
                        .child(
                            el("button")
                                .class("btn-delete")
                                .attr("data-action", "confirm-delete")
                                .flag("disabled", ui.delete_busy)
                                .text("Delete"),
                        )
                        .child(
                            el("button")
                                .class("btn-cancel")
                                .attr("data-action", "cancel-delete")
                                .text("Cancel"),
                        ),
                ),
        ),
    }
}
