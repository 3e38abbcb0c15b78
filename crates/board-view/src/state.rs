//! Per-render snapshot of client UI state.

use board_core::{
    CharCount, Control, ControlPanel, Drafts, Identity, Limits, Modal, Notice, NoticeBoard, PostId,
};
use std::collections::HashMap;

/// UI state attached to one post.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUi {
    pub deleting: bool,
    pub highlighted: bool,
    pub comment_draft: String,
    pub comment_busy: bool,
}

/// Everything the renderer needs besides the feed itself.
#[derive(Debug, Clone, Default)]
pub struct UiSnapshot {
    pub viewer: Option<Identity>,
    pub notice: Option<Notice>,
    pub post_draft: String,
    pub post_count: Option<CharCount>,
    pub post_busy: bool,
    pub has_image: bool,
    pub modal: Modal,
    pub edit_draft: String,
    pub edit_busy: bool,
    pub delete_busy: bool,
    pub posts: HashMap<PostId, PostUi>,
}

impl UiSnapshot {
    /// Reads the live UI handles for the posts in `ids`.
    pub fn capture<'a>(
        viewer: Option<Identity>,
        notices: &NoticeBoard,
        drafts: &Drafts,
        controls: &ControlPanel,
        limits: &Limits,
        ids: impl IntoIterator<Item = &'a PostId>,
    ) -> Self {
        let post_draft = drafts.post_content();
        let modal = drafts.modal();
        let (edit_busy, delete_busy) = match &modal {
            Modal::Edit(id) => (!controls.is_enabled(&Control::EditSubmit(id.clone())), false),
            Modal::Delete(id) => (false, !controls.is_enabled(&Control::DeleteConfirm(id.clone()))),
            Modal::Closed => (false, false),
        };
        let posts = ids
            .into_iter()
            .map(|id| {
                let ui = PostUi {
                    deleting: drafts.is_deleting(id),
                    highlighted: drafts.is_highlighted(id),
                    comment_draft: drafts.comment(id),
                    comment_busy: !controls.is_enabled(&Control::CommentSubmit(id.clone())),
                };
                (id.clone(), ui)
            })
            .collect();

        Self {
            viewer,
            notice: notices.current(),
            post_count: Some(CharCount::of(&post_draft, limits.max_content_length)),
            post_draft,
            post_busy: !controls.is_enabled(&Control::PostButton),
            has_image: drafts.image().is_some(),
            edit_draft: drafts.edit_content(),
            modal,
            edit_busy,
            delete_busy,
            posts,
        }
    }

    pub fn post(&self, id: &PostId) -> PostUi {
        self.posts.get(id).cloned().unwrap_or_default()
    }
}
