//! Client UI state that outlives a single render.
//!
//! Rendering is a pure function of the feed, but a few pieces of state live
//! between renders: which submit controls are disabled, the transient notice
//! in the message area, modal selections and the text typed into inputs.
//! They are modeled here as small thread-safe handles that the coordinators
//! share with the view layer.

use crate::types::{LocalFile, PostId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Default lifetime of a notice in the message area.
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(3000);

/// Default duration of the "updated" highlight on an edited post.
pub const UPDATE_HIGHLIGHT_DURATION: Duration = Duration::from_millis(1000);

/// A submit control that is disabled while its operation is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
    PostButton,
    LoginButton,
    RegisterButton,
    EditSubmit(PostId),
    DeleteConfirm(PostId),
    CommentSubmit(PostId),
}

/// Tracks which controls are currently disabled.
#[derive(Debug, Clone, Default)]
pub struct ControlPanel {
    disabled: Arc<Mutex<HashSet<Control>>>,
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables `control` and returns a guard that re-enables it on drop.
    ///
    /// Returns `None` if the control is already disabled, which is how a
    /// double submission is rejected.
    pub fn try_acquire(&self, control: Control) -> Option<InFlightGuard> {
        let mut disabled = self.disabled.lock();
        if !disabled.insert(control.clone()) {
            return None;
        }
        Some(InFlightGuard {
            control,
            disabled: Arc::clone(&self.disabled),
        })
    }

    pub fn is_enabled(&self, control: &Control) -> bool {
        !self.disabled.lock().contains(control)
    }

    /// Number of controls currently disabled.
    pub fn in_flight(&self) -> usize {
        self.disabled.lock().len()
    }
}

/// RAII guard for a disabled control.
///
/// Dropping the guard re-enables the control whether the operation
/// succeeded, failed or was abandoned at an `.await`.
#[derive(Debug)]
pub struct InFlightGuard {
    control: Control,
    disabled: Arc<Mutex<HashSet<Control>>>,
}

impl InFlightGuard {
    pub fn control(&self) -> &Control {
        &self.control
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.disabled.lock().remove(&self.control);
    }
}

/// Severity of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

impl NoticeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
        }
    }
}

/// A transient message for the message area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    expires_at: Instant,
}

impl Notice {
    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

/// The single-slot message area.
///
/// A new notice replaces the current one. Each notice carries its own
/// deadline, so an older notice's expiry never clears a newer one.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    current: Arc<Mutex<Option<Notice>>>,
    duration: Duration,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_DURATION)
    }
}

impl NoticeBoard {
    pub fn new(duration: Duration) -> Self {
        Self {
            current: Arc::new(Mutex::new(None)),
            duration,
        }
    }

    pub fn success(&self, text: impl Into<String>) {
        self.post(NoticeKind::Success, text.into());
    }

    pub fn error(&self, text: impl Into<String>) {
        self.post(NoticeKind::Error, text.into());
    }

    fn post(&self, kind: NoticeKind, text: String) {
        let notice = Notice {
            kind,
            text,
            expires_at: Instant::now() + self.duration,
        };
        *self.current.lock() = Some(notice);
    }

    /// Returns the live notice, clearing it if its deadline has passed.
    pub fn current(&self) -> Option<Notice> {
        let mut current = self.current.lock();
        if let Some(notice) = current.as_ref() {
            if Instant::now() >= notice.expires_at {
                *current = None;
            }
        }
        current.clone()
    }

    pub fn clear(&self) {
        *self.current.lock() = None;
    }
}

/// Character counter shown under text inputs (`len/max`, flagged when over).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub len: usize,
    pub max: usize,
}

impl CharCount {
    pub fn of(text: &str, max: usize) -> Self {
        Self {
            len: text.chars().count(),
            max,
        }
    }

    pub fn is_over(&self) -> bool {
        self.len > self.max
    }
}

impl std::fmt::Display for CharCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.len, self.max)
    }
}

/// Which modal, if any, is open and which post it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    Edit(PostId),
    Delete(PostId),
}

#[derive(Debug, Default)]
struct DraftsInner {
    post_content: String,
    image: Option<LocalFile>,
    comments: HashMap<PostId, String>,
    edit_content: String,
    modal: Modal,
    deleting: HashSet<PostId>,
    highlighted: HashMap<PostId, Instant>,
}

/// Form inputs and modal state.
///
/// Mutation completions consult this before touching it: a selection that
/// was cancelled while the write was in flight is left alone.
#[derive(Debug, Clone, Default)]
pub struct Drafts {
    inner: Arc<Mutex<DraftsInner>>,
}

impl Drafts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_content(&self) -> String {
        self.inner.lock().post_content.clone()
    }

    pub fn set_post_content(&self, text: impl Into<String>) {
        self.inner.lock().post_content = text.into();
    }

    /// Clears the post form: content and attached image.
    pub fn clear_post_form(&self) {
        let mut inner = self.inner.lock();
        inner.post_content.clear();
        inner.image = None;
    }

    pub fn image(&self) -> Option<LocalFile> {
        self.inner.lock().image.clone()
    }

    pub fn set_image(&self, image: Option<LocalFile>) {
        self.inner.lock().image = image;
    }

    pub fn comment(&self, post_id: &PostId) -> String {
        self.inner
            .lock()
            .comments
            .get(post_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_comment(&self, post_id: &PostId, text: impl Into<String>) {
        self.inner.lock().comments.insert(post_id.clone(), text.into());
    }

    pub fn clear_comment(&self, post_id: &PostId) {
        self.inner.lock().comments.remove(post_id);
    }

    pub fn edit_content(&self) -> String {
        self.inner.lock().edit_content.clone()
    }

    pub fn set_edit_content(&self, text: impl Into<String>) {
        self.inner.lock().edit_content = text.into();
    }

    pub fn modal(&self) -> Modal {
        self.inner.lock().modal.clone()
    }

    /// Opens the edit modal for `post_id`, pre-filled with `content`.
    pub fn open_edit(&self, post_id: PostId, content: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.edit_content = content.into();
        inner.modal = Modal::Edit(post_id);
    }

    pub fn open_delete(&self, post_id: PostId) {
        self.inner.lock().modal = Modal::Delete(post_id);
    }

    pub fn close_modal(&self) {
        let mut inner = self.inner.lock();
        inner.modal = Modal::Closed;
        inner.edit_content.clear();
    }

    /// Closes the modal only if it still refers to `expected`.
    pub fn close_modal_if(&self, expected: &Modal) -> bool {
        let mut inner = self.inner.lock();
        if inner.modal != *expected {
            return false;
        }
        inner.modal = Modal::Closed;
        inner.edit_content.clear();
        true
    }

    pub fn mark_deleting(&self, post_id: &PostId) {
        self.inner.lock().deleting.insert(post_id.clone());
    }

    pub fn unmark_deleting(&self, post_id: &PostId) {
        self.inner.lock().deleting.remove(post_id);
    }

    pub fn is_deleting(&self, post_id: &PostId) -> bool {
        self.inner.lock().deleting.contains(post_id)
    }

    /// Flags `post_id` for the "updated" highlight for `duration`.
    /// Highlights that already wore off are dropped.
    pub fn highlight(&self, post_id: &PostId, duration: Duration) {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        inner.highlighted.retain(|_, until| now < *until);
        inner.highlighted.insert(post_id.clone(), now + duration);
    }

    /// Drops every per-post entry for a post that no longer exists.
    pub fn forget_post(&self, post_id: &PostId) {
        let mut inner = self.inner.lock();
        inner.comments.remove(post_id);
        inner.highlighted.remove(post_id);
        inner.deleting.remove(post_id);
    }

    pub fn is_highlighted(&self, post_id: &PostId) -> bool {
        let mut inner = self.inner.lock();
        match inner.highlighted.get(post_id) {
            Some(until) if Instant::now() < *until => true,
            Some(_) => {
                inner.highlighted.remove(post_id);
                false
            }
            None => false,
        }
    }
}
