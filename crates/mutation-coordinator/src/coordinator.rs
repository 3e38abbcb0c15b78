//! The five post mutations and the modal flows around them.

use board_backend::{child, Database, FileStorage, ServerValue, IMAGES_PATH, POSTS_PATH};
use board_core::ui::UPDATE_HIGHLIGHT_DURATION;
use board_core::{
    can_mutate, extract_hashtags, Control, ControlPanel, Drafts, Identity, Limits, LocalFile,
    Modal, NoticeBoard, NotificationKind, Post, PostId, UserId,
};
use board_session::SessionState;
use notification_emitter::{notification_for, NotificationSink};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{MutationError, MutationKind, MutationResult};

/// Everything a [`MutationCoordinator`] works with.
#[derive(Clone)]
pub struct MutationContext {
    pub db: Arc<dyn Database>,
    pub storage: Arc<dyn FileStorage>,
    pub notifier: Arc<dyn NotificationSink>,
    pub session: SessionState,
    pub controls: ControlPanel,
    pub notices: NoticeBoard,
    pub drafts: Drafts,
    pub limits: Limits,
}

/// What the backend currently holds for a post, as far as mutations care.
struct StoredPost {
    owner: Option<UserId>,
    likes: Map<String, Value>,
}

impl StoredPost {
    fn from_value(value: &Value) -> Self {
        let fields = value.as_object();
        Self {
            owner: fields
                .and_then(|f| f.get("userId"))
                .and_then(Value::as_str)
                .map(UserId::from),
            likes: fields
                .and_then(|f| f.get("likes"))
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        }
    }
}

/// Runs validated writes against the posts collection.
///
/// Every operation checks the live session and its input before touching the
/// backend, and posts its outcome to the notice board. Submit controls are
/// held by an [`board_core::InFlightGuard`] for the duration of the write, so
/// they come back on every exit path.
#[derive(Clone)]
pub struct MutationCoordinator {
    ctx: MutationContext,
}

impl MutationCoordinator {
    pub fn new(ctx: MutationContext) -> Self {
        Self { ctx }
    }

    pub fn drafts(&self) -> &Drafts {
        &self.ctx.drafts
    }

    pub fn controls(&self) -> &ControlPanel {
        &self.ctx.controls
    }

    /// Publishes a new post, uploading `image` first if there is one.
    ///
    /// A failed upload aborts the post. On success the post form is cleared.
    pub async fn create_post(
        &self,
        content: &str,
        image: Option<LocalFile>,
    ) -> MutationResult<PostId> {
        let result = self.try_create(content, image).await;
        self.report(MutationKind::Create, &result, "Post published");
        result
    }

    /// Publishes whatever is in the post form.
    pub async fn submit_post(&self) -> MutationResult<PostId> {
        let content = self.ctx.drafts.post_content();
        let image = self.ctx.drafts.image();
        self.create_post(&content, image).await
    }

    async fn try_create(&self, content: &str, image: Option<LocalFile>) -> MutationResult<PostId> {
        let identity = self.identity()?;
        self.ctx.limits.validate_content(content)?;
        let _guard = self.acquire(Control::PostButton)?;

        let image_url = match image {
            Some(file) => Some(self.upload(file).await?),
            None => None,
        };

        let record = json!({
            "author": identity.email,
            "userId": identity.id.as_str(),
            "content": content,
            "timestamp": ServerValue::timestamp(),
            "imageUrl": image_url,
            "hashtags": extract_hashtags(content),
        });
        let key = self
            .ctx
            .db
            .push(POSTS_PATH, record)
            .await
            .map_err(MutationError::backend(MutationKind::Create))?;

        self.ctx.drafts.clear_post_form();
        info!(post_id = %key, user_id = %identity.id, image = image_url.is_some(), "Post created");
        Ok(PostId::from(key))
    }

    async fn upload(&self, file: LocalFile) -> MutationResult<String> {
        let millis = chrono::Utc::now().timestamp_millis();
        let path = child(IMAGES_PATH, &format!("{}_{}", millis, file.name));
        let size = file.bytes.len();
        let url = self
            .ctx
            .storage
            .upload(&path, file.bytes)
            .await
            .map_err(MutationError::Upload)?;
        debug!(path = %path, size, "Image uploaded");
        Ok(url)
    }

    /// Replaces the content of a post the current user owns.
    ///
    /// Writes `content`, `hashtags` and a fresh `updatedAt`; creation time,
    /// author and owner are left as they are.
    pub async fn edit_post(&self, post_id: &PostId, content: &str) -> MutationResult<()> {
        let result = self.try_edit(post_id, content).await;
        self.report(MutationKind::Edit, &result, "Post updated");
        result
    }

    async fn try_edit(&self, post_id: &PostId, content: &str) -> MutationResult<()> {
        let identity = self.identity()?;
        self.ctx.limits.validate_content(content)?;
        let _guard = self.acquire(Control::EditSubmit(post_id.clone()))?;
        self.authorize(post_id, &identity, MutationKind::Edit).await?;

        let mut fields = Map::new();
        fields.insert("content".into(), Value::from(content));
        fields.insert("hashtags".into(), json!(extract_hashtags(content)));
        fields.insert("updatedAt".into(), ServerValue::timestamp());
        self.ctx
            .db
            .update(&post_path(post_id), fields)
            .await
            .map_err(MutationError::backend(MutationKind::Edit))?;

        self.ctx.drafts.highlight(post_id, UPDATE_HIGHLIGHT_DURATION);
        info!(post_id = %post_id, "Post edited");
        Ok(())
    }

    /// Opens the edit modal for `post`, pre-filled with its content.
    pub fn start_edit(&self, post: &Post) -> MutationResult<()> {
        let allowed = self.check_owner(post);
        self.report_quiet(MutationKind::Edit, &allowed);
        allowed?;
        self.ctx.drafts.open_edit(post.id.clone(), post.content.clone());
        Ok(())
    }

    pub fn cancel_edit(&self) {
        if matches!(self.ctx.drafts.modal(), Modal::Edit(_)) {
            self.ctx.drafts.close_modal();
        }
    }

    /// Saves the edit modal's text to the selected post.
    ///
    /// The modal closes on success, unless it was closed or moved to another
    /// post while the write was running.
    pub async fn submit_edit(&self) -> MutationResult<()> {
        let selected = self.ctx.drafts.modal();
        let Modal::Edit(post_id) = &selected else {
            let err = MutationError::NothingSelected;
            self.ctx.notices.error(err.user_message());
            return Err(err);
        };
        let content = self.ctx.drafts.edit_content();
        self.edit_post(post_id, &content).await?;
        self.ctx.drafts.close_modal_if(&selected);
        Ok(())
    }

    /// Removes a post the current user owns, comments and likes included.
    ///
    /// The post is shown as "deleting" while the write runs and restored if
    /// it fails.
    pub async fn delete_post(&self, post_id: &PostId) -> MutationResult<()> {
        let result = self.try_delete(post_id).await;
        self.report(MutationKind::Delete, &result, "Post deleted");
        result
    }

    async fn try_delete(&self, post_id: &PostId) -> MutationResult<()> {
        let identity = self.identity()?;
        let _guard = self.acquire(Control::DeleteConfirm(post_id.clone()))?;
        self.authorize(post_id, &identity, MutationKind::Delete).await?;

        self.ctx.drafts.mark_deleting(post_id);
        let removed = self.ctx.db.remove(&post_path(post_id)).await;
        self.ctx.drafts.unmark_deleting(post_id);
        removed.map_err(MutationError::backend(MutationKind::Delete))?;
        self.ctx.drafts.forget_post(post_id);

        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// First phase of a delete: opens the confirm modal for `post`.
    pub fn select_for_deletion(&self, post: &Post) -> MutationResult<()> {
        let allowed = self.check_owner(post);
        self.report_quiet(MutationKind::Delete, &allowed);
        allowed?;
        self.ctx.drafts.open_delete(post.id.clone());
        Ok(())
    }

    pub fn cancel_deletion(&self) {
        if matches!(self.ctx.drafts.modal(), Modal::Delete(_)) {
            self.ctx.drafts.close_modal();
        }
    }

    /// Second phase of a delete. On failure the modal stays open.
    pub async fn confirm_deletion(&self) -> MutationResult<()> {
        let selected = self.ctx.drafts.modal();
        let Modal::Delete(post_id) = &selected else {
            let err = MutationError::NothingSelected;
            self.ctx.notices.error(err.user_message());
            return Err(err);
        };
        self.delete_post(post_id).await?;
        self.ctx.drafts.close_modal_if(&selected);
        Ok(())
    }

    /// Flips the current user's like on a post and returns whether it is
    /// now liked.
    ///
    /// Presence is read, then written; two toggles racing each other both
    /// read the same state and the last write wins. Only a new like notifies
    /// the owner.
    pub async fn toggle_like(&self, post_id: &PostId) -> MutationResult<bool> {
        let result = self.try_toggle_like(post_id).await;
        self.report_quiet(MutationKind::Like, &result);
        result
    }

    async fn try_toggle_like(&self, post_id: &PostId) -> MutationResult<bool> {
        let identity = self.identity()?;
        let stored = self.read_post(post_id, MutationKind::Like).await?;
        let like_path = child(&post_path(post_id), &format!("likes/{}", identity.id));

        if stored.likes.contains_key(identity.id.as_str()) {
            self.ctx
                .db
                .remove(&like_path)
                .await
                .map_err(MutationError::backend(MutationKind::Like))?;
            debug!(post_id = %post_id, user_id = %identity.id, "Like removed");
            return Ok(false);
        }

        self.ctx
            .db
            .set(&like_path, Value::Bool(true))
            .await
            .map_err(MutationError::backend(MutationKind::Like))?;
        debug!(post_id = %post_id, user_id = %identity.id, "Like added");
        self.notify(&identity, stored.owner.as_ref(), NotificationKind::Like, post_id);
        Ok(true)
    }

    /// Appends a comment and returns its key.
    ///
    /// On success the post's comment input is cleared and the owner is
    /// notified.
    pub async fn add_comment(&self, post_id: &PostId, text: &str) -> MutationResult<String> {
        let result = self.try_comment(post_id, text).await;
        self.report_quiet(MutationKind::Comment, &result);
        result
    }

    /// Sends whatever is typed in the comment input of `post_id`.
    pub async fn submit_comment(&self, post_id: &PostId) -> MutationResult<String> {
        let text = self.ctx.drafts.comment(post_id);
        self.add_comment(post_id, &text).await
    }

    async fn try_comment(&self, post_id: &PostId, text: &str) -> MutationResult<String> {
        let identity = self.identity()?;
        self.ctx.limits.validate_comment(text)?;
        let _guard = self.acquire(Control::CommentSubmit(post_id.clone()))?;
        let stored = self.read_post(post_id, MutationKind::Comment).await?;

        let comment = json!({
            "user": identity.email,
            "text": text.trim(),
            "timestamp": ServerValue::timestamp(),
        });
        let key = self
            .ctx
            .db
            .push(&child(&post_path(post_id), "comments"), comment)
            .await
            .map_err(MutationError::backend(MutationKind::Comment))?;

        self.ctx.drafts.clear_comment(post_id);
        debug!(post_id = %post_id, comment = %key, "Comment added");
        self.notify(&identity, stored.owner.as_ref(), NotificationKind::Comment, post_id);
        Ok(key)
    }

    fn identity(&self) -> MutationResult<Identity> {
        self.ctx.session.current().ok_or(MutationError::NotLoggedIn)
    }

    fn acquire(&self, control: Control) -> MutationResult<board_core::InFlightGuard> {
        self.ctx
            .controls
            .try_acquire(control)
            .ok_or(MutationError::AlreadyInFlight)
    }

    async fn read_post(&self, post_id: &PostId, kind: MutationKind) -> MutationResult<StoredPost> {
        self.ctx
            .db
            .get(&post_path(post_id))
            .await
            .map_err(MutationError::backend(kind))?
            .filter(Value::is_object)
            .map(|value| StoredPost::from_value(&value))
            .ok_or_else(|| MutationError::PostNotFound(post_id.clone()))
    }

    /// Reads the post and checks that `identity` owns it.
    async fn authorize(
        &self,
        post_id: &PostId,
        identity: &Identity,
        kind: MutationKind,
    ) -> MutationResult<StoredPost> {
        let stored = self.read_post(post_id, kind).await?;
        if stored.owner.as_ref() != Some(&identity.id) {
            warn!(post_id = %post_id, user_id = %identity.id, op = %kind, "Rejected mutation by non-owner");
            return Err(MutationError::NotOwner);
        }
        Ok(stored)
    }

    fn notify(
        &self,
        actor: &Identity,
        owner: Option<&UserId>,
        kind: NotificationKind,
        post_id: &PostId,
    ) {
        if let Some(notification) = notification_for(actor, owner, kind, post_id) {
            let _ = self.ctx.notifier.emit(notification);
        }
    }

    /// Ownership as the rendered post shows it. The write path checks again
    /// against the stored record.
    fn check_owner(&self, post: &Post) -> MutationResult<()> {
        let session = self.ctx.session.current();
        if session.is_none() {
            return Err(MutationError::NotLoggedIn);
        }
        if !can_mutate(post, session.as_ref()) {
            return Err(MutationError::NotOwner);
        }
        Ok(())
    }

    fn report<T>(&self, kind: MutationKind, result: &MutationResult<T>, success: &str) {
        match result {
            Ok(_) => self.ctx.notices.success(success),
            Err(err) => self.report_error(kind, err),
        }
    }

    /// Like [`Self::report`] but without a success notice.
    fn report_quiet<T>(&self, kind: MutationKind, result: &MutationResult<T>) {
        if let Err(err) = result {
            self.report_error(kind, err);
        }
    }

    fn report_error(&self, kind: MutationKind, err: &MutationError) {
        if err.is_local() {
            debug!(op = %kind, error = %err, "Mutation rejected");
        } else {
            warn!(op = %kind, error = %err, "Mutation failed");
        }
        self.ctx.notices.error(err.user_message());
    }
}

fn post_path(post_id: &PostId) -> String {
    child(POSTS_PATH, post_id.as_str())
}

