//! Live feed subscription.

use board_backend::{Database, ListenEvent, Listener, ListenerId, POSTS_PATH};
use board_core::{NoticeBoard, SortOrder};
use board_session::SessionState;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::reconcile::{reconcile, FeedView};
use crate::{FeedError, FeedResult};

/// What the feed is doing right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedStatus {
    /// No listener attached.
    Idle,
    /// Listener requested; no snapshot or error yet. The spinner is shown.
    Loading,
    /// The view reflects the latest snapshot.
    Live,
    /// The listener failed. The view keeps the last good feed.
    Failed(String),
}

/// Latest feed published to renderers.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub view: Arc<FeedView>,
    pub status: FeedStatus,
    /// Number of views published so far.
    pub renders: u64,
    /// Bumped on every subscribe and unsubscribe. Events from an older
    /// listener are ignored.
    pub generation: u64,
}

impl FeedState {
    fn initial(sort: SortOrder) -> Self {
        Self {
            view: Arc::new(FeedView::empty(sort)),
            status: FeedStatus::Idle,
            renders: 0,
            generation: 0,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }
}

struct ActiveListener {
    id: ListenerId,
    sort: SortOrder,
    task: JoinHandle<()>,
}

/// Owns the one live listener on the posts collection.
///
/// `subscribe` always detaches the previous listener before attaching a new
/// one, and calls are serialized, so at most one listener exists at a time.
/// Dropping the manager detaches it.
pub struct FeedSubscriptionManager {
    db: Arc<dyn Database>,
    session: SessionState,
    notices: NoticeBoard,
    state: Arc<watch::Sender<FeedState>>,
    active: Mutex<Option<ActiveListener>>,
    sort: parking_lot::Mutex<SortOrder>,
}

impl FeedSubscriptionManager {
    pub fn new(
        db: Arc<dyn Database>,
        session: SessionState,
        notices: NoticeBoard,
        sort: SortOrder,
    ) -> Self {
        let (state, _) = watch::channel(FeedState::initial(sort));
        Self {
            db,
            session,
            notices,
            state: Arc::new(state),
            active: Mutex::new(None),
            sort: parking_lot::Mutex::new(sort),
        }
    }

    /// Attaches the listener with `sort`, replacing any existing one.
    ///
    /// On failure the previous listener is already gone, the status becomes
    /// `Failed` and the last view stays published.
    pub async fn subscribe(&self, sort: SortOrder) -> FeedResult<()> {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            self.detach(previous);
        }
        *self.sort.lock() = sort;
        let mut generation = 0;
        self.state.send_modify(|state| {
            state.generation += 1;
            state.status = FeedStatus::Loading;
            generation = state.generation;
        });

        let listener = match self.db.listen(POSTS_PATH).await {
            Ok(listener) => listener,
            Err(err) => {
                warn!(error = %err, "Failed to attach feed listener");
                let err = FeedError::from(err);
                self.fail(&err.user_message());
                return Err(err);
            }
        };

        let id = listener.id;
        let task = self.spawn_listener(listener, sort, generation);
        info!(listener = %id, sort = sort.as_str(), "Feed subscribed");
        *active = Some(ActiveListener { id, sort, task });
        Ok(())
    }

    /// Detaches the listener if there is one. Safe to call repeatedly.
    pub async fn unsubscribe(&self) {
        let mut active = self.active.lock().await;
        if let Some(previous) = active.take() {
            self.detach(previous);
            self.state.send_modify(|state| {
                state.generation += 1;
                state.status = FeedStatus::Idle;
            });
        }
    }

    /// Re-attaches with the current sort order.
    pub async fn resubscribe(&self) -> FeedResult<()> {
        let sort = self.sort();
        self.subscribe(sort).await
    }

    /// Changes the sort order and re-attaches.
    pub async fn set_sort(&self, sort: SortOrder) -> FeedResult<()> {
        self.subscribe(sort).await
    }

    /// One-shot read of the posts carrying `tag`, ordered like the feed.
    ///
    /// Does not touch the live listener; the next snapshot replaces whatever
    /// the caller renders from the result.
    pub async fn filter_by_hashtag(&self, tag: &str) -> FeedResult<FeedView> {
        let tag = normalize_tag(tag);
        let snapshot = self
            .db
            .get(POSTS_PATH)
            .await
            .inspect_err(|err| warn!(error = %err, tag = %tag, "Hashtag filter read failed"))?
            .unwrap_or_default();

        let viewer = self.session.current();
        let mut view = reconcile(&snapshot, self.sort(), viewer.as_ref());
        view.posts.retain(|post| post.has_hashtag(&tag));
        debug!(tag = %tag, matches = view.len(), "Hashtag filter applied");
        Ok(view)
    }

    pub fn sort(&self) -> SortOrder {
        *self.sort.lock()
    }

    pub fn state(&self) -> FeedState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> Arc<FeedView> {
        Arc::clone(&self.state.borrow().view)
    }

    /// Receiver that always holds the latest published feed.
    pub fn watch(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Whether a listener is attached and still delivering snapshots.
    ///
    /// A listener the backend cancelled is released here, so this turns
    /// false once its task has reported the failure.
    pub async fn is_subscribed(&self) -> bool {
        let mut active = self.active.lock().await;
        if active.as_ref().is_some_and(|a| a.task.is_finished()) {
            if let Some(dead) = active.take() {
                self.detach(dead);
            }
        }
        active.is_some()
    }

    fn detach(&self, previous: ActiveListener) {
        self.db.detach(previous.id);
        previous.task.abort();
        debug!(listener = %previous.id, sort = previous.sort.as_str(), "Feed listener detached");
    }

    fn fail(&self, message: &str) {
        self.state
            .send_modify(|state| state.status = FeedStatus::Failed(message.to_string()));
        self.notices.error(message);
    }

    fn spawn_listener(
        &self,
        mut listener: Listener,
        sort: SortOrder,
        generation: u64,
    ) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let session = self.session.clone();
        let notices = self.notices.clone();
        let id = listener.id;

        tokio::spawn(async move {
            while let Some(event) = listener.events.recv().await {
                match event {
                    ListenEvent::Snapshot(snapshot) => {
                        let viewer = session.current();
                        let view = reconcile(&snapshot, sort, viewer.as_ref());
                        if !view.skipped.is_empty() {
                            warn!(listener = %id, skipped = ?view.skipped, "Skipped malformed posts");
                        }
                        publish(&state, view, generation);
                    }
                    ListenEvent::Cancelled(err) => {
                        warn!(listener = %id, error = %err, "Feed listener cancelled");
                        let message = FeedError::from(err).user_message();
                        let current = state.send_if_modified(|s| {
                            if s.generation != generation {
                                return false;
                            }
                            s.status = FeedStatus::Failed(message.clone());
                            true
                        });
                        if current {
                            notices.error(message);
                        }
                        break;
                    }
                }
            }
            debug!(listener = %id, "Feed listener task finished");
        })
    }
}

/// Publishes `view` unless it is stale or identical to what renderers
/// already have.
fn publish(state: &watch::Sender<FeedState>, view: FeedView, generation: u64) {
    state.send_if_modified(|current| {
        if current.generation != generation {
            return false;
        }
        if *current.view == view && current.status == FeedStatus::Live {
            return false;
        }
        current.view = Arc::new(view);
        current.status = FeedStatus::Live;
        current.renders += 1;
        true
    });
}

/// Lowercases `tag` and adds the leading `#` if it is missing.
pub fn normalize_tag(tag: &str) -> String {
    let tag = tag.trim().to_lowercase();
    if tag.starts_with('#') {
        tag
    } else {
        format!("#{}", tag)
    }
}

impl Drop for FeedSubscriptionManager {
    fn drop(&mut self) {
        if let Some(previous) = self.active.get_mut().take() {
            self.db.detach(previous.id);
            previous.task.abort();
        }
    }
}
