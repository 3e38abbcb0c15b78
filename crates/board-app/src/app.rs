//! The assembled client context.

use board_backend::memory::MemoryBackend;
use board_config_and_utils::Config;
use board_core::{ControlPanel, Drafts, Limits, NoticeBoard, SortOrder};
use board_session::{bind_auth_stream, AuthController, SessionState};
use board_view::{render_page, RenderNode, UiSnapshot};
use feed_sync::{FeedState, FeedStatus, FeedSubscriptionManager, FeedView};
use mutation_coordinator::{MutationContext, MutationCoordinator};
use notification_emitter::NotificationEmitter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{AppError, AppResult};

const MEMORY_SCHEME: &str = "memory";

/// One running board client.
///
/// Owns every shared handle the page needs. The feed listener follows the
/// session: each auth-state change re-subscribes it so ownership and "liked
/// by me" are recomputed for the new identity.
pub struct BoardApp {
    pub config: Arc<Config>,
    pub backend: MemoryBackend,
    pub session: SessionState,
    pub notices: NoticeBoard,
    pub controls: ControlPanel,
    pub drafts: Drafts,
    pub limits: Limits,
    pub auth: AuthController,
    pub feed: Arc<FeedSubscriptionManager>,
    pub mutations: MutationCoordinator,
    auth_task: JoinHandle<()>,
}

impl BoardApp {
    /// Builds the client and attaches the feed with the configured sort.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn start(config: Config) -> AppResult<Self> {
        let url = config.backend_url()?;
        if url.scheme() != MEMORY_SCHEME {
            return Err(AppError::UnsupportedBackend(url.scheme().to_string()));
        }

        let backend = MemoryBackend::new();
        let session = SessionState::new();
        let notices = NoticeBoard::new(config.notice_duration());
        let controls = ControlPanel::new();
        let drafts = Drafts::new();
        let limits = config.limits();

        let auth = AuthController::new(
            backend.auth.clone(),
            session.clone(),
            controls.clone(),
            notices.clone(),
            limits,
        );
        let feed = Arc::new(FeedSubscriptionManager::new(
            backend.database.clone(),
            session.clone(),
            notices.clone(),
            config.default_sort,
        ));
        let mutations = MutationCoordinator::new(MutationContext {
            db: backend.database.clone(),
            storage: backend.storage.clone(),
            notifier: Arc::new(NotificationEmitter::current(backend.database.clone())),
            session: session.clone(),
            controls: controls.clone(),
            notices: notices.clone(),
            drafts: drafts.clone(),
            limits,
        });

        // The stream delivers the current identity first, which performs the
        // initial subscribe.
        let listener = Arc::clone(&feed);
        let auth_task = bind_auth_stream(backend.auth.as_ref(), session.clone(), move |_| {
            let feed = Arc::clone(&listener);
            async move {
                if let Err(err) = feed.resubscribe().await {
                    warn!(error = %err, "Feed resubscribe after auth change failed");
                }
            }
        });

        info!(
            backend = %url,
            sort = config.default_sort.as_str(),
            "Board client started"
        );
        Ok(Self {
            config: Arc::new(config),
            backend,
            session,
            notices,
            controls,
            drafts,
            limits,
            auth,
            feed,
            mutations,
            auth_task,
        })
    }

    /// Renders the page from the latest feed and the live UI state.
    pub fn render(&self) -> RenderNode {
        self.render_state(&self.feed.state())
    }

    pub fn render_html(&self) -> String {
        self.render().to_html()
    }

    /// Renders the page with only the posts tagged `tag`.
    ///
    /// This is a one-off render; the live feed keeps publishing unfiltered
    /// snapshots.
    pub async fn render_filtered(&self, tag: &str) -> AppResult<RenderNode> {
        let view = self.feed.filter_by_hashtag(tag).await?;
        let mut state = self.feed.state();
        state.view = Arc::new(view);
        state.status = FeedStatus::Live;
        Ok(self.render_state(&state))
    }

    fn render_state(&self, state: &FeedState) -> RenderNode {
        let ids: Vec<_> = state.view.ids();
        let ui = UiSnapshot::capture(
            self.session.current(),
            &self.notices,
            &self.drafts,
            &self.controls,
            &self.limits,
            ids.iter(),
        );
        render_page(state, &ui)
    }

    pub async fn set_sort(&self, sort: SortOrder) -> AppResult<()> {
        self.feed.set_sort(sort).await?;
        Ok(())
    }

    pub fn view(&self) -> Arc<FeedView> {
        self.feed.view()
    }

    /// Waits until the published feed satisfies `pred`.
    pub async fn wait_for_feed(
        &self,
        timeout: Duration,
        pred: impl Fn(&FeedState) -> bool,
    ) -> AppResult<FeedState> {
        let mut rx = self.feed.watch();
        let state = tokio::time::timeout(timeout, rx.wait_for(|state| pred(state)))
            .await
            .map_err(|_| AppError::Timeout)?
            .map_err(|_| AppError::Timeout)?;
        Ok(state.clone())
    }

    /// Stops following the auth stream and detaches the feed listener.
    pub async fn shutdown(&self) {
        self.auth_task.abort();
        self.feed.unsubscribe().await;
        info!("Board client stopped");
    }
}

impl Drop for BoardApp {
    fn drop(&mut self) {
        self.auth_task.abort();
    }
}
