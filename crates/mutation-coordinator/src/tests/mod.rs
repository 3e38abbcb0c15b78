//! Scenario tests for the mutation coordinator, run against the in-memory
//! backend.

mod create;
mod double_submit;

use crate::{MutationContext, MutationCoordinator};
use board_backend::memory::MemoryBackend;
use board_backend::POSTS_PATH;
use board_core::{ControlPanel, Drafts, Identity, Limits, NoticeBoard, PostId};
use board_session::SessionState;
use notification_emitter::{NotificationSink, RecordingSink};
use serde_json::Value;
use std::sync::Arc;

pub(crate) struct Harness {
    pub backend: MemoryBackend,
    pub session: SessionState,
    pub notices: NoticeBoard,
    pub sink: Arc<RecordingSink>,
    pub coordinator: MutationCoordinator,
}

impl Harness {
    pub fn sign_in(&self, identity: &Identity) {
        self.session.replace(Some(identity.clone()));
    }

    pub fn sign_out(&self) {
        self.session.replace(None);
    }

    /// Raw record stored for `id`.
    pub fn stored(&self, id: &PostId) -> Option<Value> {
        self.backend
            .database
            .peek(&format!("{POSTS_PATH}/{}", id.as_str()))
    }

    pub fn last_notice(&self) -> String {
        self.notices
            .current()
            .map(|notice| notice.text)
            .unwrap_or_default()
    }
}

pub(crate) fn harness() -> Harness {
    let sink = Arc::new(RecordingSink::new());
    let recording = sink.clone();
    let mut h = harness_with_notifier(move |_| recording as Arc<dyn NotificationSink>);
    h.sink = sink;
    h
}

/// Harness whose coordinator notifies through the sink built by `make`.
pub(crate) fn harness_with_notifier(
    make: impl FnOnce(&MemoryBackend) -> Arc<dyn NotificationSink>,
) -> Harness {
    let backend = MemoryBackend::new();
    let session = SessionState::new();
    let notices = NoticeBoard::default();
    let coordinator = MutationCoordinator::new(MutationContext {
        db: backend.database.clone(),
        storage: backend.storage.clone(),
        notifier: make(&backend),
        session: session.clone(),
        controls: ControlPanel::new(),
        notices: notices.clone(),
        drafts: Drafts::new(),
        limits: Limits::default(),
    });
    Harness {
        backend,
        session,
        notices,
        sink: Arc::new(RecordingSink::new()),
        coordinator,
    }
}

pub(crate) fn alice() -> Identity {
    Identity::new("alice", "alice@example.com")
}

pub(crate) fn bob() -> Identity {
    Identity::new("bob", "bob@example.com")
}

/// Post view-model as the feed would show it to the current session.
pub(crate) fn view_of(h: &Harness, id: &PostId) -> board_core::Post {
    let record = h.stored(id).expect("post stored");
    feed_sync::materialize(id.as_str(), &record, h.session.current().as_ref())
        .expect("post materializes")
}
