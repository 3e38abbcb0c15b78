//! Scenario tests for the feed subscription, run against the in-memory
//! backend.

mod ordering;
mod subscription;

use crate::FeedSubscriptionManager;
use board_backend::memory::MemoryDatabase;
use board_backend::{Database, POSTS_PATH};
use board_core::{Identity, NoticeBoard, SortOrder};
use board_session::SessionState;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::watch;

use crate::FeedState;

pub(crate) struct Harness {
    pub db: Arc<MemoryDatabase>,
    pub session: SessionState,
    pub notices: NoticeBoard,
    pub feed: FeedSubscriptionManager,
}

pub(crate) fn harness(sort: SortOrder) -> Harness {
    let db = Arc::new(MemoryDatabase::new());
    let session = SessionState::new();
    let notices = NoticeBoard::default();
    let feed = FeedSubscriptionManager::new(db.clone(), session.clone(), notices.clone(), sort);
    Harness {
        db,
        session,
        notices,
        feed,
    }
}

pub(crate) fn record(content: &str, owner: &str, timestamp: i64) -> Value {
    json!({
        "author": format!("{owner}@example.com"),
        "userId": owner,
        "content": content,
        "timestamp": timestamp,
        "hashtags": board_core::extract_hashtags(content),
    })
}

pub(crate) async fn seed(db: &MemoryDatabase, key: &str, value: Value) {
    db.set(&format!("{POSTS_PATH}/{key}"), value).await.unwrap();
}

/// Waits until the published state satisfies `pred`.
pub(crate) async fn wait_for(
    rx: &mut watch::Receiver<FeedState>,
    pred: impl Fn(&FeedState) -> bool,
) -> FeedState {
    let state = tokio::time::timeout(std::time::Duration::from_secs(5), rx.wait_for(|s| pred(s)))
        .await
        .expect("timed out waiting for feed state")
        .expect("feed state channel closed");
    state.clone()
}

pub(crate) fn alice() -> Identity {
    Identity::new("alice", "alice@example.com")
}

pub(crate) fn bob() -> Identity {
    Identity::new("bob", "bob@example.com")
}
