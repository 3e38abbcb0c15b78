//! Backend-writing notification sink.

use board_backend::{Database, ServerValue, NOTIFICATIONS_PATH};
use board_core::{Identity, Notification, NotificationKind, PostId, UserId};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::NotificationSink;

/// Builds the notification for `actor` acting on a post owned by `target`.
///
/// Returns `None` when there is no owner or the owner is the actor.
pub fn notification_for(
    actor: &Identity,
    target: Option<&UserId>,
    kind: NotificationKind,
    post_id: &PostId,
) -> Option<Notification> {
    let target = target?;
    if *target == actor.id {
        debug!(post_id = %post_id, kind = kind.as_str(), "Self-notification suppressed");
        return None;
    }
    Some(Notification {
        target: target.clone(),
        kind,
        post_id: post_id.clone(),
        from: actor.id.clone(),
        from_email: actor.email.clone(),
    })
}

/// Wire record stored under `notifications/<key>`.
pub fn to_record(notification: &Notification) -> Value {
    json!({
        "targetUserId": notification.target.as_str(),
        "type": notification.kind.as_str(),
        "postId": notification.post_id.as_str(),
        "from": notification.from.as_str(),
        "fromEmail": notification.from_email,
        "timestamp": ServerValue::timestamp(),
    })
}

/// Pushes notifications to the backend on the tokio runtime.
pub struct NotificationEmitter {
    db: Arc<dyn Database>,
    runtime: tokio::runtime::Handle,
}

impl NotificationEmitter {
    pub fn new(db: Arc<dyn Database>, runtime: tokio::runtime::Handle) -> Self {
        Self { db, runtime }
    }

    /// Uses the runtime this is called from.
    pub fn current(db: Arc<dyn Database>) -> Self {
        Self::new(db, tokio::runtime::Handle::current())
    }
}

impl NotificationSink for NotificationEmitter {
    fn emit(&self, notification: Notification) -> Option<JoinHandle<()>> {
        let db = Arc::clone(&self.db);
        let handle = self.runtime.spawn(async move {
            let record = to_record(&notification);
            match db.push(NOTIFICATIONS_PATH, record).await {
                Ok(key) => debug!(
                    key = %key,
                    target = %notification.target,
                    kind = notification.kind.as_str(),
                    "Notification written"
                ),
                Err(err) => warn!(
                    error = %err,
                    target = %notification.target,
                    post_id = %notification.post_id,
                    "Notification write failed"
                ),
            }
        });
        Some(handle)
    }
}
