//! Notification sink contract.

use board_core::Notification;
use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Receives notifications that passed suppression.
pub trait NotificationSink: Send + Sync {
    /// Starts delivering `notification` without waiting for it.
    ///
    /// Returns the delivery task, if one was spawned, so tests can await it.
    fn emit(&self, notification: Notification) -> Option<JoinHandle<()>>;
}

/// Discards every notification.
#[derive(Debug, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn emit(&self, _notification: Notification) -> Option<JoinHandle<()>> {
        None
    }
}

/// Records notifications for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    emitted: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.emitted.lock().clone()
    }

    pub fn clear(&self) {
        self.emitted.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.emitted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.lock().is_empty()
    }
}

impl NotificationSink for RecordingSink {
    fn emit(&self, notification: Notification) -> Option<JoinHandle<()>> {
        self.emitted.lock().push(notification);
        None
    }
}
