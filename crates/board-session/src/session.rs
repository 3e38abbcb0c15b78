//! Live session value.

use board_core::{Identity, UserId};
use std::sync::Arc;
use tokio::sync::watch;

/// Shared handle to the current identity.
///
/// Clones share the same value. The identity is only ever replaced as a
/// whole, never patched.
#[derive(Debug, Clone)]
pub struct SessionState {
    tx: Arc<watch::Sender<Option<Identity>>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Starts signed out.
    pub fn new() -> Self {
        let (tx, _) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Snapshot of the current identity.
    pub fn current(&self) -> Option<Identity> {
        self.tx.borrow().clone()
    }

    /// Replaces the identity. Returns true if it changed.
    pub fn replace(&self, identity: Option<Identity>) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == identity {
                false
            } else {
                *current = identity;
                true
            }
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// True if someone is signed in and their id is `owner`.
    pub fn is(&self, owner: &UserId) -> bool {
        self.tx
            .borrow()
            .as_ref()
            .is_some_and(|identity| identity.id == *owner)
    }

    /// Receiver that observes every replacement.
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_is_wholesale_and_shared() {
        let session = SessionState::new();
        let other_handle = session.clone();
        assert!(!session.is_logged_in());

        let alice = Identity::new("alice", "alice@example.com");
        assert!(session.replace(Some(alice.clone())));
        assert_eq!(other_handle.current(), Some(alice.clone()));
        assert!(other_handle.is(&UserId::from("alice")));
        assert!(!other_handle.is(&UserId::from("bob")));

        assert!(!session.replace(Some(alice)));
        assert!(session.replace(None));
        assert!(!other_handle.is(&UserId::from("alice")));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let session = SessionState::new();
        let mut rx = session.subscribe();
        session.replace(Some(Identity::new("u", "u@example.com")));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|i| i.email.as_str()), Some("u@example.com"));
    }
}
