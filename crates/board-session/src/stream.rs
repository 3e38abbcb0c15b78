//! Binding the provider's auth-state stream to the session.

use board_backend::AuthService;
use board_core::Identity;
use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::SessionState;

/// Spawns a task that copies every auth-state emission into `session` and
/// then awaits `on_change` with the new identity.
///
/// The current value is delivered first, so the callback also runs once at
/// startup. The task ends when the provider drops its stream.
pub fn bind_auth_stream<F, Fut>(
    auth: &dyn AuthService,
    session: SessionState,
    mut on_change: F,
) -> JoinHandle<()>
where
    F: FnMut(Option<Identity>) -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let mut rx = auth.auth_state();
    tokio::spawn(async move {
        loop {
            let identity = rx.borrow_and_update().clone();
            session.replace(identity.clone());
            info!(
                user_id = identity.as_ref().map(|i| i.id.as_str()),
                "Auth state changed"
            );
            on_change(identity).await;

            if rx.changed().await.is_err() {
                debug!("Auth stream closed");
                break;
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_backend::memory::MemoryAuth;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn forwards_initial_and_subsequent_states() {
        let auth = MemoryAuth::new();
        let session = SessionState::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        let handle = bind_auth_stream(&auth, session.clone(), move |identity| {
            let tx = tx.clone();
            async move {
                let _ = tx.send(identity);
            }
        });

        assert_eq!(rx.recv().await, Some(None));

        let alice = auth.sign_up("alice@example.com", "secret1").await.unwrap();
        assert_eq!(rx.recv().await, Some(Some(alice.clone())));
        assert_eq!(session.current(), Some(alice));

        auth.sign_out().await.unwrap();
        assert_eq!(rx.recv().await, Some(None));
        assert!(session.current().is_none());

        handle.abort();
    }
}
