//! In-memory email/password auth provider.

use async_trait::async_trait;
use board_core::{Identity, UserId};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::traits::AuthService;
use crate::{BackendError, BackendResult};

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    email: String,
    password: String,
}

#[derive(Debug, Default)]
struct AuthState {
    accounts: HashMap<String, Account>,
    failures: VecDeque<BackendError>,
}

/// Auth provider backed by a map of accounts.
///
/// Emails are matched case-insensitively; user ids are random UUIDs.
#[derive(Debug, Clone)]
pub struct MemoryAuth {
    state: Arc<Mutex<AuthState>>,
    current: Arc<watch::Sender<Option<Identity>>>,
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAuth {
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self {
            state: Arc::new(Mutex::new(AuthState::default())),
            current: Arc::new(current),
        }
    }

    pub fn fail_next(&self, err: BackendError) {
        self.state.lock().failures.push_back(err);
    }

    /// Signs `identity` in directly, as if the provider restored a session.
    pub fn force_sign_in(&self, identity: Identity) {
        self.current.send_replace(Some(identity));
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn key(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[async_trait]
impl AuthService for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> BackendResult<Identity> {
        let account = {
            let mut state = self.state.lock();
            if let Some(err) = state.failures.pop_front() {
                return Err(err);
            }
            let account = state.accounts.get(&Self::key(email)).cloned().ok_or_else(|| {
                BackendError::auth(
                    "auth/user-not-found",
                    "There is no user record corresponding to this identifier.",
                )
            })?;
            if account.password != password {
                return Err(BackendError::auth(
                    "auth/wrong-password",
                    "The password is invalid or the user does not have a password.",
                ));
            }
            account
        };

        let identity = Identity::new(account.id, account.email);
        debug!(user_id = %identity.id, "Signed in");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> BackendResult<Identity> {
        let identity = {
            let mut state = self.state.lock();
            if let Some(err) = state.failures.pop_front() {
                return Err(err);
            }
            let key = Self::key(email);
            if state.accounts.contains_key(&key) {
                return Err(BackendError::auth(
                    "auth/email-already-in-use",
                    "The email address is already in use by another account.",
                ));
            }
            let account = Account {
                id: UserId::from(Uuid::new_v4().to_string()),
                email: email.trim().to_string(),
                password: password.to_string(),
            };
            let identity = Identity::new(account.id.clone(), account.email.clone());
            state.accounts.insert(key, account);
            identity
        };

        debug!(user_id = %identity.id, "Account created");
        self.current.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) -> BackendResult<()> {
        if let Some(err) = self.state.lock().failures.pop_front() {
            return Err(err);
        }
        self.current.send_replace(None);
        Ok(())
    }

    fn auth_state(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = MemoryAuth::new();
        let created = auth.sign_up("Alice@Example.com", "secret1").await.unwrap();
        auth.sign_out().await.unwrap();
        assert_eq!(auth.current_user(), None);

        let signed_in = auth.sign_in("alice@example.com", "secret1").await.unwrap();
        assert_eq!(created.id, signed_in.id);
        assert_eq!(auth.current_user(), Some(signed_in));
    }

    #[tokio::test]
    async fn duplicate_email_rejected_with_code() {
        let auth = MemoryAuth::new();
        auth.sign_up("a@b.c", "secret1").await.unwrap();
        let err = auth.sign_up("a@b.c", "secret2").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Auth { code: Some(ref c), .. } if c == "auth/email-already-in-use"
        ));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user() {
        let auth = MemoryAuth::new();
        auth.sign_up("a@b.c", "secret1").await.unwrap();
        auth.sign_out().await.unwrap();

        let wrong = auth.sign_in("a@b.c", "nope").await.unwrap_err();
        assert_eq!(
            wrong,
            BackendError::auth(
                "auth/wrong-password",
                "The password is invalid or the user does not have a password."
            )
        );
        assert!(auth.sign_in("x@y.z", "secret1").await.is_err());
        assert_eq!(auth.current_user(), None);
    }

    #[tokio::test]
    async fn auth_state_stream_tracks_changes() {
        let auth = MemoryAuth::new();
        let mut rx = auth.auth_state();
        assert_eq!(*rx.borrow(), None);

        let identity = auth.sign_up("a@b.c", "secret1").await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), Some(identity));

        auth.sign_out().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), None);
    }
}
