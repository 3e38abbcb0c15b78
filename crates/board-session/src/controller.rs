//! Login, registration and logout.

use board_backend::AuthService;
use board_core::{Control, ControlPanel, Identity, Limits, NoticeBoard};
use std::sync::Arc;
use tracing::{info, warn};

use crate::{AuthError, AuthResult, SessionState};

/// Runs the auth flows against an [`AuthService`].
///
/// Credentials are validated before anything is sent. The login and register
/// buttons stay disabled while their request is running. Every outcome is
/// posted to the notice board.
#[derive(Clone)]
pub struct AuthController {
    auth: Arc<dyn AuthService>,
    session: SessionState,
    controls: ControlPanel,
    notices: NoticeBoard,
    limits: Limits,
}

impl AuthController {
    pub fn new(
        auth: Arc<dyn AuthService>,
        session: SessionState,
        controls: ControlPanel,
        notices: NoticeBoard,
        limits: Limits,
    ) -> Self {
        Self {
            auth,
            session,
            controls,
            notices,
            limits,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let result = self.sign_in_or_up(email, password, false).await;
        self.report(&result, "Logged in");
        result
    }

    pub async fn register(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let result = self.sign_in_or_up(email, password, true).await;
        self.report(&result, "Account created");
        result
    }

    pub async fn logout(&self) -> AuthResult<()> {
        match self.auth.sign_out().await {
            Ok(()) => {
                self.session.replace(None);
                info!("Logged out");
                self.notices.success("Logged out");
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "Logout failed");
                self.notices.error("Failed to log out");
                Err(err.into())
            }
        }
    }

    async fn sign_in_or_up(
        &self,
        email: &str,
        password: &str,
        is_register: bool,
    ) -> AuthResult<Identity> {
        self.limits
            .validate_auth_input(email, password, is_register)?;

        let control = if is_register {
            Control::RegisterButton
        } else {
            Control::LoginButton
        };
        let _guard = self
            .controls
            .try_acquire(control)
            .ok_or(AuthError::AlreadyInFlight)?;

        let email = email.trim();
        let identity = if is_register {
            self.auth.sign_up(email, password).await?
        } else {
            self.auth.sign_in(email, password).await?
        };

        // The auth stream delivers the same identity; replacing here makes it
        // visible before the stream task gets to run.
        self.session.replace(Some(identity.clone()));
        info!(user_id = %identity.id, register = is_register, "Authenticated");
        Ok(identity)
    }

    fn report(&self, result: &AuthResult<Identity>, success: &str) {
        match result {
            Ok(_) => self.notices.success(success),
            Err(err) => {
                warn!(error = %err, "Authentication failed");
                self.notices.error(err.user_message());
            }
        }
    }
}
