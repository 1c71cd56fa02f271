//! # Auth Service
//!
//! Drives the auth slice from remote calls and keeps the persisted session
//! token in step with it.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login(contact, password)                                              │
//! │       │                                                                 │
//! │       ├── invalid input? ──────────► Err(VALIDATION_ERROR), no dispatch│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dispatch(RequestStarted)                                               │
//! │       │                                                                 │
//! │       ▼  (no lock held)                                                 │
//! │  AuthApi::login ──── Err ──► dispatch(RequestFailed(message)), Err      │
//! │       │                                                                 │
//! │       ▼ Ok                                                              │
//! │  store token under "token" ──► dispatch(LoggedIn(credentials))          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Startup
//! `restore_session` validates a persisted token with `check_token`. A
//! rejected token is deleted and the session logged out; a network failure
//! keeps the token for the next launch.

use std::sync::Arc;

use medimart_core::auth::{AuthAction, AuthSession, Credentials};
use medimart_core::validation::{
    validate_contact_info, validate_name, validate_otp, validate_password,
};
use tracing::{debug, error, info, warn};

use crate::api::{
    AuthApi, ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest,
    VerifyOtpRequest,
};
use crate::error::{ApiError, ApiResult};
use crate::state::Store;
use crate::token_store::{KeyValueStore, TOKEN_KEY};

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    tokens: Arc<dyn KeyValueStore>,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, tokens: Arc<dyn KeyValueStore>) -> Self {
        AuthService { api, tokens }
    }

    pub async fn login(
        &self,
        session: &Store<AuthSession>,
        contact_info: &str,
        password: &str,
    ) -> ApiResult<()> {
        let contact_info = contact_info.trim();
        validate_contact_info(contact_info)?;
        validate_password(password)?;
        debug!(contact = %contact_info, "login");

        session.dispatch(AuthAction::RequestStarted)?;
        let request = LoginRequest {
            contact_info: contact_info.to_string(),
            password: password.to_string(),
        };

        match self.api.login(&request).await {
            Ok(credentials) => self.sign_in(session, credentials),
            Err(err) => self.fail(session, err),
        }
    }

    /// Registers a new account. The backend then sends an OTP.
    pub async fn signup(
        &self,
        session: &Store<AuthSession>,
        name: &str,
        contact_info: &str,
        password: &str,
    ) -> ApiResult<()> {
        let contact_info = contact_info.trim();
        validate_name(name)?;
        validate_contact_info(contact_info)?;
        validate_password(password)?;
        debug!(contact = %contact_info, "signup");

        session.dispatch(AuthAction::RequestStarted)?;
        let request = SignupRequest {
            name: name.trim().to_string(),
            contact_info: contact_info.to_string(),
            password: password.to_string(),
        };

        match self.api.signup(&request).await {
            Ok(()) => {
                session.dispatch(AuthAction::SignupPending {
                    contact_info: request.contact_info,
                })?;
                Ok(())
            }
            Err(err) => self.fail(session, err),
        }
    }

    /// Completes signup with the OTP and signs the user in.
    pub async fn verify_otp(
        &self,
        session: &Store<AuthSession>,
        contact_info: &str,
        otp: &str,
    ) -> ApiResult<()> {
        let contact_info = contact_info.trim();
        validate_contact_info(contact_info)?;
        validate_otp(otp)?;

        session.dispatch(AuthAction::RequestStarted)?;
        let request = VerifyOtpRequest {
            contact_info: contact_info.to_string(),
            otp: otp.trim().to_string(),
        };

        match self.api.verify_otp(&request).await {
            Ok(credentials) => self.sign_in(session, credentials),
            Err(err) => self.fail(session, err),
        }
    }

    // -------------------------------------------------------------------------
    // Forgot-password wizard
    // -------------------------------------------------------------------------

    pub async fn forgot_password(
        &self,
        session: &Store<AuthSession>,
        contact_info: &str,
    ) -> ApiResult<()> {
        let contact_info = contact_info.trim();
        validate_contact_info(contact_info)?;

        session.dispatch(AuthAction::RequestStarted)?;
        let request = ForgotPasswordRequest {
            contact_info: contact_info.to_string(),
        };

        match self.api.forgot_password(&request).await {
            Ok(()) => {
                session.dispatch(AuthAction::ResetOtpSent {
                    contact_info: request.contact_info,
                })?;
                Ok(())
            }
            Err(err) => self.fail(session, err),
        }
    }

    pub async fn verify_reset_otp(&self, session: &Store<AuthSession>, otp: &str) -> ApiResult<()> {
        validate_otp(otp)?;
        let contact_info = session
            .with_state(|s| {
                s.reset_flow
                    .otp_sent
                    .then(|| s.reset_flow.contact_info.clone())
                    .flatten()
            })
            .ok_or_else(|| ApiError::validation("Request a password reset OTP first"))?;

        session.dispatch(AuthAction::RequestStarted)?;
        let request = VerifyOtpRequest {
            contact_info,
            otp: otp.trim().to_string(),
        };

        match self.api.verify_reset_otp(&request).await {
            Ok(()) => {
                session.dispatch(AuthAction::ResetOtpVerified)?;
                Ok(())
            }
            Err(err) => self.fail(session, err),
        }
    }

    pub async fn reset_password(
        &self,
        session: &Store<AuthSession>,
        new_password: &str,
    ) -> ApiResult<()> {
        validate_password(new_password)?;
        let contact_info = session
            .with_state(|s| {
                s.reset_flow
                    .otp_verified
                    .then(|| s.reset_flow.contact_info.clone())
                    .flatten()
            })
            .ok_or_else(|| ApiError::validation("Verify the reset OTP first"))?;

        session.dispatch(AuthAction::RequestStarted)?;
        let request = ResetPasswordRequest {
            contact_info,
            new_password: new_password.to_string(),
        };

        match self.api.reset_password(&request).await {
            Ok(()) => {
                session.dispatch(AuthAction::PasswordReset)?;
                info!("Password reset completed");
                Ok(())
            }
            Err(err) => self.fail(session, err),
        }
    }

    // -------------------------------------------------------------------------
    // Session lifecycle
    // -------------------------------------------------------------------------

    /// Re-establishes the session from a persisted token.
    ///
    /// Returns whether the user is signed in afterwards.
    pub async fn restore_session(&self, session: &Store<AuthSession>) -> ApiResult<bool> {
        let Some(token) = self.tokens.get(TOKEN_KEY)? else {
            debug!("No persisted session token");
            return Ok(false);
        };

        session.dispatch(AuthAction::RequestStarted)?;

        match self.api.check_token(&token).await {
            Ok(profile) => {
                let user_id = profile.user.id.clone();
                session.dispatch(AuthAction::LoggedIn(Credentials {
                    user: profile.user,
                    token,
                    company: profile.company,
                }))?;
                info!(user_id = %user_id, "Session restored");
                Ok(true)
            }
            Err(err) if err.is_remote_rejection() => {
                warn!(reason = %err.message, "Persisted token rejected, signing out");
                self.forget_token();
                session.dispatch(AuthAction::LoggedOut)?;
                Ok(false)
            }
            Err(err) => self.fail(session, err).map(|()| false),
        }
    }

    pub fn logout(&self, session: &Store<AuthSession>) -> ApiResult<()> {
        self.forget_token();
        session.dispatch(AuthAction::LoggedOut)?;
        info!("Logged out");
        Ok(())
    }

    fn sign_in(&self, session: &Store<AuthSession>, credentials: Credentials) -> ApiResult<()> {
        if let Err(err) = self.tokens.set(TOKEN_KEY, &credentials.token) {
            error!(error = %err, "Failed to persist session token");
        }

        let user_id = credentials.user.id.clone();
        session.dispatch(AuthAction::LoggedIn(credentials))?;
        info!(user_id = %user_id, "Logged in");
        Ok(())
    }

    fn forget_token(&self) {
        if let Err(err) = self.tokens.remove(TOKEN_KEY) {
            error!(error = %err, "Failed to delete session token");
        }
    }

    /// Records a remote failure on the slice and hands it back to the caller.
    fn fail(&self, session: &Store<AuthSession>, err: ApiError) -> ApiResult<()> {
        warn!(code = ?err.code, message = %err.message, "auth request failed");
        session.dispatch(AuthAction::RequestFailed(err.message.clone()))?;
        Err(err)
    }
}
