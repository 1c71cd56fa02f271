//! # Auth Session Slice
//!
//! Shape of the signed-in session plus the forgot-password wizard state.
//! The HTTP calls that drive it live in the client's auth service; this
//! slice only records their outcomes.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  signed out ──RequestStarted──► loading ──LoggedIn──► authenticated     │
//! │      ▲                            │                        │            │
//! │      │                            └──RequestFailed──► error set         │
//! │      │                                                     │            │
//! │      └──────────────────────LoggedOut──────────────────────┘            │
//! │                                                                         │
//! │  signup:           SignupPending ──► LoggedIn                           │
//! │  forgot password:  ResetOtpSent ──► ResetOtpVerified ──► PasswordReset  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::slice::Slice;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Saved delivery address, used when checkout is given none.
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
}

/// What a successful login or OTP verification hands back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user: User,
    pub token: String,
    #[serde(default)]
    pub company: Option<Company>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ResetFlow {
    pub contact_info: Option<String>,
    pub otp_sent: bool,
    pub otp_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    RequestStarted,
    /// A remote call failed; the message is shown once then cleared.
    RequestFailed(String),
    LoggedIn(Credentials),
    /// Signup accepted, waiting for the OTP sent to `contact_info`.
    SignupPending { contact_info: String },
    ResetOtpSent { contact_info: String },
    ResetOtpVerified,
    PasswordReset,
    LoggedOut,
    ClearError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub user: Option<User>,
    pub token: Option<String>,
    pub company: Option<Company>,
    pub is_authenticated: bool,
    /// Contact a signup OTP was sent to. Separate from the reset wizard.
    #[serde(default)]
    pub signup_pending: Option<String>,
    pub reset_flow: ResetFlow,
    pub loading: bool,
    pub error: Option<String>,
}

impl AuthSession {
    pub fn new() -> Self {
        AuthSession::default()
    }

    /// The signed-in user's saved address, if any and non-blank.
    pub fn saved_address(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.address.as_deref())
            .filter(|address| !address.trim().is_empty())
    }
}

impl Slice for AuthSession {
    type Action = AuthAction;

    const NAME: &'static str = "auth";

    fn reduce(&mut self, action: AuthAction) -> CoreResult<()> {
        match action {
            AuthAction::RequestStarted => {
                self.loading = true;
                self.error = None;
            }
            AuthAction::RequestFailed(message) => {
                self.loading = false;
                self.error = Some(message);
            }
            AuthAction::LoggedIn(credentials) => {
                self.user = Some(credentials.user);
                self.token = Some(credentials.token);
                self.company = credentials.company;
                self.is_authenticated = true;
                self.signup_pending = None;
                self.reset_flow = ResetFlow::default();
                self.loading = false;
                self.error = None;
            }
            AuthAction::SignupPending { contact_info } => {
                self.loading = false;
                self.signup_pending = Some(contact_info);
            }
            AuthAction::ResetOtpSent { contact_info } => {
                self.loading = false;
                self.reset_flow = ResetFlow {
                    contact_info: Some(contact_info),
                    otp_sent: true,
                    otp_verified: false,
                };
            }
            AuthAction::ResetOtpVerified => {
                self.loading = false;
                self.reset_flow.otp_verified = true;
            }
            AuthAction::PasswordReset => {
                self.loading = false;
                self.reset_flow = ResetFlow::default();
            }
            AuthAction::LoggedOut => *self = AuthSession::default(),
            AuthAction::ClearError => self.error = None,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            user: User {
                id: "u1".to_string(),
                name: "Asha".to_string(),
                email: Some("asha@example.com".to_string()),
                phone: None,
                address: Some("12 MG Road, Pune".to_string()),
            },
            token: "tok-123".to_string(),
            company: None,
        }
    }

    #[test]
    fn test_login_sets_authenticated() {
        let mut session = AuthSession::new();
        session.reduce(AuthAction::RequestStarted).unwrap();
        assert!(session.loading);

        session.reduce(AuthAction::LoggedIn(credentials())).unwrap();
        assert!(session.is_authenticated);
        assert!(!session.loading);
        assert_eq!(session.token.as_deref(), Some("tok-123"));
        assert_eq!(session.saved_address(), Some("12 MG Road, Pune"));
    }

    #[test]
    fn test_failure_is_stored_as_data() {
        let mut session = AuthSession::new();
        session.reduce(AuthAction::RequestStarted).unwrap();
        session
            .reduce(AuthAction::RequestFailed("Invalid password".to_string()))
            .unwrap();

        assert!(!session.is_authenticated);
        assert!(!session.loading);
        assert_eq!(session.error.as_deref(), Some("Invalid password"));

        session.reduce(AuthAction::ClearError).unwrap();
        assert!(session.error.is_none());
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut session = AuthSession::new();
        session.reduce(AuthAction::LoggedIn(credentials())).unwrap();
        session.reduce(AuthAction::LoggedOut).unwrap();
        assert_eq!(session, AuthSession::default());
    }

    #[test]
    fn test_reset_flow_progression() {
        let mut session = AuthSession::new();
        session
            .reduce(AuthAction::ResetOtpSent {
                contact_info: "9876543210".to_string(),
            })
            .unwrap();
        assert!(session.reset_flow.otp_sent);
        assert!(!session.reset_flow.otp_verified);

        session.reduce(AuthAction::ResetOtpVerified).unwrap();
        assert!(session.reset_flow.otp_verified);

        session.reduce(AuthAction::PasswordReset).unwrap();
        assert_eq!(session.reset_flow, ResetFlow::default());
        assert!(!session.is_authenticated);
    }

    #[test]
    fn test_signup_does_not_open_reset_flow() {
        let mut session = AuthSession::new();
        session
            .reduce(AuthAction::SignupPending {
                contact_info: "asha@example.com".to_string(),
            })
            .unwrap();

        assert_eq!(session.signup_pending.as_deref(), Some("asha@example.com"));
        assert_eq!(session.reset_flow, ResetFlow::default());

        session.reduce(AuthAction::LoggedIn(credentials())).unwrap();
        assert!(session.signup_pending.is_none());
    }

    #[test]
    fn test_blank_saved_address_ignored() {
        let mut creds = credentials();
        creds.user.address = Some("   ".to_string());
        let mut session = AuthSession::new();
        session.reduce(AuthAction::LoggedIn(creds)).unwrap();
        assert_eq!(session.saved_address(), None);
    }
}
