//! # Remote Auth API
//!
//! JSON-over-HTTPS endpoints for login, signup, OTP verification, password
//! reset and token validation. Every endpoint answers with the same
//! envelope:
//!
//! ```json
//! { "responseCode": 1, "responseMessage": "Success", "response": { ... } }
//! ```
//!
//! Any `responseCode` other than `1` is a rejection; its `responseMessage`
//! is what the user sees.

use std::time::Duration;

use async_trait::async_trait;
use medimart_core::auth::{Company, Credentials, User};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};

/// `responseCode` of a successful call.
pub const RESPONSE_OK: i64 = 1;

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub response_code: i64,
    #[serde(default)]
    pub response_message: String,
    pub response: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwraps the payload, or turns a rejection into [`ApiError::remote`].
    pub fn into_result(self) -> ApiResult<Option<T>> {
        if self.response_code != RESPONSE_OK {
            let message = if self.response_message.trim().is_empty() {
                "Request failed".to_string()
            } else {
                self.response_message
            };
            return Err(ApiError::remote(message));
        }
        Ok(self.response)
    }

    /// Like [`ApiEnvelope::into_result`] but the payload must be present.
    pub fn into_payload(self) -> ApiResult<T> {
        self.into_result()?
            .ok_or_else(|| ApiError::remote("Empty response from server"))
    }
}

// =============================================================================
// Request / Response Payloads
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub contact_info: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub name: String,
    pub contact_info: String,
    pub password: String,
}

/// Used for both signup and password-reset OTPs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub contact_info: String,
    pub otp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    pub contact_info: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub contact_info: String,
    pub new_password: String,
}

/// Who a still-valid token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionProfile {
    pub user: User,
    #[serde(default)]
    pub company: Option<Company>,
}

// =============================================================================
// Auth API
// =============================================================================

/// The remote calls the auth service depends on.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Credentials>;

    /// Registers the account and sends an OTP to the contact.
    async fn signup(&self, request: &SignupRequest) -> ApiResult<()>;

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> ApiResult<Credentials>;

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()>;

    async fn verify_reset_otp(&self, request: &VerifyOtpRequest) -> ApiResult<()>;

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<()>;

    /// Validates a persisted token. A rejection means the token is dead.
    async fn check_token(&self, token: &str) -> ApiResult<SessionProfile>;
}

/// [`AuthApi`] over HTTP with `reqwest`.
#[derive(Clone)]
pub struct HttpAuthApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthApi {
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(HttpAuthApi {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> ApiResult<ApiEnvelope<T>>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned + Send,
    {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status.as_u16(), &body));
        }

        Ok(response.json().await?)
    }
}

/// Maps a non-2xx reply to an error.
///
/// A body carrying a rejecting envelope is a remote rejection with its
/// `responseMessage`; anything else is a transport failure.
fn error_from_status(status: u16, body: &str) -> ApiError {
    match serde_json::from_str::<ApiEnvelope<serde_json::Value>>(body) {
        Ok(envelope) if envelope.response_code != RESPONSE_OK => match envelope.into_result() {
            Err(err) => err,
            Ok(_) => ApiError::network(format!("Server returned {}", status)),
        },
        _ => ApiError::network(format!("Server returned {}", status)),
    }
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<Credentials> {
        self.post("auth/login", request, None).await?.into_payload()
    }

    async fn signup(&self, request: &SignupRequest) -> ApiResult<()> {
        self.post::<_, serde_json::Value>("auth/signup", request, None)
            .await?
            .into_result()
            .map(|_| ())
    }

    async fn verify_otp(&self, request: &VerifyOtpRequest) -> ApiResult<Credentials> {
        self.post("auth/verify-otp", request, None).await?.into_payload()
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> ApiResult<()> {
        self.post::<_, serde_json::Value>("auth/forgot-password", request, None)
            .await?
            .into_result()
            .map(|_| ())
    }

    async fn verify_reset_otp(&self, request: &VerifyOtpRequest) -> ApiResult<()> {
        self.post::<_, serde_json::Value>("auth/verify-reset-otp", request, None)
            .await?
            .into_result()
            .map(|_| ())
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> ApiResult<()> {
        self.post::<_, serde_json::Value>("auth/reset-password", request, None)
            .await?
            .into_result()
            .map(|_| ())
    }

    async fn check_token(&self, token: &str) -> ApiResult<SessionProfile> {
        let body = serde_json::json!({ "token": token });
        self.post("auth/check-token", &body, Some(token))
            .await?
            .into_payload()
    }
}
