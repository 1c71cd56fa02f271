//! # API Error Type
//!
//! Unified error type for client commands and the auth service.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the MediMart Client                    │
//! │                                                                         │
//! │  Screen                      Rust Client                                │
//! │  ──────                      ───────────                                │
//! │                                                                         │
//! │  cancel_order(id)                                                       │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Remote rejected? ─── responseCode != 1 ──────────┐             │  │
//! │  │         │                                          │             │  │
//! │  │         ▼                                          ▼             │  │
//! │  │  Domain rule? ─── CoreError::InvalidOrderTransition ── ApiError ►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ───────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Screen shows a toast with `message`, branches on `code`               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checkout blocks are not errors: `place_order` returns them as data.

use serde::Serialize;
use medimart_core::{CoreError, ValidationError};

/// Result alias used across the client.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from client commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "REMOTE_REJECTED",
///   "message": "Invalid OTP"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for client responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Entity not held by any store
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Domain rule violated (e.g. cancelling a shipped order)
    BusinessLogic,

    /// Backend answered with `responseCode != 1`
    RemoteRejected,

    /// Backend unreachable or answered with a non-2xx status
    NetworkError,

    /// Token file could not be read or written
    StorageError,

    /// Config file unreadable or invalid
    ConfigError,

    /// Unexpected internal failure
    Internal,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// The backend's own `responseMessage`, shown to the user verbatim.
    pub fn remote(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::RemoteRejected, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NetworkError, message)
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::StorageError, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ConfigError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn is_remote_rejection(&self) -> bool {
        self.code == ErrorCode::RemoteRejected
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::OrderNotFound(id) => ApiError::not_found("Order", &id),
            err @ CoreError::InvalidOrderTransition { .. } => {
                ApiError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::CheckoutBlocked(block) => {
                ApiError::new(ErrorCode::BusinessLogic, block.to_string())
            }
            err @ CoreError::CurrencyMismatch { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            tracing::error!("Malformed response from backend: {}", err);
            return ApiError::internal("Unexpected response from server");
        }
        if err.is_timeout() {
            return ApiError::network("Request timed out");
        }
        ApiError::network(format!("Could not reach server: {}", err))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("Stored data is not valid JSON: {}", err);
        ApiError::storage(format!("Corrupt local data: {}", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("Local storage I/O failed: {}", err);
        ApiError::storage(err.to_string())
    }
}

impl From<toml::de::Error> for ApiError {
    fn from(err: toml::de::Error) -> Self {
        ApiError::config(format!("Invalid config file: {}", err))
    }
}

impl From<toml::ser::Error> for ApiError {
    fn from(err: toml::ser::Error) -> Self {
        ApiError::config(format!("Could not serialize config: {}", err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
