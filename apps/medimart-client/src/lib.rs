//! # MediMart Client Library
//!
//! State, checkout and session layer for the MediMart pharmacy app.
//! Business rules live in `medimart-core`; this crate owns the stores,
//! the remote auth API and everything that touches the disk.
//!
//! ## Module Organization
//! ```text
//! medimart_client/
//! ├── lib.rs          ◄─── You are here (bootstrap & run)
//! ├── config.rs       ◄─── TOML config + env overrides
//! ├── error.rs        ◄─── ApiError returned by every command
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState (one store per slice)
//! │   └── store.rs    ◄─── Store<S>: watch-channel slice container
//! ├── commands/
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   ├── watch_later.rs
//! │   ├── orders.rs   ◄─── Order history, cancel, filters
//! │   └── checkout.rs ◄─── Atomic order placement
//! ├── api.rs          ◄─── Remote auth endpoints (reqwest)
//! ├── auth.rs         ◄─── Login, signup, OTP, password reset
//! └── token_store.rs  ◄─── Persisted session token
//! ```
//!
//! ## Wiring
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ClientConfig ──► AppState::from_config ──► Store<Cart>, Store<Orders>… │
//! │       │                                                                 │
//! │       ├──► HttpAuthApi (base_url, timeout) ──┐                          │
//! │       │                                      ├──► AuthService           │
//! │       └──► FileKeyValueStore (token_path) ───┘                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;
pub mod token_store;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use api::HttpAuthApi;
use auth::AuthService;
use config::ClientConfig;
use error::ApiResult;
use state::AppState;
use token_store::FileKeyValueStore;

/// A fully wired client: stores plus the services that feed them.
pub struct Client {
    pub config: ClientConfig,
    pub state: AppState,
    pub auth: AuthService,
}

impl Client {
    /// Builds the stores and services. Performs no network calls.
    pub fn from_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;

        let state = AppState::from_config(&config);
        let tokens = FileKeyValueStore::new(config.token_path()?);
        let api = HttpAuthApi::new(
            &config.api.base_url,
            Duration::from_secs(config.api.timeout_secs),
        )?;
        let auth = AuthService::new(Arc::new(api), Arc::new(tokens));

        Ok(Client {
            config,
            state,
            auth,
        })
    }

    /// Re-validates a saved token, if any.
    ///
    /// An unreachable backend is logged and tolerated; the token is kept
    /// for the next attempt.
    pub async fn restore_session(&self) -> bool {
        match self.auth.restore_session(&self.state.auth).await {
            Ok(restored) => restored,
            Err(err) => {
                warn!(error = %err, "Could not restore saved session");
                false
            }
        }
    }
}

/// Runs the client bootstrap.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load config ──► file (or defaults) + MEDIMART_* env overrides       │
/// │  2. Initialize logging ──► RUST_LOG, else logging.filter                │
/// │  3. Build stores and services                                           │
/// │  4. Restore the saved session (best effort)                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> ApiResult<()> {
    let config = ClientConfig::load_or_default(config_path);
    init_tracing(&config.logging.filter);

    info!(api = %config.api.base_url, "Starting MediMart client");

    let client = Client::from_config(config)?;
    let signed_in = client.restore_session().await;

    let (cart_lines, orders) = (
        client.state.cart.with_state(|cart| cart.lines().len()),
        client.state.orders.with_state(|history| history.len()),
    );
    info!(
        signed_in,
        cart_lines,
        orders,
        currency = ?client.state.currency,
        "Client ready"
    );

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every dispatched action
/// - `RUST_LOG=medimart_client=trace` - Trace this crate only
/// - Default: the config's `logging.filter`
///
/// Calling it twice keeps the first subscriber.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn config_in(dir: &std::path::Path) -> ClientConfig {
        let mut config = ClientConfig::default();
        config.storage.data_dir = Some(dir.to_path_buf());
        config
    }

    #[test]
    fn test_client_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::from_config(config_in(dir.path())).unwrap();

        assert!(client.state.cart.with_state(|cart| cart.lines().is_empty()));
        assert!(!client.state.auth.with_state(|session| session.is_authenticated));
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_in(dir.path());
        config.api.base_url = String::new();

        let err = Client::from_config(config).err().unwrap();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[tokio::test]
    async fn test_restore_without_saved_token() {
        let dir = tempfile::tempdir().unwrap();
        let client = Client::from_config(config_in(dir.path())).unwrap();

        assert!(!client.restore_session().await);
    }
}
