//! # Client Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     MEDIMART_API_URL=https://staging.medimart.in/api                   │
//! │     MEDIMART_LOG=debug                                                 │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/medimart/config.toml (Linux)                             │
//! │     ~/Library/Application Support/in.medimart.client/config.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://api.medimart.in"
//! timeout_secs = 15
//!
//! [storage]
//! token_file = "session.json"
//!
//! [checkout]
//! delivery_fee = 40   # rupees
//! discount = 100      # rupees
//!
//! [logging]
//! filter = "info"
//! ```

use std::path::PathBuf;

use directories::ProjectDirs;
use medimart_core::checkout::{DEFAULT_DELIVERY_FEE_RUPEES, DEFAULT_DISCOUNT_RUPEES};
use medimart_core::{Currency, Money, PricingPolicy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Sections
// =============================================================================

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every auth endpoint is resolved against.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.medimart.in".to_string()
}

fn default_timeout() -> u64 {
    15
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Where the session token lives on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    #[serde(default = "default_token_file")]
    pub token_file: String,
}

fn default_token_file() -> String {
    "session.json".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        StorageSettings {
            data_dir: None,
            token_file: default_token_file(),
        }
    }
}

/// Flat charges applied at checkout, in whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    #[serde(default = "default_delivery_fee")]
    pub delivery_fee: i64,

    #[serde(default = "default_discount")]
    pub discount: i64,

    #[serde(default)]
    pub currency: Currency,
}

fn default_delivery_fee() -> i64 {
    DEFAULT_DELIVERY_FEE_RUPEES
}

fn default_discount() -> i64 {
    DEFAULT_DISCOUNT_RUPEES
}

impl Default for CheckoutSettings {
    fn default() -> Self {
        CheckoutSettings {
            delivery_fee: default_delivery_fee(),
            discount: default_discount(),
            currency: Currency::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_filter(),
        }
    }
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ApiResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load client config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn save(&self, config_path: Option<PathBuf>) -> ApiResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ApiError::config("No config path available"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Client config saved");
        Ok(())
    }

    pub fn validate(&self) -> ApiResult<()> {
        let url = self.api.base_url.trim();
        if url.is_empty() {
            return Err(ApiError::config("api.base_url must not be empty"));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ApiError::config(format!(
                "api.base_url must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(ApiError::config("api.timeout_secs must be greater than 0"));
        }

        if self.checkout.delivery_fee < 0 || self.checkout.discount < 0 {
            return Err(ApiError::config("checkout fees must not be negative"));
        }
        let per_major = self.checkout.currency.minor_per_major();
        if self.checkout.delivery_fee.checked_mul(per_major).is_none()
            || self.checkout.discount.checked_mul(per_major).is_none()
        {
            return Err(ApiError::config("checkout fees are too large"));
        }

        if self.storage.token_file.trim().is_empty() {
            return Err(ApiError::config("storage.token_file must not be empty"));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `MEDIMART_*` overrides looked up through `lookup`.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MEDIMART_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(timeout) = lookup("MEDIMART_API_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric MEDIMART_API_TIMEOUT"),
            }
        }

        if let Some(dir) = lookup("MEDIMART_DATA_DIR") {
            self.storage.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(filter) = lookup("MEDIMART_LOG") {
            self.logging.filter = filter;
        }
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("in", "medimart", "client")
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Full path of the session token file.
    pub fn token_path(&self) -> ApiResult<PathBuf> {
        let dir = match &self.storage.data_dir {
            Some(dir) => dir.clone(),
            None => Self::project_dirs()
                .map(|dirs| dirs.data_dir().to_path_buf())
                .ok_or_else(|| ApiError::config("Could not determine app data directory"))?,
        };
        Ok(dir.join(&self.storage.token_file))
    }

    pub fn pricing(&self) -> PricingPolicy {
        let currency = self.checkout.currency;
        let per_major = currency.minor_per_major();
        PricingPolicy {
            delivery_fee: Money::from_minor(
                self.checkout.delivery_fee.saturating_mul(per_major),
                currency,
            ),
            discount: Money::from_minor(self.checkout.discount.saturating_mul(per_major), currency),
        }
    }

    pub fn currency(&self) -> Currency {
        self.checkout.currency
    }
}
