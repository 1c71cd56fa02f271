//! # State Module
//!
//! The process-wide state: one [`Store`] per slice. Each store is locked
//! independently, so a cart update never waits on an auth request.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                         AppState                                │   │
//! │  │  passed explicitly to every command (no globals)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                              │                                          │
//! │      ┌──────────────┬────────┴───────┬──────────────────┐               │
//! │      ▼              ▼                ▼                  ▼               │
//! │  ┌─────────┐  ┌────────────┐  ┌──────────────┐  ┌─────────────┐         │
//! │  │  cart   │  │watch_later │  │   orders     │  │    auth     │         │
//! │  │ Store<  │  │  Store<    │  │   Store<     │  │   Store<    │         │
//! │  │  Cart>  │  │ WatchLater>│  │ OrderHistory>│  │ AuthSession>│         │
//! │  └─────────┘  └────────────┘  └──────────────┘  └─────────────┘         │
//! │                                                                         │
//! │  pricing + currency: read-only after startup                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod store;

pub use store::Store;

use medimart_core::{AuthSession, Cart, Currency, OrderHistory, PricingPolicy, WatchLater};

use crate::config::ClientConfig;

pub struct AppState {
    pub cart: Store<Cart>,
    pub watch_later: Store<WatchLater>,
    pub orders: Store<OrderHistory>,
    pub auth: Store<AuthSession>,
    pub pricing: PricingPolicy,
    /// Currency catalogue prices are parsed in.
    pub currency: Currency,
}

impl AppState {
    pub fn new(pricing: PricingPolicy, currency: Currency) -> Self {
        AppState {
            cart: Store::new(Cart::with_currency(currency)),
            watch_later: Store::default(),
            orders: Store::default(),
            auth: Store::default(),
            pricing,
            currency,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        AppState::new(config.pricing(), config.currency())
    }
}

impl Default for AppState {
    fn default() -> Self {
        AppState::new(PricingPolicy::default(), Currency::default())
    }
}
