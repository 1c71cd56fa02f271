//! # medimart-core: Pure Store Logic for the MediMart Client
//!
//! This crate holds the state the MediMart app keeps while a customer shops:
//! the cart, the watch-later list, order history and the auth session, plus
//! the pricing and precondition rules of checkout. Everything here is a pure
//! function of its inputs.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       MediMart Client Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Screens (mobile frontend)                    │   │
//! │  │   Catalogue ──► Cart ──► Checkout ──► Orders ──► Tracking      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                medimart-client (commands, stores)               │   │
//! │  │   add_to_cart, place_order, login, restore_session, etc.       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ medimart-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐ ┌──────────┐ │   │
//! │  │   │  cart   │ │watch_later│ │ orders  │ │  auth  │ │ checkout │ │   │
//! │  │   └─────────┘ └──────────┘ └─────────┘ └────────┘ └──────────┘ │   │
//! │  │   ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐              │   │
//! │  │   │  money  │ │  types   │ │validation│ │ slice  │              │   │
//! │  │   └─────────┘ └──────────┘ └─────────┘ └────────┘              │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO CLOCK • PURE REDUCERS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money in paise with a currency tag (no floating point)
//! - [`types`] - Products, orders, tracking, payment methods
//! - [`slice`] - The reducer contract every store implements
//! - [`cart`], [`watch_later`], [`orders`], [`auth`] - The four store slices
//! - [`checkout`] - Pricing, checkout preconditions, order assembly
//! - [`validation`] - Input rules for contact info, OTPs, addresses
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use medimart_core::cart::Cart;
//! use medimart_core::checkout::{CheckoutSummary, PricingPolicy};
//! use medimart_core::money::{Currency, Money};
//! use medimart_core::types::CatalogProduct;
//!
//! let paracetamol = CatalogProduct {
//!     id: "p1".to_string(),
//!     name: "Paracetamol 500mg".to_string(),
//!     price: "₹49".to_string(),
//!     original_price: None,
//!     image: String::new(),
//!     prescription: false,
//! }
//! .into_product(Currency::Inr)
//! .unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add(paracetamol, 2).unwrap();
//!
//! let summary = CheckoutSummary::for_cart(&cart, &PricingPolicy::default());
//! // 98 + 40 delivery − 100 discount
//! assert_eq!(summary.final_total, Money::from_rupees(38));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod money;
pub mod orders;
pub mod slice;
pub mod types;
pub mod validation;
pub mod watch_later;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use auth::{AuthAction, AuthSession};
pub use cart::{Cart, CartAction, CartLine, CartTotals};
pub use checkout::{CheckoutBlock, CheckoutSummary, PricingPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Currency, Money};
pub use orders::{OrderAction, OrderFilters, OrderHistory};
pub use slice::Slice;
pub use types::*;
pub use watch_later::{WatchLater, WatchLaterAction};
