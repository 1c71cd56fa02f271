//! # Commands Module
//!
//! Everything the screens call. Each command borrows only the stores it
//! touches and returns a serializable response or an [`ApiError`].
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (exports)
//! ├── cart.rs         ◄─── Cart lines and prescription uploads
//! ├── watch_later.rs  ◄─── Saved-for-later list
//! ├── orders.rs       ◄─── Order history, status, filters
//! └── checkout.rs     ◄─── Bill summary and order placement
//! ```
//!
//! Auth commands live on [`AuthService`](crate::auth::AuthService) because
//! they need the remote API and the token store.
//!
//! ## State Injection
//! ```rust,ignore
//! // Only needs the cart
//! get_cart(&state.cart)
//!
//! // Needs cart, orders and auth together
//! place_order(&state, request)
//! ```
//!
//! [`ApiError`]: crate::error::ApiError

pub mod cart;
pub mod checkout;
pub mod orders;
pub mod watch_later;
