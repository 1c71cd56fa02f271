//! # Error Types
//!
//! Domain-specific error types for medimart-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medimart-core errors (this file)                                      │
//! │  ├── CoreError        - Domain rule violations                         │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CheckoutBlock    - Why an order cannot be placed (checkout.rs)    │
//! │                                                                         │
//! │  medimart-client errors (app crate)                                    │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend toast         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (order id, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. Missing entities are NOT errors: removing an absent cart line or
//!    updating an unknown order is a silent no-op

use thiserror::Error;

use crate::checkout::CheckoutBlock;
use crate::money::Currency;
use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. Reducers that return
/// one of these leave their state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Order status change not allowed by the order lifecycle.
    ///
    /// ## Lifecycle
    /// ```text
    /// pending ──► processing ──► shipped ──► delivered
    ///    │             │
    ///    └──────┬──────┘
    ///           ▼
    ///       cancelled
    /// ```
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidOrderTransition {
        order_id: String,
        from: OrderStatus,
        to: OrderStatus,
    },

    /// Order is not in the history.
    ///
    /// Reducers never raise this; command layers use it when a caller
    /// explicitly asks to read a single order.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// A price in another currency than the store it was added to.
    #[error("Expected a {expected} price, got {found}")]
    CurrencyMismatch { expected: Currency, found: Currency },

    /// Checkout preconditions were not met.
    #[error("Checkout blocked: {0}")]
    CheckoutBlocked(#[from] CheckoutBlock),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., malformed price, bad phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
