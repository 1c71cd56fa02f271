//! # Domain Types
//!
//! Core domain types shared by every store slice.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Order      │   │   OrderItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id (UUID v7)   │   │  id (product)   │       │
//! │  │  name           │   │  order_number   │   │  name           │       │
//! │  │  price (Money)  │   │  status         │   │  price (Money)  │       │
//! │  │  prescription   │   │  tracking       │   │  rx status      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ Prescription    │   │  OrderStatus    │   │ PaymentMethod   │       │
//! │  │ Status          │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  NotRequired    │   │  Pending        │   │  Upi            │       │
//! │  │  Pending        │   │  Processing     │   │  Card           │       │
//! │  │  Uploaded       │   │  Shipped        │   │  Cod            │       │
//! │  │  Approved       │   │  Delivered      │   └─────────────────┘       │
//! │  └─────────────────┘   │  Cancelled      │                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ingestion Boundary
//! The catalogue API sends [`CatalogProduct`] with display-string prices.
//! They become [`Product`] exactly once, through `TryFrom`, and nothing past
//! that point ever parses a price string again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::{Currency, Money};

// =============================================================================
// Product
// =============================================================================

/// A product as it arrives from the catalogue API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct {
    pub id: String,
    pub name: String,
    /// Display price, e.g. `"₹299"`.
    pub price: String,
    #[serde(default)]
    pub original_price: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub prescription: bool,
}

impl CatalogProduct {
    /// Converts the payload into a [`Product`] priced in `currency`.
    ///
    /// ## Errors
    /// `ValidationError` when the id is blank or a price is malformed.
    pub fn into_product(self, currency: Currency) -> Result<Product, ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "product id".to_string(),
            });
        }

        let price = Money::parse(&self.price, currency)?;
        let original_price = self
            .original_price
            .as_deref()
            .map(|raw| Money::parse(raw, currency))
            .transpose()?;

        Ok(Product {
            id: self.id,
            name: self.name,
            price,
            original_price,
            image: self.image,
            prescription: self.prescription,
        })
    }
}

impl TryFrom<CatalogProduct> for Product {
    type Error = ValidationError;

    fn try_from(raw: CatalogProduct) -> Result<Self, Self::Error> {
        raw.into_product(Currency::default())
    }
}

/// A product available for purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier from the catalogue.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Selling price.
    pub price: Money,

    /// Price before discount, shown struck through.
    pub original_price: Option<Money>,

    /// Image URL.
    pub image: String,

    /// Whether purchase requires an uploaded prescription.
    pub prescription: bool,
}

// =============================================================================
// Prescription Status
// =============================================================================

/// Where a cart line stands in the prescription workflow.
///
/// ```text
/// prescription == false ──► NotRequired (forever)
///
/// prescription == true  ──► Pending ──upload──► Uploaded ──approve──► Approved
///                              └──────────────approve────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PrescriptionStatus {
    NotRequired,
    Pending,
    Uploaded,
    Approved,
}

impl PrescriptionStatus {
    /// Initial status for a product entering the cart.
    pub const fn initial_for(product: &Product) -> Self {
        if product.prescription {
            PrescriptionStatus::Pending
        } else {
            PrescriptionStatus::NotRequired
        }
    }

    /// True when the line no longer blocks checkout.
    pub const fn is_resolved(&self) -> bool {
        matches!(
            self,
            PrescriptionStatus::NotRequired
                | PrescriptionStatus::Uploaded
                | PrescriptionStatus::Approved
        )
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Unified Payments Interface.
    Upi,
    /// Credit or debit card.
    Card,
    /// Cash on delivery.
    Cod,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Upi => write!(f, "upi"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cod => write!(f, "cod"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "upi" => Ok(PaymentMethod::Upi),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            "cod" | "cash" => Ok(PaymentMethod::Cod),
            other => Err(ValidationError::InvalidFormat {
                field: "payment method".to_string(),
                reason: format!("unknown method '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle status of a placed order.
///
/// ## State Machine
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Pending ──► Processing ──► Shipped ──► Delivered (terminal)           │
/// │     │            │                                                      │
/// │     └─────┬──────┘                                                      │
/// │           ▼                                                             │
/// │       Cancelled (terminal)                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// Index of the last tracking step this status has reached.
    ///
    /// Cancelled orders only ever reached "Order Placed".
    pub const fn progress_stage(&self) -> usize {
        match self {
            OrderStatus::Pending | OrderStatus::Cancelled => 0,
            OrderStatus::Processing => 1,
            OrderStatus::Shipped => 2,
            OrderStatus::Delivered => 3,
        }
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub const fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Processing, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Processing => write!(f, "processing"),
            OrderStatus::Shipped => write!(f, "shipped"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(OrderStatus::Pending),
            "processing" => Ok(OrderStatus::Processing),
            "shipped" => Ok(OrderStatus::Shipped),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" | "canceled" => Ok(OrderStatus::Cancelled),
            other => Err(ValidationError::InvalidFormat {
                field: "order status".to_string(),
                reason: format!("unknown status '{}'", other),
            }),
        }
    }
}

// =============================================================================
// Tracking
// =============================================================================

/// Titles of the fixed tracking sequence, in display order.
pub const TRACKING_STEP_TITLES: [&str; 4] = ["Order Placed", "Processing", "Shipped", "Delivered"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStep {
    pub title: String,
    pub completed: bool,
}

/// Denormalised tracking view of an order.
///
/// ## Invariant
/// `steps` is always the four canonical steps and their `completed` flags
/// are a function of `status` alone. Build it with [`Tracking::for_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Tracking {
    pub status: OrderStatus,
    pub steps: Vec<TrackingStep>,
}

impl Tracking {
    /// Derives the canonical steps for `status`.
    ///
    /// ## Example
    /// ```rust
    /// use medimart_core::types::{OrderStatus, Tracking};
    ///
    /// let tracking = Tracking::for_status(OrderStatus::Shipped);
    /// let flags: Vec<bool> = tracking.steps.iter().map(|s| s.completed).collect();
    /// assert_eq!(flags, vec![true, true, true, false]);
    /// ```
    pub fn for_status(status: OrderStatus) -> Self {
        let reached = status.progress_stage();
        let steps = TRACKING_STEP_TITLES
            .iter()
            .enumerate()
            .map(|(index, title)| TrackingStep {
                title: (*title).to_string(),
                completed: index <= reached,
            })
            .collect();

        Tracking { status, steps }
    }

    /// Number of completed steps.
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|step| step.completed).count()
    }

    /// True when `steps` matches what [`Tracking::for_status`] would build.
    pub fn is_canonical(&self) -> bool {
        *self == Tracking::for_status(self.status)
    }
}

impl Default for Tracking {
    fn default() -> Self {
        Tracking::for_status(OrderStatus::Pending)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line item in a placed order.
/// Uses snapshot pattern to freeze product data at time of checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// Product id at time of checkout.
    pub id: String,
    pub name: String,
    #[ts(type = "number")]
    pub quantity: i64,
    /// Unit price at time of checkout (frozen).
    pub price: Money,
    pub image: String,
    pub prescription: bool,
    pub prescription_status: PrescriptionStatus,
    pub prescription_image: Option<String>,
}

/// A placed order as held by the order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    /// Human-facing order number shown on the confirmation screen.
    pub order_number: String,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    pub total: Money,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub delivery_address: String,
    pub items: Vec<OrderItem>,
    /// Missing in some backend payloads; rebuilt from `status` on ingest.
    #[serde(default)]
    pub tracking: Tracking,
}

// =============================================================================
// Unit Tests
// =============================================================================
