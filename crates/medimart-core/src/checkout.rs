//! # Checkout
//!
//! The pure half of placing an order: pricing, the precondition checks, and
//! turning cart lines into an [`Order`]. Committing the order to the stores
//! is done by the client's checkout command.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart ──► CheckoutSummary::for_cart()     item total + fee − discount   │
//! │   │                                                                     │
//! │   ▼                                                                     │
//! │  validate()                                                             │
//! │   ├── cart empty? ──────────────────────► EmptyCart                     │
//! │   ├── Rx line not uploaded/approved? ───► PrescriptionRequired(first)   │
//! │   ├── no payment method? ───────────────► PaymentMethodRequired         │
//! │   └── no delivery address? ─────────────► AddressRequired               │
//! │   │                                                                     │
//! │   ▼                                                                     │
//! │  assemble_order()  ──► Order { status: pending, tracking: placed }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::cart::{Cart, CartLine};
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Order, OrderItem, OrderStatus, PaymentMethod, Tracking};
use crate::validation::validate_delivery_address;

// =============================================================================
// Pricing
// =============================================================================

/// Flat delivery fee in rupees.
///
/// ## Business Reason
/// Charged on every order regardless of size or distance.
pub const DEFAULT_DELIVERY_FEE_RUPEES: i64 = 40;

/// Flat promotional discount in rupees, applied to every order.
pub const DEFAULT_DISCOUNT_RUPEES: i64 = 100;

/// Fixed charges applied on top of the cart total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub delivery_fee: Money,
    pub discount: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            delivery_fee: Money::from_rupees(DEFAULT_DELIVERY_FEE_RUPEES),
            discount: Money::from_rupees(DEFAULT_DISCOUNT_RUPEES),
        }
    }
}

/// The bill shown on the checkout screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub item_total: Money,
    pub delivery_fee: Money,
    pub discount: Money,
    pub final_total: Money,
}

impl CheckoutSummary {
    /// Prices `cart` under `policy`.
    ///
    /// The final total never goes below zero: a cart cheaper than the
    /// discount minus the delivery fee is billed at ₹0.00. Totals are in
    /// the policy's currency, so an empty cart bills zero in that currency.
    pub fn for_cart(cart: &Cart, policy: &PricingPolicy) -> Self {
        let item_total = Money::sum_in(
            policy.delivery_fee.currency(),
            cart.lines().iter().map(CartLine::line_total),
        );
        let final_total = (item_total + policy.delivery_fee - policy.discount).floor_zero();

        CheckoutSummary {
            item_total,
            delivery_fee: policy.delivery_fee,
            discount: policy.discount,
            final_total,
        }
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Why an order cannot be placed yet.
///
/// These are expected outcomes shown to the user, not faults.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckoutBlock {
    #[error("Your cart is empty")]
    EmptyCart,

    /// Points the user at the upload flow for this product.
    #[error("Prescription required for {product_name}")]
    PrescriptionRequired {
        product_id: String,
        product_name: String,
    },

    #[error("Please select a payment method")]
    PaymentMethodRequired,

    #[error("Please enter a delivery address")]
    AddressRequired,

    #[error("Invalid delivery address: {reason}")]
    InvalidAddress { reason: String },
}

/// First prescription line, in cart order, still waiting for an upload.
pub fn first_blocking_prescription(cart: &Cart) -> Option<&CartLine> {
    cart.lines()
        .iter()
        .find(|line| line.needs_prescription())
}

/// Checks every precondition for placing an order.
///
/// Returns the chosen payment method and the trimmed delivery address.
pub fn validate(
    cart: &Cart,
    payment_method: Option<PaymentMethod>,
    delivery_address: Option<&str>,
) -> Result<(PaymentMethod, String), CheckoutBlock> {
    if cart.is_empty() {
        return Err(CheckoutBlock::EmptyCart);
    }

    if let Some(line) = first_blocking_prescription(cart) {
        return Err(CheckoutBlock::PrescriptionRequired {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
        });
    }

    let payment_method = payment_method.ok_or(CheckoutBlock::PaymentMethodRequired)?;

    let address = match delivery_address {
        Some(raw) => validate_delivery_address(raw).map_err(|err| match err {
            ValidationError::Required { .. } => CheckoutBlock::AddressRequired,
            other => CheckoutBlock::InvalidAddress {
                reason: other.to_string(),
            },
        })?,
        None => return Err(CheckoutBlock::AddressRequired),
    };

    Ok((payment_method, address))
}

// =============================================================================
// Order Assembly
// =============================================================================

/// Human-facing order number: `ORD-<yyMMdd>-<HHmmss>-<millis>`.
pub fn order_number(placed_at: DateTime<Utc>) -> String {
    format!("ORD-{}", placed_at.format("%y%m%d-%H%M%S-%3f"))
}

fn order_item(line: &CartLine) -> OrderItem {
    OrderItem {
        id: line.product.id.clone(),
        name: line.product.name.clone(),
        quantity: line.quantity,
        price: line.product.price,
        image: line.product.image.clone(),
        prescription: line.product.prescription,
        prescription_status: line.prescription_status,
        prescription_image: line.prescription_image.clone(),
    }
}

/// Snapshots `cart` into a pending order billed at `summary.final_total`.
///
/// Call only after [`validate`] succeeded.
pub fn assemble_order(
    cart: &Cart,
    summary: &CheckoutSummary,
    payment_method: PaymentMethod,
    delivery_address: String,
    order_id: String,
    placed_at: DateTime<Utc>,
) -> Order {
    Order {
        id: order_id,
        order_number: order_number(placed_at),
        date: placed_at,
        total: summary.final_total,
        status: OrderStatus::Pending,
        payment_method,
        delivery_address,
        items: cart.lines().iter().map(order_item).collect(),
        tracking: Tracking::for_status(OrderStatus::Pending),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PrescriptionStatus, Product};
    use chrono::TimeZone;

    fn product(id: &str, name: &str, rupees: i64, prescription: bool) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::from_rupees(rupees),
            original_price: None,
            image: format!("https://cdn.example.com/{}.png", id),
            prescription,
        }
    }

    fn paracetamol_cart() -> Cart {
        let mut cart = Cart::new();
        cart.add(product("p1", "Paracetamol", 49, false), 2).unwrap();
        cart
    }

    #[test]
    fn test_summary_for_paracetamol() {
        let summary = CheckoutSummary::for_cart(&paracetamol_cart(), &PricingPolicy::default());
        assert_eq!(summary.item_total, Money::from_rupees(98));
        assert_eq!(summary.delivery_fee, Money::from_rupees(40));
        assert_eq!(summary.discount, Money::from_rupees(100));
        assert_eq!(summary.final_total, Money::from_rupees(38));
    }

    #[test]
    fn test_final_total_floors_at_zero() {
        let mut cart = Cart::new();
        cart.add(product("p1", "Cotton Roll", 10, false), 1).unwrap();
        let summary = CheckoutSummary::for_cart(&cart, &PricingPolicy::default());
        assert_eq!(summary.final_total, Money::zero(Default::default()));
    }

    #[test]
    fn test_empty_cart_summary_in_policy_currency() {
        let usd = crate::money::Currency::Usd;
        let policy = PricingPolicy {
            delivery_fee: Money::from_minor(500, usd),
            discount: Money::zero(usd),
        };
        let summary = CheckoutSummary::for_cart(&Cart::with_currency(usd), &policy);

        assert_eq!(summary.item_total, Money::zero(usd));
        assert_eq!(summary.final_total, Money::from_minor(500, usd));
    }

    #[test]
    fn test_empty_cart_blocked_first() {
        let err = validate(&Cart::new(), None, None).unwrap_err();
        assert_eq!(err, CheckoutBlock::EmptyCart);
    }

    #[test]
    fn test_first_pending_prescription_blocks() {
        let mut cart = paracetamol_cart();
        cart.add(product("rx1", "Amoxicillin", 120, true), 1).unwrap();
        cart.add(product("rx2", "Azithromycin", 95, true), 1).unwrap();

        let err = validate(&cart, Some(PaymentMethod::Cod), Some("12 MG Road")).unwrap_err();
        assert_eq!(
            err,
            CheckoutBlock::PrescriptionRequired {
                product_id: "rx1".to_string(),
                product_name: "Amoxicillin".to_string(),
            }
        );

        cart.update_prescription_status(
            "rx1",
            PrescriptionStatus::Uploaded,
            Some("file:///rx1.jpg".to_string()),
        );
        let err = validate(&cart, Some(PaymentMethod::Cod), Some("12 MG Road")).unwrap_err();
        assert!(matches!(err, CheckoutBlock::PrescriptionRequired { ref product_id, .. } if product_id == "rx2"));

        cart.approve_prescription("rx2");
        assert!(validate(&cart, Some(PaymentMethod::Cod), Some("12 MG Road")).is_ok());
    }

    #[test]
    fn test_payment_then_address_required() {
        let cart = paracetamol_cart();
        assert_eq!(
            validate(&cart, None, None).unwrap_err(),
            CheckoutBlock::PaymentMethodRequired
        );
        assert_eq!(
            validate(&cart, Some(PaymentMethod::Upi), Some("   ")).unwrap_err(),
            CheckoutBlock::AddressRequired
        );
        assert_eq!(
            validate(&cart, Some(PaymentMethod::Upi), None).unwrap_err(),
            CheckoutBlock::AddressRequired
        );

        let (method, address) =
            validate(&cart, Some(PaymentMethod::Upi), Some("  12 MG Road  ")).unwrap();
        assert_eq!(method, PaymentMethod::Upi);
        assert_eq!(address, "12 MG Road");
    }

    #[test]
    fn test_assemble_order_snapshot() {
        let mut cart = paracetamol_cart();
        cart.add(product("rx1", "Amoxicillin", 120, true), 1).unwrap();
        cart.update_prescription_status(
            "rx1",
            PrescriptionStatus::Uploaded,
            Some("file:///rx1.jpg".to_string()),
        );

        let placed_at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let summary = CheckoutSummary::for_cart(&cart, &PricingPolicy::default());
        let order = assemble_order(
            &cart,
            &summary,
            PaymentMethod::Card,
            "12 MG Road".to_string(),
            "order-1".to_string(),
            placed_at,
        );

        assert_eq!(order.order_number, "ORD-240309-140507-000");
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total, Money::from_rupees(158));
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[0].price, Money::from_rupees(49));
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(
            order.items[1].prescription_image.as_deref(),
            Some("file:///rx1.jpg")
        );

        let flags: Vec<bool> = order.tracking.steps.iter().map(|s| s.completed).collect();
        assert_eq!(flags, vec![true, false, false, false]);
    }

    #[test]
    fn test_block_messages() {
        let block = CheckoutBlock::PrescriptionRequired {
            product_id: "rx1".to_string(),
            product_name: "Amoxicillin".to_string(),
        };
        assert_eq!(block.to_string(), "Prescription required for Amoxicillin");
    }
}
