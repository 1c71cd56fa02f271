//! # Cart Slice
//!
//! Holds the shopping cart and its prescription workflow.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Frontend Action          CartAction                 State Change       │
//! │  ───────────────          ──────────                 ────────────       │
//! │                                                                         │
//! │  Tap "Add" ──────────────► Add ─────────────────────► merge or push    │
//! │                                                                         │
//! │  Stepper +/- ────────────► UpdateQuantity ──────────► qty = n          │
//! │                                                       (n < 1 removes)  │
//! │                                                                         │
//! │  Swipe to delete ────────► Remove ──────────────────► retain != id     │
//! │                                                                         │
//! │  Upload Rx photo ────────► UpdatePrescriptionStatus ─► uploaded + uri  │
//! │                                                                         │
//! │  Pharmacist approves ────► ApprovePrescription ─────► approved         │
//! │                                                                         │
//! │  Order placed ───────────► Clear ───────────────────► lines.clear()    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Operations on a product that is not in the cart are silent no-ops. Adds
//! are rejected when the price is in another currency than the cart, or when
//! the line would exceed [`MAX_LINE_QUANTITY`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Currency, Money};
use crate::slice::Slice;
use crate::types::{PrescriptionStatus, Product};
use crate::validation::{validate_line_quantity, MAX_LINE_QUANTITY};

/// One row of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product: Product,

    /// Always >= 1.
    #[ts(type = "number")]
    pub quantity: i64,

    /// `NotRequired` iff `product.prescription` is false.
    pub prescription_status: PrescriptionStatus,

    /// URI of the uploaded prescription photo.
    pub prescription_image: Option<String>,
}

impl CartLine {
    /// Creates a new line with the prescription status the product implies.
    pub fn from_product(product: Product, quantity: i64) -> Self {
        CartLine {
            prescription_status: PrescriptionStatus::initial_for(&product),
            product,
            quantity,
            prescription_image: None,
        }
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total(&self) -> Money {
        self.product.price * self.quantity
    }

    /// True when this line still blocks checkout.
    pub fn needs_prescription(&self) -> bool {
        self.product.prescription && !self.prescription_status.is_resolved()
    }
}

/// Every mutation the cart accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    Add {
        product: Product,
        quantity: i64,
    },
    Remove {
        product_id: String,
    },
    UpdateQuantity {
        product_id: String,
        quantity: i64,
    },
    Clear,
    UpdatePrescriptionStatus {
        product_id: String,
        status: PrescriptionStatus,
        prescription_image: Option<String>,
    },
    ApprovePrescription {
        product_id: String,
    },
}

/// The shopping cart.
///
/// ## Invariants
/// - Lines are unique by `product.id` (adding the same product increases quantity)
/// - Quantity is between 1 and [`MAX_LINE_QUANTITY`]
/// - Prescription status is `NotRequired` iff the product needs none
/// - Every price is in the cart's currency
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    lines: Vec<CartLine>,
    #[serde(default)]
    currency: Currency,
}

impl Cart {
    /// Creates a new empty rupee cart.
    pub fn new() -> Self {
        Cart::default()
    }

    pub fn with_currency(currency: Currency) -> Self {
        Cart {
            lines: Vec::new(),
            currency,
        }
    }

    pub fn currency(&self) -> Currency {
        self.currency
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn line(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product_id)
    }

    fn line_mut(&mut self, product_id: &str) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.product.id == product_id)
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If product already in cart: quantity increases by `quantity`
    /// - If product not in cart: appended as a new line
    /// - `quantity < 1`: nothing happens
    ///
    /// ## Errors
    /// - `CurrencyMismatch` if the price is not in the cart's currency
    /// - `Validation(OutOfRange)` if the line would exceed [`MAX_LINE_QUANTITY`]
    pub fn add(&mut self, product: Product, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            return Ok(());
        }

        let found = product.price.currency();
        if found != self.currency {
            return Err(CoreError::CurrencyMismatch {
                expected: self.currency,
                found,
            });
        }

        if let Some(line) = self.line_mut(&product.id) {
            let merged = line.quantity.saturating_add(quantity);
            validate_line_quantity(merged)?;
            line.quantity = merged;
            return Ok(());
        }

        validate_line_quantity(quantity)?;
        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Removes the line for `product_id`. Idempotent.
    pub fn remove(&mut self, product_id: &str) {
        self.lines.retain(|line| line.product.id != product_id);
    }

    /// Sets the quantity of a line to exactly `quantity`.
    ///
    /// ## Behavior
    /// - `quantity < 1`: removes the line
    /// - Product not in cart: nothing happens
    /// - Above [`MAX_LINE_QUANTITY`]: rejected, line unchanged
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            self.remove(product_id);
            return Ok(());
        }

        validate_line_quantity(quantity)?;
        if let Some(line) = self.line_mut(product_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Clears all lines from the cart.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Records progress in the prescription workflow.
    ///
    /// Ignored when the line is absent, when the product needs no
    /// prescription, or when `NotRequired` is requested for one that does.
    pub fn update_prescription_status(
        &mut self,
        product_id: &str,
        status: PrescriptionStatus,
        prescription_image: Option<String>,
    ) {
        if status == PrescriptionStatus::NotRequired {
            return;
        }

        if let Some(line) = self.line_mut(product_id) {
            if line.product.prescription {
                line.prescription_status = status;
                line.prescription_image = prescription_image;
            }
        }
    }

    /// Force-sets a prescription line to `Approved`.
    pub fn approve_prescription(&mut self, product_id: &str) {
        if let Some(line) = self.line_mut(product_id) {
            if line.product.prescription {
                line.prescription_status = PrescriptionStatus::Approved;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Derived selectors
    // -------------------------------------------------------------------------

    /// Sum of unit price × quantity over all lines.
    pub fn total(&self) -> Money {
        Money::sum_in(self.currency, self.lines.iter().map(CartLine::line_total))
    }

    /// Lines whose product requires a prescription, whatever their status.
    pub fn prescription_items(&self) -> Vec<&CartLine> {
        self.lines
            .iter()
            .filter(|line| line.product.prescription)
            .collect()
    }

    /// Prescription lines that still block checkout, in cart order.
    pub fn pending_prescriptions(&self) -> Vec<&CartLine> {
        self.lines
            .iter()
            .filter(|line| line.needs_prescription())
            .collect()
    }

    /// Number of distinct products.
    pub fn item_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Slice for Cart {
    type Action = CartAction;

    const NAME: &'static str = "cart";

    fn reduce(&mut self, action: CartAction) -> CoreResult<()> {
        match action {
            CartAction::Add { product, quantity } => return self.add(product, quantity),
            CartAction::Remove { product_id } => self.remove(&product_id),
            CartAction::UpdateQuantity {
                product_id,
                quantity,
            } => return self.update_quantity(&product_id, quantity),
            CartAction::Clear => self.clear(),
            CartAction::UpdatePrescriptionStatus {
                product_id,
                status,
                prescription_image,
            } => self.update_prescription_status(&product_id, status, prescription_image),
            CartAction::ApprovePrescription { product_id } => {
                self.approve_prescription(&product_id)
            }
        }
        Ok(())
    }
}

/// Cart totals summary for the cart screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    #[ts(type = "number")]
    pub total_quantity: i64,
    pub total: Money,
    pub pending_prescriptions: usize,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            total: cart.total(),
            pending_prescriptions: cart.pending_prescriptions().len(),
        }
    }
}
