//! # Cart Commands
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ In Cart  │────►│ Rx done  │────►│  Order   │       │
//! │  │  Cart    │     │          │     │          │     │  placed  │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                 │                              │
//! │                   add_to_cart    update_prescription_status            │
//! │                   update_item    approve_prescription                  │
//! │                   remove_item                 │                        │
//! │                        │                 place_order                   │
//! │                        ▼                 (checkout.rs)                 │
//! │                   clear_cart ──────────────────────►                   │
//! │                                                      (back to empty)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medimart_core::types::{CatalogProduct, PrescriptionStatus, Product};
use medimart_core::{Cart, CartAction, CartLine, CartTotals, Currency};
use serde::Serialize;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::Store;

/// Cart lines plus derived totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines().to_vec(),
            totals: CartTotals::from(cart),
        }
    }
}

fn apply(cart: &Store<Cart>, action: CartAction) -> ApiResult<CartResponse> {
    cart.dispatch(action)?;
    Ok(cart.with_state(|c| CartResponse::from(c)))
}

pub fn get_cart(cart: &Store<Cart>) -> CartResponse {
    debug!("get_cart command");
    cart.with_state(|c| CartResponse::from(c))
}

/// Adds a product, or increases the quantity of its existing line.
///
/// ## Arguments
/// * `quantity` - Quantity to add (default: 1). Below 1 changes nothing.
pub fn add_to_cart(
    cart: &Store<Cart>,
    product: Product,
    quantity: Option<i64>,
) -> ApiResult<CartResponse> {
    let quantity = quantity.unwrap_or(1);
    debug!(product_id = %product.id, quantity = %quantity, "add_to_cart command");
    apply(cart, CartAction::Add { product, quantity })
}

/// Adds a product straight from a catalogue payload.
///
/// The display price is parsed here; a malformed price is rejected and
/// never reaches the cart.
pub fn add_catalog_product(
    cart: &Store<Cart>,
    product: CatalogProduct,
    quantity: Option<i64>,
    currency: Currency,
) -> ApiResult<CartResponse> {
    let product = product.into_product(currency)?;
    add_to_cart(cart, product, quantity)
}

/// Sets the quantity of a line. Below 1 removes it.
pub fn update_cart_item(
    cart: &Store<Cart>,
    product_id: String,
    quantity: i64,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, quantity = %quantity, "update_cart_item command");
    apply(
        cart,
        CartAction::UpdateQuantity {
            product_id,
            quantity,
        },
    )
}

pub fn remove_from_cart(cart: &Store<Cart>, product_id: String) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, "remove_from_cart command");
    apply(cart, CartAction::Remove { product_id })
}

pub fn clear_cart(cart: &Store<Cart>) -> ApiResult<CartResponse> {
    debug!("clear_cart command");
    apply(cart, CartAction::Clear)
}

/// Records an uploaded prescription photo (or any other workflow step).
pub fn update_prescription_status(
    cart: &Store<Cart>,
    product_id: String,
    status: PrescriptionStatus,
    prescription_image: Option<String>,
) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, ?status, "update_prescription_status command");
    apply(
        cart,
        CartAction::UpdatePrescriptionStatus {
            product_id,
            status,
            prescription_image,
        },
    )
}

pub fn approve_prescription(cart: &Store<Cart>, product_id: String) -> ApiResult<CartResponse> {
    debug!(product_id = %product_id, "approve_prescription command");
    apply(cart, CartAction::ApprovePrescription { product_id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use medimart_core::Money;

    fn catalog(id: &str, price: &str, prescription: bool) -> CatalogProduct {
        CatalogProduct {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: price.to_string(),
            original_price: None,
            image: String::new(),
            prescription,
        }
    }

    #[test]
    fn test_add_catalog_product_parses_price() {
        let cart = Store::<Cart>::default();
        let response =
            add_catalog_product(&cart, catalog("p1", "₹49.50", false), Some(2), Currency::Inr)
                .unwrap();

        assert_eq!(response.totals.total, Money::from_paise(9900));
        assert_eq!(response.totals.total_quantity, 2);
    }

    #[test]
    fn test_malformed_price_rejected() {
        let cart = Store::<Cart>::default();
        let err = add_catalog_product(&cart, catalog("p1", "forty", false), None, Currency::Inr)
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(get_cart(&cart).lines.is_empty());
    }

    #[test]
    fn test_prescription_workflow() {
        let cart = Store::<Cart>::default();
        add_catalog_product(&cart, catalog("rx1", "₹120", true), None, Currency::Inr).unwrap();
        assert_eq!(get_cart(&cart).totals.pending_prescriptions, 1);

        let response = update_prescription_status(
            &cart,
            "rx1".to_string(),
            PrescriptionStatus::Uploaded,
            Some("file:///rx1.jpg".to_string()),
        )
        .unwrap();
        assert_eq!(response.totals.pending_prescriptions, 0);
        assert_eq!(response.lines[0].prescription_image.as_deref(), Some("file:///rx1.jpg"));

        let response = approve_prescription(&cart, "rx1".to_string()).unwrap();
        assert_eq!(response.lines[0].prescription_status, PrescriptionStatus::Approved);
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let cart = Store::<Cart>::default();
        add_catalog_product(&cart, catalog("p1", "₹10", false), Some(2), Currency::Inr).unwrap();

        let err = update_cart_item(&cart, "p1".to_string(), 1000).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(get_cart(&cart).lines[0].quantity, 2);
    }

    #[test]
    fn test_update_to_zero_removes_line() {
        let cart = Store::<Cart>::default();
        add_catalog_product(&cart, catalog("p1", "₹10", false), Some(3), Currency::Inr).unwrap();

        let response = update_cart_item(&cart, "p1".to_string(), 0).unwrap();
        assert!(response.lines.is_empty());

        // Removing again is a silent no-op.
        assert!(remove_from_cart(&cart, "p1".to_string()).is_ok());
        assert!(clear_cart(&cart).unwrap().lines.is_empty());
    }
}
