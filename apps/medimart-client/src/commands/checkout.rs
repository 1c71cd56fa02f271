//! # Checkout Commands
//!
//! Turns the cart into a committed order.
//!
//! ## Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  read auth (saved address fallback)           no lock held afterwards   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock orders ──► lock cart                                              │
//! │       │             │                                                   │
//! │       │             ├── validate() fails ──► Blocked(reason), no change │
//! │       │             │                                                   │
//! │       │             └── assemble_order()                                │
//! │       │                 orders.add_order(order)                         │
//! │       │                 cart.clear()                                    │
//! │       ▼                                                                 │
//! │  unlock both ──► subscribers see the order and the empty cart together  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use medimart_core::checkout::{self, CheckoutBlock, CheckoutSummary};
use medimart_core::types::{Order, PaymentMethod};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    /// Falls back to the signed-in user's saved address when blank.
    #[serde(default)]
    pub delivery_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Placed {
        order: Order,
        summary: CheckoutSummary,
    },
    /// Nothing was committed; the screen shows the reason.
    Blocked { reason: CheckoutBlock },
}

/// The bill for the current cart.
pub fn checkout_summary(state: &AppState) -> CheckoutSummary {
    debug!("checkout_summary command");
    state
        .cart
        .with_state(|cart| CheckoutSummary::for_cart(cart, &state.pricing))
}

/// Places an order from the current cart.
///
/// Validation, the new order and the cleared cart all happen under the
/// orders and cart locks, so no reader sees one without the other.
pub fn place_order(state: &AppState, request: CheckoutRequest) -> ApiResult<CheckoutOutcome> {
    debug!(payment_method = ?request.payment_method, "place_order command");

    let address = request
        .delivery_address
        .filter(|address| !address.trim().is_empty())
        .or_else(|| {
            state
                .auth
                .with_state(|session| session.saved_address().map(str::to_string))
        });

    let order_id = Uuid::now_v7().to_string();
    let placed_at = Utc::now();
    let mut outcome = None;

    state.orders.modify_if(|orders| {
        state.cart.modify_if(|cart| {
            match checkout::validate(cart, request.payment_method, address.as_deref()) {
                Err(reason) => {
                    outcome = Some(CheckoutOutcome::Blocked { reason });
                    false
                }
                Ok((payment_method, delivery_address)) => {
                    let summary = CheckoutSummary::for_cart(cart, &state.pricing);
                    let order = checkout::assemble_order(
                        cart,
                        &summary,
                        payment_method,
                        delivery_address,
                        order_id,
                        placed_at,
                    );
                    orders.add_order(order.clone());
                    cart.clear();
                    outcome = Some(CheckoutOutcome::Placed { order, summary });
                    true
                }
            }
        })
    });

    match &outcome {
        Some(CheckoutOutcome::Placed { order, summary }) => info!(
            order_id = %order.id,
            order_number = %order.order_number,
            items = order.items.len(),
            total = %summary.final_total,
            "Order placed"
        ),
        Some(CheckoutOutcome::Blocked { reason }) => {
            debug!(reason = %reason, "Checkout blocked")
        }
        None => {}
    }

    outcome.ok_or_else(|| ApiError::internal("Checkout did not run"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, get_cart, update_prescription_status};
    use medimart_core::auth::{AuthAction, Credentials, User};
    use medimart_core::types::{OrderStatus, PrescriptionStatus, Product};
    use medimart_core::Money;

    fn product(id: &str, name: &str, rupees: i64, prescription: bool) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Money::from_rupees(rupees),
            original_price: None,
            image: String::new(),
            prescription,
        }
    }

    fn request(method: Option<PaymentMethod>, address: Option<&str>) -> CheckoutRequest {
        CheckoutRequest {
            payment_method: method,
            delivery_address: address.map(str::to_string),
        }
    }

    fn sign_in_with_address(state: &AppState, address: &str) {
        state
            .auth
            .dispatch(AuthAction::LoggedIn(Credentials {
                user: User {
                    id: "u1".to_string(),
                    name: "Asha".to_string(),
                    email: None,
                    phone: None,
                    address: Some(address.to_string()),
                },
                token: "tok".to_string(),
                company: None,
            }))
            .unwrap();
    }

    #[test]
    fn test_paracetamol_checkout() {
        let state = AppState::default();
        sign_in_with_address(&state, "12 MG Road, Pune");
        add_to_cart(&state.cart, product("p1", "Paracetamol", 49, false), Some(2)).unwrap();

        let outcome = place_order(&state, request(Some(PaymentMethod::Cod), None)).unwrap();
        let CheckoutOutcome::Placed { order, summary } = outcome else {
            panic!("expected a placed order");
        };

        assert_eq!(summary.final_total, Money::from_rupees(38));
        assert_eq!(order.total, Money::from_rupees(38));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.delivery_address, "12 MG Road, Pune");
        let flags: Vec<bool> = order.tracking.steps.iter().map(|s| s.completed).collect();
        assert_eq!(flags, vec![true, false, false, false]);

        assert!(get_cart(&state.cart).lines.is_empty());
        let history = state.orders.snapshot();
        assert_eq!(history.len(), 1);
        assert_eq!(history.orders()[0].id, order.id);
    }

    #[test]
    fn test_prescription_gating() {
        let state = AppState::default();
        add_to_cart(&state.cart, product("rx1", "Amoxicillin", 120, true), None).unwrap();

        let outcome = place_order(
            &state,
            request(Some(PaymentMethod::Upi), Some("12 MG Road")),
        )
        .unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Blocked {
                reason: CheckoutBlock::PrescriptionRequired {
                    product_id: "rx1".to_string(),
                    product_name: "Amoxicillin".to_string(),
                }
            }
        );
        assert_eq!(get_cart(&state.cart).lines.len(), 1);
        assert!(state.orders.snapshot().is_empty());

        update_prescription_status(
            &state.cart,
            "rx1".to_string(),
            PrescriptionStatus::Uploaded,
            Some("file:///rx1.jpg".to_string()),
        )
        .unwrap();

        let outcome = place_order(
            &state,
            request(Some(PaymentMethod::Upi), Some("12 MG Road")),
        )
        .unwrap();
        assert!(matches!(outcome, CheckoutOutcome::Placed { .. }));
    }

    #[test]
    fn test_missing_payment_method_blocks() {
        let state = AppState::default();
        add_to_cart(&state.cart, product("p1", "Paracetamol", 49, false), None).unwrap();

        let outcome = place_order(&state, request(None, Some("12 MG Road"))).unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Blocked {
                reason: CheckoutBlock::PaymentMethodRequired
            }
        );
    }

    #[test]
    fn test_missing_address_blocks_guest() {
        let state = AppState::default();
        add_to_cart(&state.cart, product("p1", "Paracetamol", 49, false), None).unwrap();

        let outcome = place_order(&state, request(Some(PaymentMethod::Card), Some("  "))).unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Blocked {
                reason: CheckoutBlock::AddressRequired
            }
        );
    }

    #[test]
    fn test_empty_cart_blocks() {
        let state = AppState::default();
        let outcome = place_order(&state, request(Some(PaymentMethod::Cod), Some("x"))).unwrap();
        assert_eq!(
            outcome,
            CheckoutOutcome::Blocked {
                reason: CheckoutBlock::EmptyCart
            }
        );
    }

    #[test]
    fn test_usd_store_prices_in_usd() {
        let mut config = crate::config::ClientConfig::default();
        config.checkout.currency = medimart_core::Currency::Usd;
        let state = AppState::from_config(&config);

        let summary = checkout_summary(&state);
        assert_eq!(summary.item_total, Money::zero(medimart_core::Currency::Usd));
        assert_eq!(summary.final_total.currency(), medimart_core::Currency::Usd);

        let err = add_to_cart(&state.cart, product("p1", "Paracetamol", 49, false), None)
            .unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::ValidationError);

        let mut vitamins = product("p2", "Vitamin C", 0, false);
        vitamins.price = Money::from_minor(1250, medimart_core::Currency::Usd);
        add_to_cart(&state.cart, vitamins, Some(2)).unwrap();
        assert_eq!(
            checkout_summary(&state).item_total,
            Money::from_minor(2500, medimart_core::Currency::Usd)
        );
    }

    #[test]
    fn test_summary_floors_at_zero() {
        let state = AppState::default();
        add_to_cart(&state.cart, product("p1", "Bandage", 20, false), None).unwrap();
        assert!(checkout_summary(&state).final_total.is_zero());
    }

    #[test]
    fn test_orders_are_newest_first() {
        let state = AppState::default();
        for id in ["p1", "p2"] {
            add_to_cart(&state.cart, product(id, "Vitamin C", 300, false), None).unwrap();
            place_order(&state, request(Some(PaymentMethod::Upi), Some("12 MG Road"))).unwrap();
        }

        let history = state.orders.snapshot();
        assert_eq!(history.len(), 2);
        assert_eq!(history.orders()[0].items[0].id, "p2");
        assert_eq!(history.orders()[1].items[0].id, "p1");
    }
}
