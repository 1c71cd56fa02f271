//! # Order History Commands
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  place_order ──► pending ──► processing ──► shipped ──► delivered       │
//! │                     │             │                                     │
//! │                     └──── cancel_order ────► cancelled                  │
//! │                                                                         │
//! │  Any other move is rejected with BUSINESS_LOGIC and changes nothing.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use medimart_core::orders::OrderFilterPatch;
use medimart_core::types::{Order, OrderStatus};
use medimart_core::{OrderAction, OrderFilters, OrderHistory};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::state::Store;

/// Orders passing the current filters, newest first.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
    pub filters: OrderFilters,
    /// Size of the unfiltered history.
    pub total_count: usize,
}

impl From<&OrderHistory> for OrdersResponse {
    fn from(history: &OrderHistory) -> Self {
        OrdersResponse {
            orders: history.filtered().into_iter().cloned().collect(),
            filters: history.filters().clone(),
            total_count: history.len(),
        }
    }
}

fn apply(orders: &Store<OrderHistory>, action: OrderAction) -> ApiResult<OrdersResponse> {
    orders.dispatch(action)?;
    Ok(orders.with_state(|h| OrdersResponse::from(h)))
}

pub fn get_orders(orders: &Store<OrderHistory>) -> OrdersResponse {
    debug!("get_orders command");
    orders.with_state(|h| OrdersResponse::from(h))
}

pub fn get_order(orders: &Store<OrderHistory>, order_id: &str) -> ApiResult<Order> {
    debug!(order_id = %order_id, "get_order command");
    orders
        .with_state(|history| history.find(order_id).cloned())
        .ok_or_else(|| ApiError::not_found("Order", order_id))
}

/// Replaces the history with orders fetched from the backend.
pub fn set_orders(orders: &Store<OrderHistory>, fetched: Vec<Order>) -> ApiResult<OrdersResponse> {
    debug!(count = fetched.len(), "set_orders command");
    apply(orders, OrderAction::SetOrders(fetched))
}

/// Moves an order along its lifecycle. Unknown ids change nothing.
pub fn update_order_status(
    orders: &Store<OrderHistory>,
    order_id: String,
    status: OrderStatus,
) -> ApiResult<OrdersResponse> {
    debug!(order_id = %order_id, status = %status, "update_order_status command");
    apply(orders, OrderAction::UpdateStatus { order_id, status })
}

/// Cancels a pending or processing order.
pub fn cancel_order(orders: &Store<OrderHistory>, order_id: String) -> ApiResult<OrdersResponse> {
    debug!(order_id = %order_id, "cancel_order command");
    let response = apply(
        orders,
        OrderAction::Cancel {
            order_id: order_id.clone(),
        },
    )?;
    info!(order_id = %order_id, "Order cancelled");
    Ok(response)
}

pub fn set_filters(
    orders: &Store<OrderHistory>,
    patch: OrderFilterPatch,
) -> ApiResult<OrdersResponse> {
    debug!(?patch, "set_filters command");
    apply(orders, OrderAction::SetFilters(patch))
}

pub fn clear_filters(orders: &Store<OrderHistory>) -> ApiResult<OrdersResponse> {
    debug!("clear_filters command");
    apply(orders, OrderAction::ClearFilters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use medimart_core::types::{PaymentMethod, Tracking};
    use medimart_core::Money;

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            order_number: format!("ORD-{}", id),
            date: chrono::Utc::now(),
            total: Money::from_rupees(120),
            status,
            payment_method: PaymentMethod::Card,
            delivery_address: "12 MG Road, Pune".to_string(),
            items: Vec::new(),
            tracking: Tracking::default(),
        }
    }

    fn seeded() -> Store<OrderHistory> {
        let orders = Store::<OrderHistory>::default();
        set_orders(
            &orders,
            vec![
                order("a", OrderStatus::Processing),
                order("b", OrderStatus::Shipped),
                order("c", OrderStatus::Delivered),
            ],
        )
        .unwrap();
        orders
    }

    #[test]
    fn test_cancel_processing_order() {
        let orders = seeded();
        cancel_order(&orders, "a".to_string()).unwrap();

        let order = get_order(&orders, "a").unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert_eq!(order.tracking.completed_steps(), 1);
    }

    #[test]
    fn test_cancel_shipped_order_is_business_error() {
        let orders = seeded();
        let err = cancel_order(&orders, "b".to_string()).unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert_eq!(get_order(&orders, "b").unwrap().status, OrderStatus::Shipped);
    }

    #[test]
    fn test_deliver_shipped_order() {
        let orders = seeded();
        update_order_status(&orders, "b".to_string(), OrderStatus::Delivered).unwrap();
        assert_eq!(get_order(&orders, "b").unwrap().tracking.completed_steps(), 4);
    }

    #[test]
    fn test_get_missing_order() {
        let orders = seeded();
        assert_eq!(get_order(&orders, "zzz").unwrap_err().code, ErrorCode::NotFound);
        // Updating it is a silent no-op.
        assert!(update_order_status(&orders, "zzz".to_string(), OrderStatus::Shipped).is_ok());
    }

    #[test]
    fn test_filtered_listing() {
        let orders = seeded();
        let response = set_filters(
            &orders,
            OrderFilterPatch {
                status: Some(OrderStatus::Delivered),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(response.total_count, 3);
        assert_eq!(response.orders.len(), 1);
        assert_eq!(response.orders[0].id, "c");

        assert_eq!(clear_filters(&orders).unwrap().orders.len(), 3);
    }
}
