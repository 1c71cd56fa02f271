//! # Order History Slice
//!
//! Holds placed orders (newest first) together with their tracking view and
//! the list filters of the order-history screen.
//!
//! ## Status Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  update_order_status(id, next)                                         │
//! │       │                                                                 │
//! │       ├── id unknown? ─────────────────► no-op                         │
//! │       │                                                                 │
//! │       ├── next == current? ────────────► no-op                         │
//! │       │                                                                 │
//! │       ├── lifecycle forbids it? ───────► InvalidOrderTransition        │
//! │       │                                  (state untouched)              │
//! │       │                                                                 │
//! │       └── OK ──► status = next, tracking = Tracking::for_status(next)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cancellation goes through the same guard, so it is only reachable from
//! `pending` or `processing` and can never be undone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::slice::Slice;
use crate::types::{Order, OrderStatus, Tracking};
use crate::validation::validate_search_query;

// =============================================================================
// Filters
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    #[ts(as = "String")]
    pub from: DateTime<Utc>,
    #[ts(as = "String")]
    pub to: DateTime<Utc>,
}

/// Filter descriptor of the order-history screen.
///
/// Only `status` narrows [`OrderHistory::filtered`]; `date_range` and
/// `search_query` are carried for the screen's filter chips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    pub status: Option<OrderStatus>,
    pub date_range: Option<DateRange>,
    pub search_query: Option<String>,
}

/// Partial update for [`OrderFilters`]: `Some` fields replace, `None` keep.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilterPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub date_range: Option<DateRange>,
    #[serde(default)]
    pub search_query: Option<String>,
}

impl OrderFilters {
    pub fn merge(&mut self, patch: OrderFilterPatch) {
        if let Some(status) = patch.status {
            self.status = Some(status);
        }
        if let Some(range) = patch.date_range {
            self.date_range = Some(range);
        }
        if let Some(query) = patch.search_query {
            self.search_query = Some(query);
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |status| order.status == status)
    }
}

// =============================================================================
// Order History
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderAction {
    /// Bulk replace with orders fetched from the backend.
    SetOrders(Vec<Order>),
    /// Record a freshly placed order.
    AddOrder(Order),
    UpdateStatus {
        order_id: String,
        status: OrderStatus,
    },
    Cancel {
        order_id: String,
    },
    SetFilters(OrderFilterPatch),
    ClearFilters,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderHistory {
    orders: Vec<Order>,
    filters: OrderFilters,
}

impl OrderHistory {
    pub fn new() -> Self {
        OrderHistory::default()
    }

    /// Replaces every order.
    ///
    /// Tracking is rebuilt from each order's status, which also fills it in
    /// for payloads that arrived without one.
    pub fn set_orders(&mut self, orders: Vec<Order>) {
        self.orders = orders
            .into_iter()
            .map(|mut order| {
                order.tracking = Tracking::for_status(order.status);
                order
            })
            .collect();
    }

    /// Prepends a newly placed order, tracked as freshly pending.
    pub fn add_order(&mut self, mut order: Order) {
        order.status = OrderStatus::Pending;
        order.tracking = Tracking::for_status(OrderStatus::Pending);
        self.orders.insert(0, order);
    }

    /// Moves an order along its lifecycle.
    ///
    /// ## Errors
    /// `CoreError::InvalidOrderTransition` when the lifecycle does not allow
    /// the move. Unknown ids and same-status updates are no-ops.
    pub fn update_order_status(&mut self, order_id: &str, status: OrderStatus) -> CoreResult<()> {
        let Some(order) = self.orders.iter_mut().find(|order| order.id == order_id) else {
            return Ok(());
        };

        if order.status == status {
            return Ok(());
        }

        if !order.status.can_transition_to(status) {
            return Err(CoreError::InvalidOrderTransition {
                order_id: order_id.to_string(),
                from: order.status,
                to: status,
            });
        }

        order.status = status;
        order.tracking = Tracking::for_status(status);
        Ok(())
    }

    /// Cancels a pending or processing order.
    ///
    /// Tracking drops back to "Order Placed" only.
    pub fn cancel_order(&mut self, order_id: &str) -> CoreResult<()> {
        self.update_order_status(order_id, OrderStatus::Cancelled)
    }

    /// Merges `patch` into the current filters.
    ///
    /// The search query is trimmed; an over-long one is rejected and the
    /// filters stay as they were.
    pub fn set_filters(&mut self, mut patch: OrderFilterPatch) -> CoreResult<()> {
        if let Some(query) = patch.search_query.take() {
            patch.search_query = Some(validate_search_query(&query)?);
        }
        self.filters.merge(patch);
        Ok(())
    }

    pub fn clear_filters(&mut self) {
        self.filters = OrderFilters::default();
    }

    // -------------------------------------------------------------------------
    // Selectors
    // -------------------------------------------------------------------------

    /// All orders, newest first.
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn filters(&self) -> &OrderFilters {
        &self.filters
    }

    pub fn find(&self, order_id: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == order_id)
    }

    /// Orders passing the current filters.
    pub fn filtered(&self) -> Vec<&Order> {
        self.orders
            .iter()
            .filter(|order| self.filters.matches(order))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Slice for OrderHistory {
    type Action = OrderAction;

    const NAME: &'static str = "orders";

    fn reduce(&mut self, action: OrderAction) -> CoreResult<()> {
        match action {
            OrderAction::SetOrders(orders) => self.set_orders(orders),
            OrderAction::AddOrder(order) => self.add_order(order),
            OrderAction::UpdateStatus { order_id, status } => {
                return self.update_order_status(&order_id, status)
            }
            OrderAction::Cancel { order_id } => return self.cancel_order(&order_id),
            OrderAction::SetFilters(patch) => return self.set_filters(patch),
            OrderAction::ClearFilters => self.clear_filters(),
        }
        Ok(())
    }
}
