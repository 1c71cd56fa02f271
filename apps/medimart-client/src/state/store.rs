//! # Observable Store
//!
//! Wraps one [`Slice`] in a `tokio::sync::watch` channel. The channel's
//! internal lock serialises every reduction; screens hold a receiver and
//! re-render when it reports a change.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  command ──► Store::dispatch(action)                                    │
//! │                   │                                                     │
//! │                   ▼  (write lock)                                       │
//! │              slice.reduce(action)                                       │
//! │                   │                                                     │
//! │          Ok ──────┴────── Err                                           │
//! │          │                 │                                            │
//! │   receivers notified   nothing changed, no notification                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Locking
//! Never read a store from inside a [`Store::modify_if`] closure on the same
//! store. Nesting across stores is allowed in one fixed order: orders, then
//! cart (see `commands::checkout`).

use medimart_core::{CoreResult, Slice};
use tokio::sync::watch;
use tracing::{debug, warn};

pub struct Store<S: Slice> {
    tx: watch::Sender<S>,
}

impl<S: Slice> Store<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Store { tx }
    }

    /// Applies `action` and notifies subscribers if it succeeded.
    pub fn dispatch(&self, action: S::Action) -> CoreResult<()> {
        debug!(slice = S::NAME, ?action, "dispatch");

        let mut result = Ok(());
        self.tx.send_if_modified(|state| match state.reduce(action) {
            Ok(()) => true,
            Err(err) => {
                result = Err(err);
                false
            }
        });

        if let Err(ref err) = result {
            warn!(slice = S::NAME, error = %err, "action rejected");
        }
        result
    }

    /// Runs `f` with exclusive access to the state.
    ///
    /// Subscribers are notified only when `f` returns `true`.
    pub fn modify_if<F>(&self, f: F) -> bool
    where
        F: FnOnce(&mut S) -> bool,
    {
        self.tx.send_if_modified(f)
    }

    /// Executes a function with read access to the state.
    pub fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.tx.borrow();
        f(&state)
    }

    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }
}

impl<S: Slice + Default> Default for Store<S> {
    fn default() -> Self {
        Store::new(S::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medimart_core::orders::{OrderAction, OrderHistory};
    use medimart_core::types::{Order, OrderStatus, PaymentMethod, Tracking};
    use medimart_core::{Cart, CartAction, Money, Product};

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Money::from_rupees(49),
            original_price: None,
            image: String::new(),
            prescription: false,
        }
    }

    #[tokio::test]
    async fn test_dispatch_notifies_subscribers() {
        let store: Store<Cart> = Store::default();
        let mut rx = store.subscribe();

        store
            .dispatch(CartAction::Add {
                product: product("p1"),
                quantity: 2,
            })
            .unwrap();

        assert!(rx.has_changed().unwrap());
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().total_quantity(), 2);
    }

    #[tokio::test]
    async fn test_rejected_action_does_not_notify() {
        let store: Store<OrderHistory> = Store::default();
        store
            .dispatch(OrderAction::SetOrders(vec![Order {
                id: "o1".to_string(),
                order_number: "ORD-1".to_string(),
                date: chrono::Utc::now(),
                total: Money::from_rupees(38),
                status: OrderStatus::Delivered,
                payment_method: PaymentMethod::Cod,
                delivery_address: "12 MG Road".to_string(),
                items: Vec::new(),
                tracking: Tracking::default(),
            }]))
            .unwrap();

        let rx = store.subscribe();
        let result = store.dispatch(OrderAction::Cancel {
            order_id: "o1".to_string(),
        });

        assert!(result.is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(
            store.with_state(|orders| orders.find("o1").map(|o| o.status)),
            Some(OrderStatus::Delivered)
        );
    }

    #[test]
    fn test_dispatch_without_subscribers_still_updates() {
        let store: Store<Cart> = Store::default();
        store
            .dispatch(CartAction::Add {
                product: product("p1"),
                quantity: 1,
            })
            .unwrap();
        assert_eq!(store.snapshot().item_count(), 1);
    }
}
