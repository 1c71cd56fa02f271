use std::collections::HashSet;

use medimart_core::cart::{Cart, CartAction};
use medimart_core::money::Money;
use medimart_core::orders::OrderHistory;
use medimart_core::slice::Slice;
use medimart_core::types::{
    Order, OrderStatus, PaymentMethod, PrescriptionStatus, Product, Tracking,
};
use medimart_core::validation::MAX_LINE_QUANTITY;
use proptest::prelude::*;
use proptest::test_runner::Config;

fn product(index: u8, prescription: bool) -> Product {
    Product {
        id: format!("p{index}"),
        name: format!("Product {index}"),
        price: Money::from_paise(100 + i64::from(index) * 37),
        original_price: None,
        image: String::new(),
        prescription,
    }
}

fn cart_action() -> impl Strategy<Value = CartAction> {
    prop_oneof![
        (0_u8..6, any::<bool>(), -2_i64..5).prop_map(|(index, rx, quantity)| CartAction::Add {
            product: product(index, rx && index % 2 == 0),
            quantity,
        }),
        (0_u8..6).prop_map(|index| CartAction::Remove {
            product_id: format!("p{index}"),
        }),
        (0_u8..6, -2_i64..5).prop_map(|(index, quantity)| CartAction::UpdateQuantity {
            product_id: format!("p{index}"),
            quantity,
        }),
        (0_u8..6).prop_map(|index| CartAction::UpdatePrescriptionStatus {
            product_id: format!("p{index}"),
            status: PrescriptionStatus::Uploaded,
            prescription_image: Some(format!("file:///rx{index}.jpg")),
        }),
        (0_u8..6).prop_map(|index| CartAction::ApprovePrescription {
            product_id: format!("p{index}"),
        }),
        Just(CartAction::Clear),
    ]
}

fn order_status() -> impl Strategy<Value = OrderStatus> {
    prop_oneof![
        Just(OrderStatus::Pending),
        Just(OrderStatus::Processing),
        Just(OrderStatus::Shipped),
        Just(OrderStatus::Delivered),
        Just(OrderStatus::Cancelled),
    ]
}

fn order(status: OrderStatus) -> Order {
    Order {
        id: "o1".to_string(),
        order_number: "ORD-240101-000000-000".to_string(),
        date: chrono::DateTime::<chrono::Utc>::UNIX_EPOCH,
        total: Money::from_rupees(38),
        status,
        payment_method: PaymentMethod::Cod,
        delivery_address: "12 MG Road".to_string(),
        items: Vec::new(),
        tracking: Tracking::default(),
    }
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn cart_lines_stay_unique_with_positive_quantities(
        actions in prop::collection::vec(cart_action(), 0..40)
    ) {
        let mut cart = Cart::new();
        for action in actions {
            cart.reduce(action).unwrap();
        }

        let ids: HashSet<&str> = cart.lines().iter().map(|l| l.product.id.as_str()).collect();
        prop_assert_eq!(ids.len(), cart.lines().len());
        let quantities_positive = cart.lines().iter().all(|l| l.quantity >= 1);
        prop_assert!(quantities_positive);
        let rx_status_consistent = cart.lines().iter().all(|l| {
            (l.prescription_status == PrescriptionStatus::NotRequired) != l.product.prescription
        });
        prop_assert!(rx_status_consistent);
    }

    #[test]
    fn cart_total_is_sum_of_line_totals(
        actions in prop::collection::vec(cart_action(), 0..40)
    ) {
        let mut cart = Cart::new();
        for action in actions {
            cart.reduce(action).unwrap();
        }

        let expected: i64 = cart
            .lines()
            .iter()
            .map(|l| l.product.price.minor() * l.quantity)
            .sum();
        prop_assert_eq!(cart.total().minor(), expected);
    }

    #[test]
    fn repeated_adds_accumulate_quantity(
        quantities in prop::collection::vec(1_i64..10, 1..10)
    ) {
        let mut cart = Cart::new();
        for quantity in &quantities {
            cart.add(product(1, false), *quantity).unwrap();
        }

        prop_assert_eq!(cart.lines().len(), 1);
        prop_assert_eq!(cart.lines()[0].quantity, quantities.iter().sum::<i64>());
    }

    #[test]
    fn line_quantity_never_exceeds_cap(
        quantities in prop::collection::vec(1_i64..i64::MAX, 1..6)
    ) {
        let mut cart = Cart::new();
        for quantity in quantities {
            let _ = cart.add(product(1, false), quantity);
        }

        let within_cap = cart.lines().iter().all(|l| l.quantity <= MAX_LINE_QUANTITY);
        prop_assert!(within_cap);
    }

    #[test]
    fn remove_is_idempotent(
        actions in prop::collection::vec(cart_action(), 0..20),
        index in 0_u8..6
    ) {
        let mut cart = Cart::new();
        for action in actions {
            cart.reduce(action).unwrap();
        }

        let id = format!("p{index}");
        cart.remove(&id);
        let once = cart.clone();
        cart.remove(&id);
        prop_assert_eq!(cart, once);
    }

    #[test]
    fn tracking_matches_status_after_any_updates(
        updates in prop::collection::vec(order_status(), 0..12)
    ) {
        let mut history = OrderHistory::new();
        history.add_order(order(OrderStatus::Pending));

        let mut was_cancelled = false;
        for status in updates {
            let _ = history.update_order_status("o1", status);
            let current = history.find("o1").unwrap();
            if was_cancelled {
                prop_assert_eq!(current.status, OrderStatus::Cancelled);
            }
            was_cancelled = current.status == OrderStatus::Cancelled;
            prop_assert!(current.tracking.is_canonical());
            prop_assert_eq!(current.tracking.status, current.status);
        }
    }
}
