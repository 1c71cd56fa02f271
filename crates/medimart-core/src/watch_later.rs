//! # Watch-Later Slice
//!
//! A wish-list with set semantics keyed by product id. No quantities.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::slice::Slice;
use crate::types::Product;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchLaterAction {
    Add { product: Product },
    Remove { product_id: String },
    Clear,
}

/// Saved products, in the order they were first saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct WatchLater {
    items: Vec<Product>,
}

impl WatchLater {
    pub fn new() -> Self {
        WatchLater::default()
    }

    pub fn items(&self) -> &[Product] {
        &self.items
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.id == product_id)
    }

    /// Saves `product` unless an entry with the same id already exists.
    pub fn add(&mut self, product: Product) {
        if !self.contains(&product.id) {
            self.items.push(product);
        }
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|item| item.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Slice for WatchLater {
    type Action = WatchLaterAction;

    const NAME: &'static str = "watch_later";

    fn reduce(&mut self, action: WatchLaterAction) -> CoreResult<()> {
        match action {
            WatchLaterAction::Add { product } => self.add(product),
            WatchLaterAction::Remove { product_id } => self.remove(&product_id),
            WatchLaterAction::Clear => self.clear(),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Money::from_rupees(99),
            original_price: None,
            image: String::new(),
            prescription: false,
        }
    }

    #[test]
    fn test_add_twice_keeps_one_entry() {
        let mut list = WatchLater::new();
        list.add(product("1"));
        list.add(product("1"));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut list = WatchLater::new();
        list.reduce(WatchLaterAction::Add { product: product("1") }).unwrap();
        list.reduce(WatchLaterAction::Add { product: product("2") }).unwrap();

        list.reduce(WatchLaterAction::Remove {
            product_id: "1".to_string(),
        })
        .unwrap();
        assert!(!list.contains("1"));
        assert!(list.contains("2"));

        list.reduce(WatchLaterAction::Clear).unwrap();
        assert!(list.is_empty());
    }
}
