//! # Watch-Later Commands

use medimart_core::types::Product;
use medimart_core::{WatchLater, WatchLaterAction};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::Store;

pub fn get_watch_later(list: &Store<WatchLater>) -> Vec<Product> {
    list.with_state(|l| l.items().to_vec())
}

pub fn is_in_watch_later(list: &Store<WatchLater>, product_id: &str) -> bool {
    list.with_state(|l| l.contains(product_id))
}

/// Saves a product. Saving it twice keeps one entry.
pub fn add_to_watch_later(list: &Store<WatchLater>, product: Product) -> ApiResult<Vec<Product>> {
    debug!(product_id = %product.id, "add_to_watch_later command");
    list.dispatch(WatchLaterAction::Add { product })?;
    Ok(get_watch_later(list))
}

pub fn remove_from_watch_later(
    list: &Store<WatchLater>,
    product_id: String,
) -> ApiResult<Vec<Product>> {
    debug!(product_id = %product_id, "remove_from_watch_later command");
    list.dispatch(WatchLaterAction::Remove { product_id })?;
    Ok(get_watch_later(list))
}

pub fn clear_watch_later(list: &Store<WatchLater>) -> ApiResult<Vec<Product>> {
    debug!("clear_watch_later command");
    list.dispatch(WatchLaterAction::Clear)?;
    Ok(Vec::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medimart_core::Money;

    fn product(id: &str) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            price: Money::from_rupees(250),
            original_price: Some(Money::from_rupees(300)),
            image: String::new(),
            prescription: false,
        }
    }

    #[test]
    fn test_watch_later_commands() {
        let list = Store::<WatchLater>::default();

        add_to_watch_later(&list, product("1")).unwrap();
        let items = add_to_watch_later(&list, product("1")).unwrap();
        assert_eq!(items.len(), 1);
        assert!(is_in_watch_later(&list, "1"));

        add_to_watch_later(&list, product("2")).unwrap();
        let items = remove_from_watch_later(&list, "1".to_string()).unwrap();
        assert_eq!(items, vec![product("2")]);

        assert!(clear_watch_later(&list).unwrap().is_empty());
        assert!(get_watch_later(&list).is_empty());
    }
}
