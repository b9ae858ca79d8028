//! The stock board: the catalog's read model of every product.
//!
//! Written only by ledger actors after they change a count, read by everyone else
//! without entering a ledger queue.

use crate::model::{Product, ProductId};
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::trace;

/// Shared, cloneable map of the latest published state of each product.
#[derive(Clone, Default)]
pub struct StockBoard {
    products: Arc<RwLock<BTreeMap<ProductId, Product>>>,
}

impl StockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product.
    pub fn publish(&self, product: Product) {
        trace!(product_id = %product.id, count = product.count, "Publish");
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id, product);
    }

    /// Updates the count of a product already on the board. Unknown ids are ignored.
    pub fn publish_count(&self, id: ProductId, count: u32) {
        trace!(product_id = %id, count, "Publish count");
        if let Some(product) = self
            .products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&id)
        {
            product.count = count;
        }
    }

    /// All products, ordered by id.
    pub fn snapshot(&self) -> Vec<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn lookup(&self, id: ProductId) -> Option<Product> {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.products
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, count: u32) -> Product {
        Product {
            id: ProductId(id),
            name: format!("item {id}"),
            count,
        }
    }

    #[test]
    fn snapshot_is_ordered_by_id() {
        let board = StockBoard::new();
        board.publish(product(3, 1));
        board.publish(product(1, 5));
        board.publish(product(2, 0));

        let ids: Vec<u32> = board.snapshot().iter().map(|p| p.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn publish_count_only_touches_known_products() {
        let board = StockBoard::new();
        board.publish(product(1, 5));

        board.publish_count(ProductId(1), 4);
        board.publish_count(ProductId(9), 4);

        assert_eq!(board.lookup(ProductId(1)).unwrap().count, 4);
        assert!(board.lookup(ProductId(9)).is_none());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn clones_share_the_same_board() {
        let board = StockBoard::new();
        let reader = board.clone();
        assert!(reader.is_empty());

        board.publish(product(1, 2));
        assert_eq!(reader.lookup(ProductId(1)), Some(product(1, 2)));
    }
}
