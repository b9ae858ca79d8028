//! Read-only product listing and detail.
//!
//! The catalog never talks to the arbiter or the ledger. It serves whatever the
//! ledger last published to the [`StockBoard`], so counts may trail the ledger by
//! the few requests in flight.

pub mod board;

pub use board::StockBoard;

use crate::model::{Product, ProductId};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
}

#[derive(Clone)]
pub struct Catalog {
    board: StockBoard,
}

impl Catalog {
    pub fn new(board: StockBoard) -> Self {
        Self { board }
    }

    /// Every product, ordered by id.
    pub fn list(&self) -> Vec<Product> {
        let products = self.board.snapshot();
        debug!(count = products.len(), "Catalog list");
        products
    }

    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.board.lookup(id).ok_or(CatalogError::NotFound(id))
    }
}
