use crate::model::ProductId;
use thiserror::Error;

/// Failures that are not an [`Outcome`](crate::model::Outcome).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ArbiterError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),

    /// The ledger or record book is shutting down or gone.
    #[error("Sale unavailable: {0}")]
    Unavailable(String),

    /// A taken unit could not be given back.
    #[error("Internal inconsistency: {0}")]
    Inconsistent(String),
}
