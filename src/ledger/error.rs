//! Error types for the stock ledger.

use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Product not found: {0}")]
    NotFound(String),

    /// The product's queue stayed full for longer than the ledger wait.
    /// Nothing was applied.
    #[error("Ledger busy")]
    Busy,

    /// A count would leave its valid range.
    #[error("Stock inconsistency: {0}")]
    Inconsistent(String),

    #[error("Invalid product: {0}")]
    Invalid(String),

    /// The ledger actors are gone (shutdown or crash).
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),
}

impl From<FrameworkError> for LedgerError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::Timeout => LedgerError::Busy,
            FrameworkError::NotFound(id) => LedgerError::NotFound(id),
            FrameworkError::AlreadyExists(id) => {
                LedgerError::Inconsistent(format!("product id {id} assigned twice"))
            }
            FrameworkError::EntityError(_) => match e.entity_error::<LedgerError>() {
                Ok(inner) => inner,
                Err(other) => LedgerError::Unavailable(other.to_string()),
            },
            FrameworkError::ActorClosed | FrameworkError::ActorDropped => {
                LedgerError::Unavailable(e.to_string())
            }
        }
    }
}
