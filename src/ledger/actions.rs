//! Custom actions for the stock ledger.
//!
//! Handled by [`StockEntry::handle_action`](crate::model::StockEntry#impl-ActorEntity-for-StockEntry)
//! inside the shard actor that owns the product.

use crate::model::Decrement;

/// Operations on one product's stock.
#[derive(Debug, Clone)]
pub enum LedgerAction {
    /// Takes one unit if `remaining > 0`. Check and decrement happen in the same
    /// message, so concurrent callers can never take more than what remains.
    TryDecrement,
    /// Returns one unit taken by an attempt that then lost its purchase record.
    ///
    /// # Errors
    /// Fails with [`LedgerError::Inconsistent`](super::LedgerError::Inconsistent) when
    /// the product is already back at its seeded stock.
    Restore,
    /// Reads the remaining count without changing it.
    Remaining,
}

/// Results from LedgerActions - variants match 1:1 with LedgerAction
#[derive(Debug, Clone)]
pub enum LedgerActionResult {
    TryDecrement(Decrement),
    /// Remaining count after the restore.
    Restore(u32),
    Remaining(u32),
}
