//! ActorEntity implementation for [`StockEntry`].
//!
//! The context is the catalog's [`StockBoard`]: every change to a count is published
//! there before the reply leaves the actor, so catalog reads stay off the ledger queue.

use super::actions::{LedgerAction, LedgerActionResult};
use super::error::LedgerError;
use crate::catalog::StockBoard;
use crate::model::{ProductId, StockCreate, StockEntry};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use tracing::debug;

#[async_trait]
impl ActorEntity for StockEntry {
    type Id = ProductId;
    type Create = StockCreate;
    type Action = LedgerAction;
    type ActionResult = LedgerActionResult;
    type Context = StockBoard;
    type Error = LedgerError;

    fn from_create_params(id: ProductId, params: StockCreate) -> Result<Self, Self::Error> {
        if params.name.trim().is_empty() {
            return Err(LedgerError::Invalid(format!("{id} has an empty name")));
        }
        Ok(StockEntry::new(id, params.name, params.stock))
    }

    async fn on_create(&mut self, board: &StockBoard) -> Result<(), Self::Error> {
        board.publish(self.to_product());
        Ok(())
    }

    /// # Actions
    /// - `TryDecrement`: takes one unit if any remain; `ok == false` when sold out
    /// - `Restore`: gives one unit back, never above the seeded stock
    /// - `Remaining`: current count
    async fn handle_action(
        &mut self,
        action: LedgerAction,
        board: &StockBoard,
    ) -> Result<LedgerActionResult, Self::Error> {
        match action {
            LedgerAction::TryDecrement => {
                let decrement = self.try_take();
                if decrement.ok {
                    board.publish_count(self.id, decrement.remaining_after);
                } else {
                    debug!(product_id = %self.id, "Sold out");
                }
                Ok(LedgerActionResult::TryDecrement(decrement))
            }
            LedgerAction::Restore => {
                let remaining = self.give_back().ok_or_else(|| {
                    LedgerError::Inconsistent(format!(
                        "{} is already at its seeded stock of {}",
                        self.id, self.initial
                    ))
                })?;
                board.publish_count(self.id, remaining);
                Ok(LedgerActionResult::Restore(remaining))
            }
            LedgerAction::Remaining => Ok(LedgerActionResult::Remaining(self.remaining)),
        }
    }
}
