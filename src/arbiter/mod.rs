//! # Purchase Arbiter
//!
//! Decides each purchase attempt against the ledger and the record book:
//!
//! 1. Claim the (user, product) pair. An attempt for a pair already in flight, or
//!    already recorded, is a duplicate and never reaches the ledger.
//! 2. `TryDecrement` the product. `ok == false` means sold out.
//! 3. Record the purchase (insert-if-absent). If the insert loses a race the unit is
//!    restored and the attempt is a duplicate.
//!
//! Waiting too long for the record book or the ledger before the decrement commits
//! resolves as overloaded. After the decrement only compensation can undo it, so
//! callers that must not abandon a committed unit run attempts in their own task
//! (see [`Gateway`](crate::gateway::Gateway)).

mod claim;
pub mod error;
pub mod stats;

pub use claim::{InFlight, PairClaim};
pub use error::ArbiterError;
pub use stats::{ArbiterStats, ArbiterStatsSnapshot};

use crate::clients::{LedgerClient, RecordClient};
use crate::ledger::LedgerError;
use crate::model::{Outcome, ProductId, PurchaseAttempt, PurchaseKey, UserId};
use crate::records::RecordError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, error, info, instrument};

/// Anything that can decide a purchase attempt.
#[async_trait]
pub trait Arbitrate: Send + Sync + 'static {
    async fn arbitrate(&self, attempt: PurchaseAttempt) -> Result<Outcome, ArbiterError>;
}

#[derive(Clone)]
pub struct Arbiter {
    ledger: LedgerClient,
    records: RecordClient,
    in_flight: InFlight,
    stats: Arc<ArbiterStats>,
}

impl Arbiter {
    pub fn new(ledger: LedgerClient, records: RecordClient) -> Self {
        Self {
            ledger,
            records,
            in_flight: InFlight::default(),
            stats: Arc::new(ArbiterStats::default()),
        }
    }

    /// Decides one attempt by `user` for one unit of `product`.
    pub async fn attempt(&self, user: UserId, product: ProductId) -> Result<Outcome, ArbiterError> {
        self.arbitrate(PurchaseAttempt::new(user, product)).await
    }

    pub fn stats(&self) -> ArbiterStatsSnapshot {
        self.stats.snapshot()
    }

    /// Pairs currently between claim and decision.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    async fn decide(&self, attempt: &PurchaseAttempt) -> Result<Outcome, ArbiterError> {
        let key = attempt.key();
        let Some(_claim) = self.in_flight.claim(key) else {
            debug!(%key, "Pair already in flight");
            return Ok(Outcome::RejectedDuplicate);
        };

        match self.records.contains(key).await {
            Ok(true) => return Ok(Outcome::RejectedDuplicate),
            Ok(false) => {}
            Err(RecordError::Busy) => return Ok(Outcome::RejectedOverloaded),
            Err(e) => return Err(ArbiterError::Unavailable(e.to_string())),
        }

        let decrement = match self.ledger.try_decrement(attempt.product).await {
            Ok(decrement) => decrement,
            Err(LedgerError::NotFound(_)) => return Err(ArbiterError::NotFound(attempt.product)),
            Err(LedgerError::Busy) => return Ok(Outcome::RejectedOverloaded),
            Err(e) => return Err(ArbiterError::Unavailable(e.to_string())),
        };
        if !decrement.ok {
            return Ok(Outcome::RejectedSoldOut);
        }

        match self.records.insert(key, SystemTime::now()).await {
            Ok(()) => {
                info!(%key, remaining = decrement.remaining_after, "Granted");
                Ok(Outcome::Granted)
            }
            Err(RecordError::AlreadyRecorded(_)) => {
                error!(%key, "Purchase record lost a race after the unit was taken; restoring it");
                self.compensate(key).await?;
                Ok(Outcome::RejectedDuplicate)
            }
            Err(e) => {
                error!(%key, error = %e, "Purchase record could not be written; restoring the unit");
                self.compensate(key).await?;
                Err(ArbiterError::Unavailable(e.to_string()))
            }
        }
    }

    async fn compensate(&self, key: PurchaseKey) -> Result<(), ArbiterError> {
        self.stats.record_compensation();
        match self.ledger.restore(key.product).await {
            Ok(remaining) => {
                debug!(%key, remaining, "Unit restored");
                Ok(())
            }
            Err(e) => {
                error!(%key, error = %e, "Restore failed");
                Err(ArbiterError::Inconsistent(e.to_string()))
            }
        }
    }
}

#[async_trait]
impl Arbitrate for Arbiter {
    #[instrument(skip(self, attempt), fields(user = %attempt.user, product = %attempt.product))]
    async fn arbitrate(&self, attempt: PurchaseAttempt) -> Result<Outcome, ArbiterError> {
        let result = self.decide(&attempt).await;
        if let Ok(outcome) = result {
            self.stats.record(outcome);
            debug!(
                %outcome,
                elapsed_us = attempt.submitted_at.elapsed().as_micros() as u64,
                "Decided"
            );
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StockBoard;
    use std::time::Duration;

    async fn arbiter_with(stock: u32) -> (Arbiter, ProductId) {
        let wait = Duration::from_millis(250);
        let (ledger_actors, ledger) = crate::ledger::new(2, 64, wait);
        let (record_actors, records) = crate::records::new(2, 64, wait);
        let board = StockBoard::new();
        for actor in ledger_actors {
            tokio::spawn(actor.run(board.clone()));
        }
        for actor in record_actors {
            tokio::spawn(actor.run(()));
        }
        let product = ledger.register("Gig ticket", stock).await.unwrap();
        (Arbiter::new(ledger, records), product)
    }

    #[tokio::test]
    async fn same_user_twice_is_granted_then_duplicate() {
        let (arbiter, product) = arbiter_with(5).await;

        assert_eq!(arbiter.attempt(UserId(1), product).await, Ok(Outcome::Granted));
        assert_eq!(
            arbiter.attempt(UserId(1), product).await,
            Ok(Outcome::RejectedDuplicate)
        );

        let stats = arbiter.stats();
        assert_eq!(stats.granted, 1);
        assert_eq!(stats.duplicate, 1);
        assert_eq!(arbiter.in_flight(), 0);
    }

    #[tokio::test]
    async fn last_unit_goes_to_one_user() {
        let (arbiter, product) = arbiter_with(1).await;

        assert_eq!(arbiter.attempt(UserId(1), product).await, Ok(Outcome::Granted));
        assert_eq!(
            arbiter.attempt(UserId(2), product).await,
            Ok(Outcome::RejectedSoldOut)
        );
        assert_eq!(arbiter.stats().sold_out, 1);
    }

    #[tokio::test]
    async fn unknown_product_is_not_found() {
        let (arbiter, _) = arbiter_with(1).await;

        assert_eq!(
            arbiter.attempt(UserId(1), ProductId(99)).await,
            Err(ArbiterError::NotFound(ProductId(99)))
        );
    }
}
