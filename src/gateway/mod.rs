//! # Request Gateway
//!
//! The entry point for purchase attempts. In order:
//!
//! 1. **Replay**: a pair resolved within the dedup window gets its earlier outcome
//!    back without touching the arbiter. A pair whose attempt is still in flight
//!    waits for that attempt and shares its outcome.
//! 2. **Admission**: at most `capacity` attempts are in flight; the rest are
//!    `rejected-overloaded` immediately.
//! 3. **Arbitration**: runs in its own task holding the admission slot. Dropping the
//!    caller's future does not cancel it, so a committed decrement always gets its
//!    purchase record.

pub mod admission;
pub mod dedup;

pub use admission::Admission;
pub use dedup::{DedupWindow, Joined, Pending};

use crate::arbiter::{ArbiterError, Arbitrate};
use crate::model::{Outcome, ProductId, PurchaseAttempt, PurchaseKey, UserId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, instrument};

pub struct Gateway<A: Arbitrate> {
    arbiter: Arc<A>,
    admission: Arc<Admission>,
    dedup: Arc<DedupWindow>,
    replayed: Arc<AtomicU64>,
}

impl<A: Arbitrate> Clone for Gateway<A> {
    fn clone(&self) -> Self {
        Self {
            arbiter: Arc::clone(&self.arbiter),
            admission: Arc::clone(&self.admission),
            dedup: Arc::clone(&self.dedup),
            replayed: Arc::clone(&self.replayed),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GatewayStatsSnapshot {
    pub capacity: usize,
    pub in_flight: usize,
    pub admitted: u64,
    pub shed: u64,
    pub replayed: u64,
}

impl<A: Arbitrate> Gateway<A> {
    pub fn new(arbiter: A, capacity: usize, dedup_window: Duration, shed_log_every: u64) -> Self {
        Self {
            arbiter: Arc::new(arbiter),
            admission: Arc::new(Admission::new(capacity, shed_log_every)),
            dedup: Arc::new(DedupWindow::new(dedup_window)),
            replayed: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn arbiter(&self) -> &A {
        &self.arbiter
    }

    /// Submits one purchase attempt and waits for its outcome.
    ///
    /// # Errors
    /// Only what the arbiter cannot express as an [`Outcome`]: unknown product, or
    /// the sale shutting down.
    #[instrument(skip(self))]
    pub async fn submit(&self, user: UserId, product: ProductId) -> Result<Outcome, ArbiterError> {
        let key = PurchaseKey::new(user, product);
        let pending = loop {
            match self.dedup.join(key) {
                Joined::Replay(outcome) => {
                    self.replayed.fetch_add(1, Ordering::Relaxed);
                    debug!(%key, %outcome, "Replaying recent outcome");
                    return Ok(outcome);
                }
                Joined::Follow(mut leader) => {
                    let shared = leader.wait_for(Option::is_some).await.ok().and_then(|o| *o);
                    if let Some(outcome) = shared {
                        self.replayed.fetch_add(1, Ordering::Relaxed);
                        debug!(%key, %outcome, "Shared outcome of in-flight attempt");
                        return Ok(outcome);
                    }
                    debug!(%key, "In-flight attempt ended without an outcome, rejoining");
                }
                Joined::Lead(pending) => break Some(pending),
                Joined::Untracked => break None,
            }
        };

        let Some(permit) = self.admission.try_admit() else {
            if let Some(pending) = pending {
                pending.resolve(Outcome::RejectedOverloaded);
            }
            return Ok(Outcome::RejectedOverloaded);
        };

        let arbiter = Arc::clone(&self.arbiter);
        let attempt = PurchaseAttempt::new(user, product);
        let task = tokio::spawn(async move {
            let _permit = permit;
            let result = arbiter.arbitrate(attempt).await;
            // An unresolved lead is dropped here and its followers rejoin.
            if let (Some(pending), Ok(outcome)) = (pending, &result) {
                pending.resolve(*outcome);
            }
            result
        });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                error!(%key, error = %e, "Arbitration task failed");
                Err(ArbiterError::Unavailable(e.to_string()))
            }
        }
    }

    pub fn stats(&self) -> GatewayStatsSnapshot {
        GatewayStatsSnapshot {
            capacity: self.admission.capacity(),
            in_flight: self.admission.in_flight(),
            admitted: self.admission.admitted(),
            shed: self.admission.shed(),
            replayed: self.replayed.load(Ordering::Relaxed),
        }
    }
}
