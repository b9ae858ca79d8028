use crate::model::Outcome;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Outcome counters kept by the arbiter for operators.
#[derive(Debug, Default)]
pub struct ArbiterStats {
    granted: AtomicU64,
    sold_out: AtomicU64,
    duplicate: AtomicU64,
    overloaded: AtomicU64,
    compensations: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ArbiterStatsSnapshot {
    pub granted: u64,
    pub sold_out: u64,
    pub duplicate: u64,
    pub overloaded: u64,
    /// Units returned to the ledger after a lost record insert.
    pub compensations: u64,
}

impl ArbiterStats {
    pub fn record(&self, outcome: Outcome) {
        let counter = match outcome {
            Outcome::Granted => &self.granted,
            Outcome::RejectedSoldOut => &self.sold_out,
            Outcome::RejectedDuplicate => &self.duplicate,
            Outcome::RejectedOverloaded => &self.overloaded,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_compensation(&self) {
        self.compensations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ArbiterStatsSnapshot {
        ArbiterStatsSnapshot {
            granted: self.granted.load(Ordering::Relaxed),
            sold_out: self.sold_out.load(Ordering::Relaxed),
            duplicate: self.duplicate.load(Ordering::Relaxed),
            overloaded: self.overloaded.load(Ordering::Relaxed),
            compensations: self.compensations.load(Ordering::Relaxed),
        }
    }
}
