//! In-flight pair claims.
//!
//! A pair is claimed for the whole check-decrement-record sequence, so two attempts
//! for the same (user, product) can never both reach the ledger.

use crate::model::PurchaseKey;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

#[derive(Clone, Default)]
pub struct InFlight {
    pairs: Arc<Mutex<HashSet<PurchaseKey>>>,
}

impl InFlight {
    /// Claims `key`, or returns `None` if another attempt holds it.
    pub fn claim(&self, key: PurchaseKey) -> Option<PairClaim> {
        let inserted = self
            .pairs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key);
        inserted.then(|| PairClaim {
            key,
            pairs: Arc::clone(&self.pairs),
        })
    }

    pub fn len(&self) -> usize {
        self.pairs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Releases its pair when dropped, including when the attempt future is dropped.
pub struct PairClaim {
    key: PurchaseKey,
    pairs: Arc<Mutex<HashSet<PurchaseKey>>>,
}

impl Drop for PairClaim {
    fn drop(&mut self) {
        self.pairs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, UserId};

    #[test]
    fn claim_is_exclusive_until_dropped() {
        let in_flight = InFlight::default();
        let key = PurchaseKey::new(UserId(1), ProductId(1));

        let claim = in_flight.claim(key).expect("first claim");
        assert!(in_flight.claim(key).is_none());
        assert!(in_flight
            .claim(PurchaseKey::new(UserId(2), ProductId(1)))
            .is_some());

        drop(claim);
        assert!(in_flight.is_empty());
        assert!(in_flight.claim(key).is_some());
    }
}
