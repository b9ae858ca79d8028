use super::{ProductId, UserId};
use std::fmt::Display;
use std::time::{Instant, SystemTime};

/// The (user, product) pair a purchase is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PurchaseKey {
    pub user: UserId,
    pub product: ProductId,
}

impl PurchaseKey {
    pub fn new(user: UserId, product: ProductId) -> Self {
        Self { user, product }
    }
}

impl Display for PurchaseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.user, self.product)
    }
}

/// Marks that `key.user` was granted one unit of `key.product`.
///
/// At most one exists per pair, and none is removed while the sale runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRecord {
    pub key: PurchaseKey,
    pub granted_at: SystemTime,
}

/// Creation parameters for a [`PurchaseRecord`].
#[derive(Debug, Clone)]
pub struct RecordCreate {
    pub granted_at: SystemTime,
}

/// One request to buy, alive for a single arbitration decision.
#[derive(Debug, Clone, Copy)]
pub struct PurchaseAttempt {
    pub user: UserId,
    pub product: ProductId,
    pub submitted_at: Instant,
}

impl PurchaseAttempt {
    pub fn new(user: UserId, product: ProductId) -> Self {
        Self {
            user,
            product,
            submitted_at: Instant::now(),
        }
    }

    pub fn key(&self) -> PurchaseKey {
        PurchaseKey::new(self.user, self.product)
    }
}
