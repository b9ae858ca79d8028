//! Admission control: a fixed number of attempts in flight, the rest shed at once.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

pub struct Admission {
    permits: Arc<Semaphore>,
    capacity: usize,
    admitted: AtomicU64,
    shed: AtomicU64,
    shed_log_every: u64,
}

impl Admission {
    /// `shed_log_every == 0` turns the periodic shed warning off. Capacity is
    /// capped at [`Semaphore::MAX_PERMITS`].
    pub fn new(capacity: usize, shed_log_every: u64) -> Self {
        let capacity = capacity.min(Semaphore::MAX_PERMITS);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
            admitted: AtomicU64::new(0),
            shed: AtomicU64::new(0),
            shed_log_every,
        }
    }

    /// Takes a slot without waiting. The slot is freed when the permit drops.
    pub fn try_admit(&self) -> Option<OwnedSemaphorePermit> {
        match Arc::clone(&self.permits).try_acquire_owned() {
            Ok(permit) => {
                self.admitted.fetch_add(1, Ordering::Relaxed);
                Some(permit)
            }
            Err(_) => {
                let shed = self.shed.fetch_add(1, Ordering::Relaxed) + 1;
                if self.shed_log_every > 0 && shed % self.shed_log_every == 0 {
                    warn!(shed, capacity = self.capacity, "Admission full; shedding attempts");
                }
                None
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn in_flight(&self) -> usize {
        self.capacity
            .saturating_sub(self.permits.available_permits())
    }

    pub fn admitted(&self) -> u64 {
        self.admitted.load(Ordering::Relaxed)
    }

    pub fn shed(&self) -> u64 {
        self.shed.load(Ordering::Relaxed)
    }
}
