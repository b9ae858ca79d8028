//! Short-window memory of outcomes per (user, product).
//!
//! A pair is either resolved, holding the outcome of its first admitted attempt, or
//! pending while that attempt is still being arbitrated. Resubmits of a pending pair
//! follow the attempt already running and receive its outcome.

use crate::model::{Outcome, PurchaseKey};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

pub struct DedupWindow {
    window: Duration,
    state: Arc<Mutex<State>>,
}

enum Entry {
    Pending {
        id: u64,
        outcome: watch::Receiver<Option<Outcome>>,
    },
    Resolved {
        outcome: Outcome,
        at: Instant,
    },
}

struct State {
    entries: HashMap<PurchaseKey, Entry>,
    next_id: u64,
    next_purge: Option<Instant>,
}

/// What a submit for a pair should do next.
pub enum Joined {
    /// Resolved inside the window.
    Replay(Outcome),
    /// An attempt for the pair is in flight. Resolves to `None` if it gave up
    /// without an outcome, in which case the caller joins again.
    Follow(watch::Receiver<Option<Outcome>>),
    /// The caller leads the pair and must hand its outcome to [`Pending::resolve`].
    Lead(Pending),
    /// Deduplication is disabled.
    Untracked,
}

/// Leadership over a pair. Dropping it unresolved frees the pair and wakes the
/// followers so one of them can lead instead.
pub struct Pending {
    key: PurchaseKey,
    id: u64,
    state: Arc<Mutex<State>>,
    sender: watch::Sender<Option<Outcome>>,
    resolved: bool,
}

impl DedupWindow {
    /// A zero `window` disables deduplication.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            state: Arc::new(Mutex::new(State {
                entries: HashMap::new(),
                next_id: 0,
                next_purge: Instant::now().checked_add(window),
            })),
        }
    }

    pub fn join(&self, key: PurchaseKey) -> Joined {
        if self.window.is_zero() {
            return Joined::Untracked;
        }
        let now = Instant::now();
        let window = self.window;
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if state.next_purge.is_some_and(|at| now >= at) {
            state.entries.retain(|_, entry| match entry {
                Entry::Pending { .. } => true,
                Entry::Resolved { at, .. } => now.duration_since(*at) < window,
            });
            state.next_purge = now.checked_add(window);
        }

        match state.entries.get(&key) {
            Some(Entry::Resolved { outcome, at }) if now.duration_since(*at) < window => {
                return Joined::Replay(*outcome);
            }
            Some(Entry::Pending { outcome, .. }) => return Joined::Follow(outcome.clone()),
            _ => {}
        }

        let id = state.next_id;
        state.next_id += 1;
        let (sender, outcome) = watch::channel(None);
        state.entries.insert(key, Entry::Pending { id, outcome });
        Joined::Lead(Pending {
            key,
            id,
            state: Arc::clone(&self.state),
            sender,
            resolved: false,
        })
    }

    /// The outcome held for `key`, if it resolved inside the window.
    pub fn recall(&self, key: PurchaseKey) -> Option<Outcome> {
        if self.window.is_zero() {
            return None;
        }
        let state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        match state.entries.get(&key) {
            Some(Entry::Resolved { outcome, at }) if at.elapsed() < self.window => Some(*outcome),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Pending {
    pub fn key(&self) -> PurchaseKey {
        self.key
    }

    /// Publishes `outcome` to every follower. Overloaded outcomes free the pair
    /// instead of being held.
    pub fn resolve(mut self, outcome: Outcome) {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if state.holds(self.key, self.id) {
                if outcome == Outcome::RejectedOverloaded {
                    state.entries.remove(&self.key);
                } else {
                    state.entries.insert(
                        self.key,
                        Entry::Resolved {
                            outcome,
                            at: Instant::now(),
                        },
                    );
                }
            }
        }
        self.sender.send_replace(Some(outcome));
        self.resolved = true;
    }
}

impl Drop for Pending {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.holds(self.key, self.id) {
            state.entries.remove(&self.key);
        }
    }
}

impl State {
    fn holds(&self, key: PurchaseKey, id: u64) -> bool {
        matches!(self.entries.get(&key), Some(Entry::Pending { id: held, .. }) if *held == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, UserId};

    fn key(user: u64) -> PurchaseKey {
        PurchaseKey::new(UserId(user), ProductId(1))
    }

    fn lead(dedup: &DedupWindow, user: u64) -> Pending {
        match dedup.join(key(user)) {
            Joined::Lead(pending) => pending,
            _ => panic!("expected to lead {}", key(user)),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn replays_within_the_window_only() {
        let dedup = DedupWindow::new(Duration::from_secs(2));
        lead(&dedup, 1).resolve(Outcome::Granted);

        tokio::time::advance(Duration::from_millis(1500)).await;
        assert!(matches!(dedup.join(key(1)), Joined::Replay(Outcome::Granted)));

        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(dedup.recall(key(1)), None);
        let again = lead(&dedup, 1);
        assert_eq!(again.key(), key(1));
    }

    #[tokio::test(start_paused = true)]
    async fn followers_receive_the_leaders_outcome() {
        let dedup = DedupWindow::new(Duration::from_secs(2));
        let pending = lead(&dedup, 1);

        let Joined::Follow(mut first) = dedup.join(key(1)) else {
            panic!("expected to follow");
        };
        let Joined::Follow(mut second) = dedup.join(key(1)) else {
            panic!("expected to follow");
        };
        assert_eq!(dedup.recall(key(1)), None);

        pending.resolve(Outcome::Granted);
        assert_eq!(*first.wait_for(Option::is_some).await.unwrap(), Some(Outcome::Granted));
        assert_eq!(*second.wait_for(Option::is_some).await.unwrap(), Some(Outcome::Granted));
        assert_eq!(dedup.recall(key(1)), Some(Outcome::Granted));
    }

    #[tokio::test(start_paused = true)]
    async fn overloaded_frees_the_pair() {
        let dedup = DedupWindow::new(Duration::from_secs(2));
        let pending = lead(&dedup, 1);
        let Joined::Follow(mut follower) = dedup.join(key(1)) else {
            panic!("expected to follow");
        };

        pending.resolve(Outcome::RejectedOverloaded);
        assert_eq!(
            *follower.wait_for(Option::is_some).await.unwrap(),
            Some(Outcome::RejectedOverloaded)
        );
        assert!(dedup.is_empty());
        lead(&dedup, 1).resolve(Outcome::RejectedSoldOut);
        assert_eq!(dedup.recall(key(1)), Some(Outcome::RejectedSoldOut));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_lead_wakes_followers_empty_handed() {
        let dedup = DedupWindow::new(Duration::from_secs(2));
        let pending = lead(&dedup, 1);
        let Joined::Follow(mut follower) = dedup.join(key(1)) else {
            panic!("expected to follow");
        };

        drop(pending);
        assert!(follower.wait_for(Option::is_some).await.is_err());
        assert!(dedup.is_empty());
        lead(&dedup, 1).resolve(Outcome::Granted);
        assert_eq!(dedup.recall(key(1)), Some(Outcome::Granted));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entries_are_purged_on_a_later_join() {
        let dedup = DedupWindow::new(Duration::from_secs(1));
        lead(&dedup, 1).resolve(Outcome::Granted);
        lead(&dedup, 2).resolve(Outcome::RejectedSoldOut);
        let in_flight = lead(&dedup, 3);

        tokio::time::advance(Duration::from_secs(2)).await;
        lead(&dedup, 4).resolve(Outcome::RejectedSoldOut);
        assert_eq!(dedup.len(), 2);
        drop(in_flight);
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn zero_window_disables_tracking() {
        let dedup = DedupWindow::new(Duration::ZERO);
        assert!(matches!(dedup.join(key(1)), Joined::Untracked));
        assert_eq!(dedup.recall(key(1)), None);
        assert!(dedup.is_empty());
    }
}
