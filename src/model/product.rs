//! Products and their stock.
//!
//! [`StockEntry`] is the ledger's state for one product. [`Product`] is the view the
//! catalog serves, and what the ledger publishes after each change.

use super::ProductId;
use serde::{Deserialize, Serialize};

/// A product as clients see it: `{id, name, count}`.
///
/// `count` is a snapshot of the remaining stock and may already be stale when read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub count: u32,
}

/// The ledger's record of one product's stock.
///
/// # Actor Framework
/// Implements [`ActorEntity`](actor_framework::ActorEntity) in
/// [`ledger::entity`](crate::ledger::entity); only the ledger actor mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockEntry {
    pub id: ProductId,
    pub name: String,
    /// Stock at seeding. Remaining never exceeds it.
    pub initial: u32,
    pub remaining: u32,
}

/// Result of a single check-and-decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decrement {
    pub ok: bool,
    pub remaining_after: u32,
}

impl StockEntry {
    pub fn new(id: ProductId, name: impl Into<String>, stock: u32) -> Self {
        Self {
            id,
            name: name.into(),
            initial: stock,
            remaining: stock,
        }
    }

    /// Takes one unit if any remain.
    pub fn try_take(&mut self) -> Decrement {
        if self.remaining == 0 {
            return Decrement {
                ok: false,
                remaining_after: 0,
            };
        }
        self.remaining -= 1;
        Decrement {
            ok: true,
            remaining_after: self.remaining,
        }
    }

    /// Returns one previously taken unit.
    ///
    /// Returns `None`, leaving the count untouched, when the entry is already at its
    /// seeded stock.
    pub fn give_back(&mut self) -> Option<u32> {
        if self.remaining >= self.initial {
            return None;
        }
        self.remaining += 1;
        Some(self.remaining)
    }

    /// Units handed out so far.
    pub fn sold(&self) -> u32 {
        self.initial - self.remaining
    }

    pub fn to_product(&self) -> Product {
        Product {
            id: self.id,
            name: self.name.clone(),
            count: self.remaining,
        }
    }
}

/// Creation parameters for a [`StockEntry`].
#[derive(Debug, Clone)]
pub struct StockCreate {
    pub name: String,
    pub stock: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_take_stops_at_zero() {
        let mut entry = StockEntry::new(ProductId(1), "Lamp", 2);

        assert_eq!(
            entry.try_take(),
            Decrement {
                ok: true,
                remaining_after: 1
            }
        );
        assert!(entry.try_take().ok);

        let exhausted = entry.try_take();
        assert!(!exhausted.ok);
        assert_eq!(exhausted.remaining_after, 0);
        assert_eq!(entry.remaining, 0);
        assert_eq!(entry.sold(), 2);
    }

    #[test]
    fn give_back_is_capped_at_initial_stock() {
        let mut entry = StockEntry::new(ProductId(1), "Lamp", 1);
        assert_eq!(entry.give_back(), None);

        entry.try_take();
        assert_eq!(entry.give_back(), Some(1));
        assert_eq!(entry.give_back(), None);
        assert_eq!(entry.remaining, 1);
    }

    #[test]
    fn product_view_serializes_as_id_name_count() {
        let entry = StockEntry::new(ProductId(4), "Kettle", 10);
        let json = serde_json::to_value(entry.to_product()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 4, "name": "Kettle", "count": 10})
        );
    }
}
