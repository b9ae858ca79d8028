//! The inventory ledger: the only writer of remaining stock.
//!
//! Products are spread over shard actors by id. The actor owning a product is its
//! single point of serialization, which is what makes `TryDecrement` atomic.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::LedgerClient;
use crate::model::StockEntry;
use actor_framework::ResourceActor;
use std::time::Duration;

/// Creates the ledger shard actors and their client.
///
/// Every request except `restore` and `register` waits at most `ledger_wait` for
/// room in the owning shard's queue before failing with [`LedgerError::Busy`].
pub fn new(
    shards: usize,
    buffer: usize,
    ledger_wait: Duration,
) -> (Vec<ResourceActor<StockEntry>>, LedgerClient) {
    let (actors, generic_client) = ResourceActor::sharded(shards, buffer);
    (actors, LedgerClient::new(generic_client, ledger_wait))
}
