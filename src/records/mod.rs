//! The purchase record book: at most one [`PurchaseRecord`] per (user, product).
//!
//! Insert-if-absent comes from the actor's `Create` handling; a second insert for the
//! same pair fails with [`RecordError::AlreadyRecorded`].

pub mod entity;
pub mod error;

pub use entity::RecordAction;
pub use error::*;

use crate::clients::RecordClient;
use crate::model::PurchaseRecord;
use actor_framework::ResourceActor;
use std::time::Duration;

/// Creates the record book shard actors and their client.
pub fn new(
    shards: usize,
    buffer: usize,
    record_wait: Duration,
) -> (Vec<ResourceActor<PurchaseRecord>>, RecordClient) {
    let (actors, generic_client) = ResourceActor::sharded(shards, buffer);
    (actors, RecordClient::new(generic_client, record_wait))
}
