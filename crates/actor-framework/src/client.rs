//! # Generic Client
//!
//! The typed client for a set of shard actors. It hashes each id to the shard that
//! owns it and exchanges a request/response pair over that shard's channel.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::error::SendTimeoutError;
use tokio::sync::{mpsc, oneshot};

/// A type-safe client for interacting with one or more `ResourceActor` shards.
///
/// * **Cloneable**: holds the shard senders behind an `Arc`.
/// * **Bounded enqueue**: with [`with_send_timeout`](Self::with_send_timeout), waiting
///   for room in a full shard queue fails with [`FrameworkError::Timeout`]. The timeout
///   covers only the enqueue. Once a request is accepted its reply is always awaited,
///   because the actor may already have applied it.
pub struct ResourceClient<T: ActorEntity> {
    shards: Arc<[mpsc::Sender<ResourceRequest<T>>]>,
    send_timeout: Option<Duration>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
            send_timeout: self.send_timeout,
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    /// Wraps a single shard sender.
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self::from_senders(vec![sender])
    }

    /// Wraps the senders of a shard set, in shard order.
    pub fn from_senders(senders: Vec<mpsc::Sender<ResourceRequest<T>>>) -> Self {
        assert!(!senders.is_empty(), "a resource client needs at least one shard");
        Self {
            shards: senders.into(),
            send_timeout: None,
        }
    }

    /// Returns a copy whose enqueue waits are bounded by `limit`.
    pub fn with_send_timeout(&self, limit: Duration) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
            send_timeout: Some(limit),
        }
    }

    /// Returns a copy that waits for queue room as long as it takes.
    pub fn without_send_timeout(&self) -> Self {
        Self {
            shards: Arc::clone(&self.shards),
            send_timeout: None,
        }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    /// Index of the shard owning `id`.
    pub fn shard_for(&self, id: &T::Id) -> usize {
        let mut hasher = DefaultHasher::new();
        id.hash(&mut hasher);
        (hasher.finish() % self.shards.len() as u64) as usize
    }

    async fn enqueue(&self, shard: usize, msg: ResourceRequest<T>) -> Result<(), FrameworkError> {
        let sender = &self.shards[shard];
        match self.send_timeout {
            Some(limit) => sender.send_timeout(msg, limit).await.map_err(|e| match e {
                SendTimeoutError::Timeout(_) => FrameworkError::Timeout,
                SendTimeoutError::Closed(_) => FrameworkError::ActorClosed,
            }),
            None => sender
                .send(msg)
                .await
                .map_err(|_| FrameworkError::ActorClosed),
        }
    }

    pub async fn create(&self, id: T::Id, params: T::Create) -> Result<T::Id, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let shard = self.shard_for(&id);
        self.enqueue(
            shard,
            ResourceRequest::Create {
                id,
                params,
                respond_to,
            },
        )
        .await?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let shard = self.shard_for(&id);
        self.enqueue(shard, ResourceRequest::Get { id, respond_to })
            .await?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    /// Collects every entity from every shard. Each shard answers with its own
    /// point-in-time snapshot; the result is not ordered.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        let mut items = Vec::new();
        for shard in 0..self.shards.len() {
            let (respond_to, response) = oneshot::channel();
            self.enqueue(shard, ResourceRequest::List { respond_to })
                .await?;
            items.extend(response.await.map_err(|_| FrameworkError::ActorDropped)??);
        }
        Ok(items)
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let shard = self.shard_for(&id);
        self.enqueue(
            shard,
            ResourceRequest::Action {
                id,
                action,
                respond_to,
            },
        )
        .await?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
