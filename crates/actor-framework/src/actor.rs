//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the server half of the framework. One
//! actor owns one shard of entities and processes its messages sequentially, which
//! makes it the serialization point for every entity it owns.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages one shard of entities.
///
/// # Concurrency Model
/// The actor exclusively owns its `store` and handles one message at a time, so a
/// check followed by a mutation inside [`ActorEntity::handle_action`] cannot
/// interleave with any other request for an entity of the same shard. No `Mutex`
/// guards the store.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` (one shard) or `ResourceActor::sharded()`.
/// 2. **Wire**: pass the entity context into `actor.run(context)`.
/// 3. **Run**: spawn every returned actor on the runtime.
///
/// ```rust
/// use actor_framework::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Seat { id: u32, taken: bool }
/// #[derive(Debug)] struct SeatCreate;
/// #[derive(Debug)] enum SeatAction { Take }
/// #[derive(Debug, thiserror::Error)] #[error("seat error")] struct SeatError;
///
/// #[async_trait]
/// impl ActorEntity for Seat {
///     type Id = u32;
///     type Create = SeatCreate;
///     type Action = SeatAction;
///     type ActionResult = bool;
///     type Context = ();
///     type Error = SeatError;
///
///     fn from_create_params(id: u32, _: SeatCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, taken: false })
///     }
///     async fn handle_action(&mut self, _: SeatAction, _: &()) -> Result<bool, Self::Error> {
///         Ok(!std::mem::replace(&mut self.taken, true))
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actors, client) = ResourceActor::<Seat>::sharded(2, 16);
///     for actor in actors {
///         tokio::spawn(actor.run(()));
///     }
///     client.create(7, SeatCreate).await.unwrap();
///     assert!(client.perform_action(7, SeatAction::Take).await.unwrap());
///     assert!(!client.perform_action(7, SeatAction::Take).await.unwrap());
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    shard: usize,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a single-shard actor and the client addressing it.
    ///
    /// `buffer_size` is the capacity of the MPSC channel. When the channel is full,
    /// senders wait (or time out, see [`ResourceClient::with_send_timeout`]).
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            shard: 0,
        };
        (actor, ResourceClient::new(sender))
    }

    /// Creates `shards` actors and one client that routes each id to its owner.
    ///
    /// Entities on different shards are processed in parallel; entities on the same
    /// shard share its queue. `shards` is clamped to at least one.
    pub fn sharded(shards: usize, buffer_size: usize) -> (Vec<Self>, ResourceClient<T>) {
        let shards = shards.max(1);
        let mut actors = Vec::with_capacity(shards);
        let mut senders = Vec::with_capacity(shards);
        for shard in 0..shards {
            let (sender, receiver) = mpsc::channel(buffer_size);
            senders.push(sender);
            actors.push(Self {
                receiver,
                store: HashMap::new(),
                shard,
            });
        }
        (actors, ResourceClient::from_senders(senders))
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// # Context Injection
    /// `context` is passed to every entity hook. It is supplied here rather than in
    /// `new()` so the caller can build it after the client exists.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        let shard = self.shard;
        info!(entity_type, shard, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create {
                    id,
                    params,
                    respond_to,
                } => {
                    debug!(entity_type, shard, %id, ?params, "Create");
                    if self.store.contains_key(&id) {
                        debug!(entity_type, shard, %id, "Already exists");
                        let _ = respond_to.send(Err(FrameworkError::AlreadyExists(id.to_string())));
                        continue;
                    }

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, shard, %id, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item);
                            debug!(entity_type, shard, %id, size = self.store.len(), "Created");
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, shard, %id, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, shard, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    debug!(entity_type, shard, size = self.store.len(), "List");
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, shard, %id, ?action, "Action");
                    if let Some(item) = self.store.get_mut(&id) {
                        let result = item
                            .handle_action(action, &context)
                            .await
                            .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                        if let Err(e) = &result {
                            warn!(entity_type, shard, %id, error = %e, "Action failed");
                        }
                        let _ = respond_to.send(result);
                    } else {
                        debug!(entity_type, shard, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                    }
                }
            }
        }

        info!(entity_type, shard, size = self.store.len(), "Shutdown");
    }
}
