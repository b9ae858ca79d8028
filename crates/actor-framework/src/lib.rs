//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent actor systems on Tokio. Each resource type
//! is owned by one or more [`ResourceActor`] shards; callers talk to them through a
//! cloneable [`ResourceClient`]. Every shard processes its messages one at a time, so
//! a read-check-write sequence on an entity cannot interleave with another request
//! for the same entity.
//!
//! **Further Reading**:
//! - [Actor Model (Wikipedia)](https://en.wikipedia.org/wiki/Actor_model)
//! - [Actors in Rust](https://ryhl.io/blog/actors-with-tokio/) - Practical guide to implementing actors with Tokio
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain state and the actions it accepts
//! 2. **Runtime Layer** ([`ResourceActor`]) - sequential message processing per shard
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - typed requests and errors
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, FrameworkError, ResourceActor};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)]
//! struct Counter {
//!     id: u32,
//!     left: u32,
//! }
//!
//! #[derive(Debug)] struct CounterCreate { start: u32 }
//! #[derive(Debug)] enum CounterAction { Take }
//! #[derive(Debug, thiserror::Error)] #[error("counter exhausted")] struct Exhausted;
//!
//! #[async_trait]
//! impl ActorEntity for Counter {
//!     type Id = u32;
//!     type Create = CounterCreate;
//!     type Action = CounterAction;
//!     type ActionResult = u32;
//!     type Context = ();
//!     type Error = Exhausted;
//!
//!     fn from_create_params(id: u32, params: CounterCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, left: params.start })
//!     }
//!
//!     async fn handle_action(&mut self, _: CounterAction, _: &()) -> Result<u32, Self::Error> {
//!         self.left = self.left.checked_sub(1).ok_or(Exhausted)?;
//!         Ok(self.left)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let (actor, client) = ResourceActor::<Counter>::new(10);
//!     tokio::spawn(actor.run(()));
//!
//!     client.create(1, CounterCreate { start: 1 }).await.unwrap();
//!     assert_eq!(client.perform_action(1, CounterAction::Take).await.unwrap(), 0);
//!
//!     let err = client.perform_action(1, CounterAction::Take).await.unwrap_err();
//!     assert!(err.entity_error::<Exhausted>().is_ok());
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via [`ResourceActor::run`], not at
//! construction time, so every client can exist before any actor starts. An entity
//! whose state is mirrored into a shared read model receives that model as its
//! context and publishes to it from its hooks.
//!
//! ## Sharding
//!
//! [`ResourceActor::sharded`] splits one resource type across several actors. The
//! client hashes each id to its owning shard; `list` fans out to all of them.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers a real [`ResourceClient`] from a queue of expectations,
//! which makes failure paths (already exists, timeouts) easy to reach from client
//! code. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod tracing;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
