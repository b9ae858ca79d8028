//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (stock entries, purchase
//! records, ...) implements to be owned by a [`ResourceActor`](crate::ResourceActor).
//! It names the id, the creation payload, the custom actions and their results, the
//! injected context and the entity's own error type.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs once, right after the entity is built.
//!
//! `handle_action` is the only required hook. Entities with no custom operations use
//! an uninhabited enum (`enum NoAction {}`) and `match action {}`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `async` and receive `&Self::Context`, which is handed to
/// [`ResourceActor::run`](crate::ResourceActor::run) rather than to the constructor.
/// The context is where an entity publishes side effects (for example a read model
/// that mirrors its state).
#[async_trait]
pub trait ActorEntity: Clone + Debug + Send + Sync + 'static {
    /// The unique identifier for this entity.
    ///
    /// Ids are chosen by the caller, and the hash of the id picks the shard that owns it.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `TryDecrement`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor, not one per action. Clients recover it from
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError) with
    /// [`FrameworkError::entity_error`](crate::FrameworkError::entity_error).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called immediately after the entity is created, before it is stored.
    /// A failure here discards the entity.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a custom resource-specific action.
    ///
    /// The owning shard processes one message at a time, so everything done in here
    /// is atomic with respect to every other request for the same shard.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
