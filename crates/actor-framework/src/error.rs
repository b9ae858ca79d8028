//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself. Entity-specific failures travel inside
//! [`FrameworkError::EntityError`] and are recovered by the typed clients.

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// The request could not be enqueued within the client's send timeout.
    /// Nothing was delivered, so nothing was applied.
    #[error("Timed out waiting for actor queue")]
    Timeout,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Item already exists: {0}")]
    AlreadyExists(String),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the entity's own error type from an [`FrameworkError::EntityError`].
    ///
    /// Any other variant, or an entity error of a different type, is handed back
    /// unchanged so the caller can map it.
    pub fn entity_error<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(inner) => inner
                .downcast::<E>()
                .map(|boxed| *boxed)
                .map_err(FrameworkError::EntityError),
            other => Err(other),
        }
    }
}
