//! # Ledger Client
//!
//! High-level API for the stock ledger. Wraps a `ResourceClient<StockEntry>` and turns
//! the generic action results into typed values.
use crate::ledger::{LedgerAction, LedgerActionResult, LedgerError};
use crate::model::{Decrement, ProductId, StockCreate, StockEntry};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for interacting with the ledger shards.
#[derive(Clone)]
pub struct LedgerClient {
    /// Enqueue bounded by the ledger wait.
    inner: ResourceClient<StockEntry>,
    next_id: Arc<AtomicU32>,
}

impl LedgerClient {
    pub fn new(inner: ResourceClient<StockEntry>, ledger_wait: Duration) -> Self {
        Self {
            inner: inner.with_send_timeout(ledger_wait),
            next_id: Arc::new(AtomicU32::new(1)),
        }
    }

    /// Seeds a product and returns its id. Ids are handed out from 1 upwards.
    #[instrument(skip(self))]
    pub async fn register(&self, name: &str, stock: u32) -> Result<ProductId, LedgerError> {
        let id = ProductId(self.next_id.fetch_add(1, Ordering::SeqCst));
        debug!(product_id = %id, "Registering product");
        self.inner
            .without_send_timeout()
            .create(
                id,
                StockCreate {
                    name: name.to_string(),
                    stock,
                },
            )
            .await
            .map_err(Self::map_error)
    }

    /// Atomically takes one unit of `id` if any remain.
    #[instrument(skip(self))]
    pub async fn try_decrement(&self, id: ProductId) -> Result<Decrement, LedgerError> {
        match self
            .inner
            .perform_action(id, LedgerAction::TryDecrement)
            .await
            .map_err(Self::map_error)?
        {
            LedgerActionResult::TryDecrement(decrement) => Ok(decrement),
            other => Err(unexpected(id, &other)),
        }
    }

    /// Gives back one unit of `id`. Waits for queue room as long as it takes: a unit
    /// already taken must not be lost to a busy queue.
    #[instrument(skip(self))]
    pub async fn restore(&self, id: ProductId) -> Result<u32, LedgerError> {
        match self
            .inner
            .without_send_timeout()
            .perform_action(id, LedgerAction::Restore)
            .await
            .map_err(Self::map_error)?
        {
            LedgerActionResult::Restore(remaining) => Ok(remaining),
            other => Err(unexpected(id, &other)),
        }
    }

    /// Current remaining count of `id`, read through the owning actor.
    #[instrument(skip(self))]
    pub async fn remaining(&self, id: ProductId) -> Result<u32, LedgerError> {
        match self
            .inner
            .perform_action(id, LedgerAction::Remaining)
            .await
            .map_err(Self::map_error)?
        {
            LedgerActionResult::Remaining(remaining) => Ok(remaining),
            other => Err(unexpected(id, &other)),
        }
    }
}

fn unexpected(id: ProductId, reply: &LedgerActionResult) -> LedgerError {
    LedgerError::Inconsistent(format!("unexpected ledger reply for {id}: {reply:?}"))
}

#[async_trait]
impl ActorClient<StockEntry> for LedgerClient {
    type Error = LedgerError;

    fn inner(&self) -> &ResourceClient<StockEntry> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        LedgerError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actor_framework::mock::{create_mock_client, expect_action, expect_create};

    const WAIT: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn register_hands_out_sequential_ids() {
        let (client, mut receiver) = create_mock_client::<StockEntry>(10);
        let ledger = LedgerClient::new(client, WAIT);

        let task = tokio::spawn(async move {
            let first = ledger.register("Front row", 2).await?;
            let second = ledger.register("Balcony", 5).await?;
            Ok::<_, LedgerError>((first, second))
        });

        for expected in [ProductId(1), ProductId(2)] {
            let (id, params, responder) = expect_create(&mut receiver)
                .await
                .expect("Expected Create request");
            assert_eq!(id, expected);
            assert!(!params.name.is_empty());
            responder.send(Ok(id)).unwrap();
        }

        assert_eq!(task.await.unwrap().unwrap(), (ProductId(1), ProductId(2)));
    }

    #[tokio::test]
    async fn try_decrement_returns_the_decrement() {
        let (client, mut receiver) = create_mock_client::<StockEntry>(10);
        let ledger = LedgerClient::new(client, WAIT);

        let task = tokio::spawn(async move { ledger.try_decrement(ProductId(3)).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, ProductId(3));
        assert!(matches!(action, LedgerAction::TryDecrement));
        responder
            .send(Ok(LedgerActionResult::TryDecrement(Decrement {
                ok: true,
                remaining_after: 4,
            })))
            .unwrap();

        let decrement = task.await.unwrap().unwrap();
        assert!(decrement.ok);
        assert_eq!(decrement.remaining_after, 4);
    }

    #[tokio::test]
    async fn entity_errors_come_back_typed() {
        let (client, mut receiver) = create_mock_client::<StockEntry>(10);
        let ledger = LedgerClient::new(client, WAIT);

        let task = tokio::spawn(async move { ledger.restore(ProductId(1)).await });

        let (_, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert!(matches!(action, LedgerAction::Restore));
        responder
            .send(Err(FrameworkError::EntityError(Box::new(
                LedgerError::Inconsistent("full".into()),
            ))))
            .unwrap();

        assert_eq!(
            task.await.unwrap(),
            Err(LedgerError::Inconsistent("full".into()))
        );
    }

    #[tokio::test]
    async fn mismatched_reply_is_an_inconsistency() {
        let (client, mut receiver) = create_mock_client::<StockEntry>(10);
        let ledger = LedgerClient::new(client, WAIT);

        let task = tokio::spawn(async move { ledger.remaining(ProductId(1)).await });

        let (_, _, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        responder.send(Ok(LedgerActionResult::Restore(1))).unwrap();

        assert!(matches!(
            task.await.unwrap(),
            Err(LedgerError::Inconsistent(_))
        ));
    }

    #[test]
    fn framework_errors_map_to_ledger_errors() {
        assert_eq!(LedgerError::from(FrameworkError::Timeout), LedgerError::Busy);
        assert_eq!(
            LedgerError::from(FrameworkError::NotFound("product_9".into())),
            LedgerError::NotFound("product_9".into())
        );
        assert!(matches!(
            LedgerError::from(FrameworkError::ActorClosed),
            LedgerError::Unavailable(_)
        ));
    }
}
