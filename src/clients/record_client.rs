//! # Record Client
//!
//! High-level API for the purchase record book.
use crate::model::{PurchaseKey, PurchaseRecord, RecordCreate};
use crate::records::RecordError;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::time::{Duration, SystemTime};
use tracing::{debug, instrument};

/// Client for interacting with the record book shards.
#[derive(Clone)]
pub struct RecordClient {
    /// Enqueue bounded by the record wait.
    inner: ResourceClient<PurchaseRecord>,
}

impl RecordClient {
    pub fn new(inner: ResourceClient<PurchaseRecord>, record_wait: Duration) -> Self {
        Self {
            inner: inner.with_send_timeout(record_wait),
        }
    }

    /// Whether a purchase is recorded for `key`.
    #[instrument(skip(self))]
    pub async fn contains(&self, key: PurchaseKey) -> Result<bool, RecordError> {
        Ok(self.get(key).await?.is_some())
    }

    /// Inserts the record for `key` unless one exists.
    ///
    /// Called after a unit was taken, so it waits for queue room without a bound.
    ///
    /// # Errors
    /// [`RecordError::AlreadyRecorded`] when the pair already has a record.
    #[instrument(skip(self))]
    pub async fn insert(&self, key: PurchaseKey, granted_at: SystemTime) -> Result<(), RecordError> {
        debug!("Recording purchase");
        self.inner
            .without_send_timeout()
            .create(key, RecordCreate { granted_at })
            .await
            .map(|_| ())
            .map_err(Self::map_error)
    }
}

#[async_trait]
impl ActorClient<PurchaseRecord> for RecordClient {
    type Error = RecordError;

    fn inner(&self) -> &ResourceClient<PurchaseRecord> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        RecordError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ProductId, UserId};
    use actor_framework::mock::MockClient;

    fn key() -> PurchaseKey {
        PurchaseKey::new(UserId(1), ProductId(1))
    }

    #[tokio::test]
    async fn contains_reflects_the_lookup() {
        let mut mock = MockClient::<PurchaseRecord>::new();
        mock.expect_get(key()).return_ok(None);
        mock.expect_get(key()).return_ok(Some(PurchaseRecord {
            key: key(),
            granted_at: SystemTime::now(),
        }));

        let records = RecordClient::new(mock.client(), Duration::from_millis(50));
        assert!(!records.contains(key()).await.unwrap());
        assert!(records.contains(key()).await.unwrap());
        mock.verify();
    }

    #[tokio::test]
    async fn second_insert_reports_already_recorded() {
        let mut mock = MockClient::<PurchaseRecord>::new();
        mock.expect_create().return_ok(key());
        mock.expect_create()
            .return_err(FrameworkError::AlreadyExists(key().to_string()));

        let records = RecordClient::new(mock.client(), Duration::from_millis(50));
        records.insert(key(), SystemTime::now()).await.unwrap();
        assert_eq!(
            records.insert(key(), SystemTime::now()).await,
            Err(RecordError::AlreadyRecorded("user_1/product_1".into()))
        );
        mock.verify();
    }
}
