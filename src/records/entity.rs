use super::error::RecordError;
use crate::model::{PurchaseKey, PurchaseRecord, RecordCreate};
use actor_framework::ActorEntity;
use async_trait::async_trait;

/// Records are write-once: created, read, never changed.
#[derive(Debug, Clone)]
pub enum RecordAction {}

#[async_trait]
impl ActorEntity for PurchaseRecord {
    type Id = PurchaseKey;
    type Create = RecordCreate;
    type Action = RecordAction;
    type ActionResult = ();
    type Context = ();
    type Error = RecordError;

    fn from_create_params(key: PurchaseKey, params: RecordCreate) -> Result<Self, Self::Error> {
        Ok(Self {
            key,
            granted_at: params.granted_at,
        })
    }

    async fn handle_action(&mut self, action: RecordAction, _ctx: &()) -> Result<(), Self::Error> {
        match action {}
    }
}
