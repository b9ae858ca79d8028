use actor_framework::{ActorClient, ActorEntity, FrameworkError, ResourceActor, ResourceClient};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Bin {
    id: u32,
    label: String,
    items: u32,
}

#[derive(Debug)]
struct BinCreate {
    label: String,
    items: u32,
}

#[derive(Debug)]
enum BinAction {
    Take,
    Put,
}

#[derive(Debug, thiserror::Error, PartialEq)]
enum BinError {
    #[error("bin {0} is empty")]
    Empty(u32),
    #[error("bin label must not be blank")]
    BlankLabel,
}

/// Shared journal the bins write to, standing in for a read model.
type Journal = Arc<Mutex<Vec<(u32, u32)>>>;

#[async_trait]
impl ActorEntity for Bin {
    type Id = u32;
    type Create = BinCreate;
    type Action = BinAction;
    type ActionResult = u32;
    type Context = Journal;
    type Error = BinError;

    fn from_create_params(id: u32, params: BinCreate) -> Result<Self, Self::Error> {
        if params.label.trim().is_empty() {
            return Err(BinError::BlankLabel);
        }
        Ok(Self {
            id,
            label: params.label,
            items: params.items,
        })
    }

    async fn on_create(&mut self, journal: &Journal) -> Result<(), Self::Error> {
        journal.lock().unwrap().push((self.id, self.items));
        Ok(())
    }

    async fn handle_action(&mut self, action: BinAction, journal: &Journal) -> Result<u32, Self::Error> {
        match action {
            BinAction::Take => {
                if self.items == 0 {
                    return Err(BinError::Empty(self.id));
                }
                self.items -= 1;
            }
            BinAction::Put => self.items += 1,
        }
        journal.lock().unwrap().push((self.id, self.items));
        Ok(self.items)
    }
}

struct BinClient {
    inner: ResourceClient<Bin>,
}

#[async_trait]
impl ActorClient<Bin> for BinClient {
    type Error = String;

    fn inner(&self) -> &ResourceClient<Bin> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        e.to_string()
    }
}

fn bin(label: &str, items: u32) -> BinCreate {
    BinCreate {
        label: label.into(),
        items,
    }
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let journal = Journal::default();
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(journal.clone()));

    // 1. Create
    let id = client.create(7, bin("bolts", 2)).await.unwrap();
    assert_eq!(id, 7);

    // 2. Actions run against the stored entity
    assert_eq!(client.perform_action(7, BinAction::Take).await.unwrap(), 1);
    assert_eq!(client.perform_action(7, BinAction::Take).await.unwrap(), 0);

    let err = client.perform_action(7, BinAction::Take).await.unwrap_err();
    assert_eq!(err.entity_error::<BinError>().unwrap(), BinError::Empty(7));

    assert_eq!(client.perform_action(7, BinAction::Put).await.unwrap(), 1);

    // 3. Read back
    let stored = client.get(7).await.unwrap().unwrap();
    assert_eq!(stored.label, "bolts");
    assert_eq!(stored.items, 1);

    // Hooks saw the context
    assert_eq!(*journal.lock().unwrap(), vec![(7, 2), (7, 1), (7, 0), (7, 1)]);
}

#[tokio::test]
async fn test_create_is_insert_if_absent() {
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(Journal::default()));

    client.create(1, bin("nuts", 5)).await.unwrap();
    let second = client.create(1, bin("washers", 9)).await;
    assert!(matches!(second, Err(FrameworkError::AlreadyExists(ref id)) if id == "1"));

    let stored = client.get(1).await.unwrap().unwrap();
    assert_eq!(stored.label, "nuts");
    assert_eq!(stored.items, 5);
}

#[tokio::test]
async fn test_rejected_create_stores_nothing() {
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(Journal::default()));

    let err = client.create(3, bin("  ", 1)).await.unwrap_err();
    assert_eq!(err.entity_error::<BinError>().unwrap(), BinError::BlankLabel);
    assert!(client.get(3).await.unwrap().is_none());
}

#[tokio::test]
async fn test_action_on_missing_entity() {
    let (actor, client) = ResourceActor::<Bin>::new(10);
    tokio::spawn(actor.run(Journal::default()));

    let result = client.perform_action(42, BinAction::Take).await;
    assert!(matches!(result, Err(FrameworkError::NotFound(ref id)) if id == "42"));
}

#[tokio::test]
async fn test_sharded_actors_route_and_list() {
    let (actors, client) = ResourceActor::<Bin>::sharded(4, 16);
    assert_eq!(actors.len(), 4);
    assert_eq!(client.shard_count(), 4);

    let journal = Journal::default();
    for actor in actors {
        tokio::spawn(actor.run(journal.clone()));
    }

    for id in 0..20 {
        client.create(id, bin("part", id)).await.unwrap();
    }
    for id in 0..20 {
        assert!(client.shard_for(&id) < 4);
        assert_eq!(client.get(id).await.unwrap().unwrap().items, id);
    }

    let typed = BinClient { inner: client };
    let mut all = typed.list().await.unwrap();
    all.sort_by_key(|b| b.id);
    assert_eq!(all.len(), 20);
    assert_eq!(all.first().unwrap().id, 0);
    assert_eq!(all.last().unwrap().id, 19);
    assert!(typed.get(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_zero_shards_is_clamped_to_one() {
    let (actors, client) = ResourceActor::<Bin>::sharded(0, 4);
    assert_eq!(actors.len(), 1);
    assert_eq!(client.shard_count(), 1);
}

#[tokio::test]
async fn test_concurrent_takes_never_oversell() {
    let (actors, client) = ResourceActor::<Bin>::sharded(2, 64);
    for actor in actors {
        tokio::spawn(actor.run(Journal::default()));
    }
    client.create(1, bin("last units", 10)).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move {
            client.perform_action(1, BinAction::Take).await.is_ok()
        }));
    }

    let mut taken = 0;
    for task in tasks {
        if task.await.unwrap() {
            taken += 1;
        }
    }

    assert_eq!(taken, 10);
    assert_eq!(client.get(1).await.unwrap().unwrap().items, 0);
}

#[tokio::test]
async fn test_closed_actor_reports_closed() {
    let (actor, client) = ResourceActor::<Bin>::new(4);
    drop(actor);

    let result = client.get(1).await;
    assert!(matches!(result, Err(FrameworkError::ActorClosed)));
}
