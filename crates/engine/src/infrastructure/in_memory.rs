//! In-memory host store.
//!
//! Keeps actors and catalog templates in concurrent maps and records every
//! mutating call, so callers can assert exactly what an action committed.
//! Used for scenario tests and for embedding the engine without a host.

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use super::ports::{HostStore, ItemFilter, ItemLookup, StoreError};
use ranged_combat_domain::{
    Actor, ActorId, ActorProfile, EntityKind, Item, ItemId, ItemPatch, SourceId,
};

/// One mutating call received by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOperation {
    Create { kind: EntityKind, ids: Vec<ItemId> },
    Update { kind: EntityKind, ids: Vec<ItemId> },
    Delete { kind: EntityKind, ids: Vec<ItemId> },
}

#[derive(Default)]
pub struct InMemoryHostStore {
    actors: DashMap<ActorId, Actor>,
    templates: DashMap<SourceId, Item>,
    operations: RwLock<Vec<StoreOperation>>,
}

impl InMemoryHostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_actor(&self, actor: Actor) {
        self.actors.insert(actor.id, actor);
    }

    /// Register a catalog document under its source id
    pub fn insert_template(&self, source: SourceId, item: Item) {
        self.templates.insert(source, item);
    }

    /// Current copy of an actor
    pub fn actor(&self, id: ActorId) -> Option<Actor> {
        self.actors.get(&id).map(|a| a.clone())
    }

    pub fn item(&self, actor: ActorId, id: ItemId) -> Option<Item> {
        self.actors
            .get(&actor)
            .and_then(|a| a.item(id).cloned())
    }

    pub async fn operations(&self) -> Vec<StoreOperation> {
        self.operations.read().await.clone()
    }

    pub async fn clear_operations(&self) {
        self.operations.write().await.clear();
    }

    async fn record(&self, operation: StoreOperation) {
        self.operations.write().await.push(operation);
    }

    fn with_actor<T>(
        &self,
        id: ActorId,
        f: impl FnOnce(&mut Actor) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut actor = self
            .actors
            .get_mut(&id)
            .ok_or(StoreError::ActorNotFound(id))?;
        f(actor.value_mut())
    }
}

#[async_trait]
impl HostStore for InMemoryHostStore {
    async fn get_actor(&self, id: ActorId) -> Result<Option<ActorProfile>, StoreError> {
        Ok(self.actors.get(&id).map(|a| a.profile()))
    }

    async fn list_items(
        &self,
        actor: ActorId,
        filter: ItemFilter,
    ) -> Result<Vec<Item>, StoreError> {
        let actor = self
            .actors
            .get(&actor)
            .ok_or(StoreError::ActorNotFound(actor))?;
        Ok(actor
            .items
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect())
    }

    async fn find_item(
        &self,
        actor: ActorId,
        lookup: ItemLookup,
    ) -> Result<Option<Item>, StoreError> {
        let actor = self
            .actors
            .get(&actor)
            .ok_or(StoreError::ActorNotFound(actor))?;
        Ok(actor.items.iter().find(|i| lookup.matches(i)).cloned())
    }

    async fn create_entities(
        &self,
        actor: ActorId,
        kind: EntityKind,
        sources: Vec<Item>,
    ) -> Result<Vec<Item>, StoreError> {
        if let Some(wrong) = sources.iter().find(|i| i.kind() != kind) {
            return Err(StoreError::host(
                "create_entities",
                format!("'{}' is not an {}", wrong.name, kind),
            ));
        }
        let ids = sources.iter().map(|i| i.id).collect();
        let created = self.with_actor(actor, |a| {
            a.items.extend(sources.iter().cloned());
            Ok(sources)
        })?;
        self.record(StoreOperation::Create { kind, ids }).await;
        Ok(created)
    }

    async fn update_entities(
        &self,
        actor: ActorId,
        kind: EntityKind,
        patches: Vec<ItemPatch>,
    ) -> Result<(), StoreError> {
        let ids = patches.iter().map(|p| p.id).collect();
        self.with_actor(actor, |a| {
            let actor_id = a.id;
            // Validate everything before touching anything
            let mut updated = Vec::with_capacity(patches.len());
            for patch in &patches {
                let mut item = a
                    .item(patch.id)
                    .filter(|i| i.kind() == kind)
                    .cloned()
                    .ok_or_else(|| StoreError::item_not_found(actor_id, kind, patch.id))?;
                item.apply_all(&patch.changes)?;
                updated.push(item);
            }
            for item in updated {
                if let Some(slot) = a.item_mut(item.id) {
                    *slot = item;
                }
            }
            Ok(())
        })?;
        self.record(StoreOperation::Update { kind, ids }).await;
        Ok(())
    }

    async fn delete_entities(
        &self,
        actor: ActorId,
        kind: EntityKind,
        ids: Vec<ItemId>,
    ) -> Result<(), StoreError> {
        self.with_actor(actor, |a| {
            let actor_id = a.id;
            if let Some(missing) = ids
                .iter()
                .find(|id| !a.items.iter().any(|i| i.id == **id && i.kind() == kind))
            {
                return Err(StoreError::item_not_found(actor_id, kind, *missing));
            }
            a.items.retain(|i| !ids.contains(&i.id));
            Ok(())
        })?;
        self.record(StoreOperation::Delete { kind, ids }).await;
        Ok(())
    }

    async fn fetch_template(&self, source: SourceId) -> Result<Option<Item>, StoreError> {
        Ok(self.templates.get(&source).map(|t| t.clone()))
    }
}
