//! Host store port.

use async_trait::async_trait;

use super::StoreError;
use ranged_combat_domain::{
    ActorId, ActorProfile, EntityKind, Item, ItemData, ItemId, ItemPatch, SourceId,
};

/// Which embedded documents to list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemFilter {
    All,
    Weapons,
    Ammunition,
    Effects,
    /// Feats and actions with this slug
    Ability(String),
}

impl ItemFilter {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::All => true,
            Self::Weapons => matches!(item.data, ItemData::Weapon(_)),
            Self::Ammunition => matches!(item.data, ItemData::Ammunition(_)),
            Self::Effects => matches!(item.data, ItemData::Effect(_)),
            Self::Ability(slug) => item.slug() == Some(slug.as_str()),
        }
    }
}

/// How to find a single document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemLookup {
    Id(ItemId),
    Source(SourceId),
}

impl ItemLookup {
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Id(id) => item.id == *id,
            Self::Source(source) => item.source_id.as_ref() == Some(source),
        }
    }
}

/// The host's document store.
///
/// Batched calls are best-effort atomic per call; the engine issues at most
/// one create, one update and one delete call per collection per action.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostStore: Send + Sync {
    async fn get_actor(&self, id: ActorId) -> Result<Option<ActorProfile>, StoreError>;

    async fn list_items(&self, actor: ActorId, filter: ItemFilter)
        -> Result<Vec<Item>, StoreError>;

    async fn find_item(
        &self,
        actor: ActorId,
        lookup: ItemLookup,
    ) -> Result<Option<Item>, StoreError>;

    /// Create documents, keeping the ids they were given.
    async fn create_entities(
        &self,
        actor: ActorId,
        kind: EntityKind,
        sources: Vec<Item>,
    ) -> Result<Vec<Item>, StoreError>;

    async fn update_entities(
        &self,
        actor: ActorId,
        kind: EntityKind,
        patches: Vec<ItemPatch>,
    ) -> Result<(), StoreError>;

    async fn delete_entities(
        &self,
        actor: ActorId,
        kind: EntityKind,
        ids: Vec<ItemId>,
    ) -> Result<(), StoreError>;

    /// Fresh copy of a catalog document.
    async fn fetch_template(&self, source: SourceId) -> Result<Option<Item>, StoreError>;
}
