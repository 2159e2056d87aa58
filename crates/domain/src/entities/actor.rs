//! Actor entity - a creature sheet and everything embedded in it

use serde::{Deserialize, Serialize};

use ranged_combat_domain::{ActorId, Item, ItemId, SourceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    Character,
    Npc,
    Familiar,
}

impl std::fmt::Display for ActorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Character => write!(f, "character"),
            Self::Npc => write!(f, "npc"),
            Self::Familiar => write!(f, "familiar"),
        }
    }
}

/// Identity of an actor without its embedded documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorProfile {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
}

/// An actor snapshot: profile plus every embedded document.
///
/// Snapshots are read at the start of an action and never written back;
/// changes go through patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Actor {
    pub fn new(name: impl Into<String>, kind: ActorKind) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            kind,
            items: Vec::new(),
        }
    }

    pub fn from_profile(profile: ActorProfile, items: Vec<Item>) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            kind: profile.kind,
            items,
        }
    }

    pub fn profile(&self) -> ActorProfile {
        ActorProfile {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
        }
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.id == id)
    }

    pub fn item_by_source(&self, source_id: &SourceId) -> Option<&Item> {
        self.items
            .iter()
            .find(|i| i.source_id.as_ref() == Some(source_id))
    }

    pub fn weapons(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.as_weapon().is_some())
    }

    pub fn ammunition(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.as_ammunition().is_some())
    }

    pub fn effects(&self) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(|i| i.as_effect().is_some())
    }

    /// Whether the actor has a feat or action with this slug
    pub fn has_ability(&self, slug: &str) -> bool {
        self.ability(slug).is_some()
    }

    pub fn ability(&self, slug: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.slug() == Some(slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AmmunitionData, WeaponData};

    #[test]
    fn partitions_embedded_documents() {
        let actor = Actor::new("Ezren", ActorKind::Character)
            .with_item(Item::weapon("Crossbow", WeaponData::default()))
            .with_item(Item::ammunition("Bolts", AmmunitionData::new(10, "bolts")))
            .with_item(Item::feat("crossbow-ace"));

        assert_eq!(actor.weapons().count(), 1);
        assert_eq!(actor.ammunition().count(), 1);
        assert_eq!(actor.effects().count(), 0);
        assert!(actor.has_ability("crossbow-ace"));
        assert!(!actor.has_ability("hunt-prey"));
    }
}
