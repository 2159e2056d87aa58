//! Item entity - embedded documents owned by an actor
//!
//! The host stores everything an actor carries as items: weapons,
//! ammunition stacks, effects (which carry this crate's persisted state in
//! their flags), feats and actions. Only the fields the ranged-combat rules
//! read are modeled here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use ranged_combat_domain::{ItemId, SourceId};

/// Default image for documents created without one
pub const DEFAULT_ITEM_IMG: &str = "icons/svg/item-bag.svg";

/// An embedded document on an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default = "default_img")]
    pub img: String,
    /// Catalog document this item was created from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<SourceId>,
    #[serde(flatten)]
    pub data: ItemData,
}

fn default_img() -> String {
    DEFAULT_ITEM_IMG.to_string()
}

/// Type-specific document data, tagged by the host's `type` field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "system", rename_all = "camelCase")]
pub enum ItemData {
    Weapon(WeaponData),
    Ammunition(AmmunitionData),
    Effect(EffectData),
    Feat(AbilityData),
    Action(AbilityData),
}

/// Which host collection a document lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Item,
    Effect,
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Item => write!(f, "item"),
            Self::Effect => write!(f, "effect"),
        }
    }
}

impl Item {
    pub fn new(name: impl Into<String>, data: ItemData) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            img: default_img(),
            source_id: None,
            data,
        }
    }

    pub fn weapon(name: impl Into<String>, data: WeaponData) -> Self {
        Self::new(name, ItemData::Weapon(data))
    }

    pub fn ammunition(name: impl Into<String>, data: AmmunitionData) -> Self {
        Self::new(name, ItemData::Ammunition(data))
    }

    pub fn effect(name: impl Into<String>, data: EffectData) -> Self {
        Self::new(name, ItemData::Effect(data))
    }

    pub fn feat(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self::new(slug.clone(), ItemData::Feat(AbilityData { slug }))
    }

    pub fn action(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self::new(slug.clone(), ItemData::Action(AbilityData { slug }))
    }

    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = id;
        self
    }

    pub fn with_img(mut self, img: impl Into<String>) -> Self {
        self.img = img.into();
        self
    }

    pub fn with_source(mut self, source_id: SourceId) -> Self {
        self.source_id = Some(source_id);
        self
    }

    pub fn kind(&self) -> EntityKind {
        match self.data {
            ItemData::Effect(_) => EntityKind::Effect,
            _ => EntityKind::Item,
        }
    }

    /// Host type name, used in logs and error messages
    pub fn type_name(&self) -> &'static str {
        match self.data {
            ItemData::Weapon(_) => "weapon",
            ItemData::Ammunition(_) => "ammunition",
            ItemData::Effect(_) => "effect",
            ItemData::Feat(_) => "feat",
            ItemData::Action(_) => "action",
        }
    }

    pub fn as_weapon(&self) -> Option<&WeaponData> {
        match &self.data {
            ItemData::Weapon(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_ammunition(&self) -> Option<&AmmunitionData> {
        match &self.data {
            ItemData::Ammunition(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_effect(&self) -> Option<&EffectData> {
        match &self.data {
            ItemData::Effect(data) => Some(data),
            _ => None,
        }
    }

    /// Slug of a feat or action document
    pub fn slug(&self) -> Option<&str> {
        match &self.data {
            ItemData::Feat(data) | ItemData::Action(data) => Some(&data.slug),
            _ => None,
        }
    }
}

/// How an item is being carried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CarryType {
    Held,
    #[default]
    Worn,
    Stowed,
    Dropped,
    /// Unknown carry type for forward compatibility
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipped {
    #[serde(default)]
    pub carry_type: CarryType,
    #[serde(default)]
    pub hands_held: u8,
}

impl Equipped {
    pub fn held(hands: u8) -> Self {
        Self {
            carry_type: CarryType::Held,
            hands_held: hands,
        }
    }

    pub fn stowed() -> Self {
        Self {
            carry_type: CarryType::Stowed,
            hands_held: 0,
        }
    }

    pub fn is_stowed(&self) -> bool {
        self.carry_type == CarryType::Stowed
    }
}

/// Native ammunition slot of a weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionSlot {
    /// Ammunition category this weapon accepts (e.g. "bolts", "rounds")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Rounds consumed per shot
    #[serde(default = "default_expend")]
    pub expend: u32,
}

fn default_expend() -> u32 {
    1
}

impl Default for AmmunitionSlot {
    fn default() -> Self {
        Self {
            category: None,
            expend: default_expend(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponData {
    #[serde(default)]
    pub traits: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_item: Option<String>,
    /// Range increment in feet; melee weapons have none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<u32>,
    /// Reload entry as written on the weapon ("-", "0", "1", "2", "1 min")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reload: Option<String>,
    /// Usage entry (e.g. "held-in-one-hand")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
    #[serde(default)]
    pub equipped: Equipped,
    /// Preferred ammunition stack for reloading and firing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_ammo_id: Option<ItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammunition: Option<AmmunitionSlot>,
    /// Ammunition loaded into the weapon, when the host tracks it natively
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subitems: Vec<Item>,
}

/// Per-unit use counter (magazines, multi-use ammunition)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Uses {
    pub value: u32,
    pub max: u32,
    /// Delete the stack once its last use is spent
    #[serde(default = "default_true")]
    pub auto_destroy: bool,
}

impl Uses {
    pub fn new(value: u32, max: u32) -> Self {
        Self {
            value,
            max,
            auto_destroy: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmunitionData {
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses: Option<Uses>,
    /// Spent units fall out on their own; otherwise they stay chambered
    #[serde(default = "default_true")]
    pub auto_eject: bool,
    #[serde(default)]
    pub equipped: Equipped,
    /// Rule elements projected onto a weapon when this ammunition is fired
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

fn default_quantity() -> u32 {
    1
}

impl AmmunitionData {
    pub fn new(quantity: u32, category: impl Into<String>) -> Self {
        Self {
            quantity,
            category: Some(category.into()),
            uses: None,
            auto_eject: true,
            equipped: Equipped::default(),
            rules: Vec::new(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectData {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<Value>,
    /// Module-namespaced flag payloads
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub flags: Map<String, Value>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityData {
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_host_ammunition_document() {
        let id = ItemId::new();
        let item: Item = serde_json::from_value(json!({
            "id": id,
            "name": "Bolts",
            "sourceId": "Compendium.pf2e.equipment-srd.Item.bolts",
            "type": "ammunition",
            "system": { "quantity": 10, "category": "bolts" }
        }))
        .expect("valid document");

        assert_eq!(item.id, id);
        assert_eq!(item.img, DEFAULT_ITEM_IMG);
        let data = item.as_ammunition().expect("ammunition data");
        assert_eq!(data.quantity, 10);
        assert!(data.auto_eject);
        assert_eq!(item.kind(), EntityKind::Item);
    }

    #[test]
    fn effects_live_in_the_effect_collection() {
        let effect = Item::effect("Loaded", EffectData::default());
        assert_eq!(effect.kind(), EntityKind::Effect);
        assert_eq!(effect.type_name(), "effect");
    }

    #[test]
    fn unknown_carry_type_is_tolerated() {
        let equipped: Equipped =
            serde_json::from_value(json!({ "carryType": "implanted" })).expect("valid");
        assert_eq!(equipped.carry_type, CarryType::Unknown);
    }
}
