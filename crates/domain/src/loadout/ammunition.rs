//! Canonical ammunition, independent of how the host stores it.

use serde_json::Value;

use ranged_combat_domain::{
    AmmoRef, AmmunitionData, Equipped, Item, ItemId, SourceId, StackChange, Uses,
};

pub const CONJURED_ROUND_NAME: &str = "Conjured Round";
const CONJURED_ROUND_IMG: &str = "icons/magic/light/projectile-bolt-blue.webp";

#[derive(Debug, Clone, PartialEq)]
pub struct Ammunition {
    pub id: ItemId,
    pub name: String,
    pub img: String,
    pub source_id: Option<SourceId>,
    pub category: Option<String>,
    /// Stack size
    pub quantity: u32,
    /// Use counter of the top unit of the stack
    pub uses: Option<Uses>,
    /// Spent units roll over to the next one without a manual unload
    pub auto_eject: bool,
    /// A fully spent stack may be deleted
    pub allow_destroy: bool,
    pub rules: Vec<Value>,
    pub description_text: String,
}

impl Ammunition {
    pub fn from_item(item: &Item) -> Option<Self> {
        let data = item.as_ammunition()?;
        Some(Self {
            id: item.id,
            name: item.name.clone(),
            img: item.img.clone(),
            source_id: item.source_id.clone(),
            category: data.category.clone(),
            quantity: data.quantity,
            uses: data.uses,
            auto_eject: data.auto_eject,
            allow_destroy: data.uses.map_or(true, |u| u.auto_destroy),
            rules: data.rules.clone(),
            description_text: data.description.clone(),
        })
    }

    /// Rebuild ammunition from a persisted reference. Use counters and rules
    /// are not part of the reference.
    pub fn from_ref(reference: &AmmoRef, category: Option<String>) -> Self {
        Self {
            id: reference.id,
            name: reference.name.clone(),
            img: reference.img.clone(),
            source_id: reference.source_id.clone(),
            category,
            quantity: reference.quantity.unwrap_or(1),
            uses: None,
            auto_eject: true,
            allow_destroy: true,
            rules: Vec::new(),
            description_text: String::new(),
        }
    }

    /// A round created by magic; it exists only while loaded.
    pub fn conjured(effect_id: ItemId, category: Option<String>) -> Self {
        Self {
            id: effect_id,
            name: CONJURED_ROUND_NAME.to_string(),
            img: CONJURED_ROUND_IMG.to_string(),
            source_id: None,
            category,
            quantity: 1,
            uses: None,
            auto_eject: true,
            allow_destroy: true,
            rules: Vec::new(),
            description_text: String::new(),
        }
    }

    pub fn has_uses(&self) -> bool {
        self.uses.is_some()
    }

    /// Uses left on the top unit
    pub fn remaining_uses(&self) -> u32 {
        if self.quantity == 0 {
            return 0;
        }
        self.uses.map_or(1, |u| u.value)
    }

    pub fn max_uses(&self) -> u32 {
        self.uses.map_or(1, |u| u.max)
    }

    /// Uses left across the whole stack
    pub fn total_uses(&self) -> u32 {
        match (self.quantity, self.uses) {
            (0, _) => 0,
            (quantity, None) => quantity,
            (quantity, Some(uses)) => (quantity - 1) * uses.max + uses.value,
        }
    }

    /// Magazines carry more than one use per unit
    pub fn is_magazine(&self) -> bool {
        self.max_uses() > 1
    }

    /// Same catalog entry, or the same stack when either has no source
    pub fn is_same_type(&self, other: &Ammunition) -> bool {
        match (&self.source_id, &other.source_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.id == other.id,
        }
    }

    pub fn matches_ref(&self, reference: &AmmoRef) -> bool {
        match (&self.source_id, &reference.source_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.id == reference.id,
        }
    }

    /// Spend up to `units` uses, returning how many were actually spent.
    ///
    /// Auto-eject ammunition drops a unit when its last use is spent and
    /// continues with the next one. Manual ammunition stops at an empty unit
    /// until it is unloaded.
    pub fn spend(&mut self, units: u32) -> u32 {
        let mut spent = 0;
        while spent < units && self.quantity > 0 {
            match self.uses.as_mut() {
                None => {
                    self.quantity = StackChange::take(self.quantity, 1).quantity();
                }
                Some(uses) => {
                    if uses.value == 0 {
                        break;
                    }
                    uses.value -= 1;
                    if uses.value == 0 && self.auto_eject {
                        self.quantity = StackChange::take(self.quantity, 1).quantity();
                        if self.quantity > 0 {
                            uses.value = uses.max;
                        }
                    }
                }
            }
            spent += 1;
        }
        spent
    }

    /// Whether the stack should be removed from the inventory
    pub fn is_spent(&self) -> bool {
        self.quantity == 0
    }

    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    pub fn to_ref(&self, quantity: Option<u32>) -> AmmoRef {
        AmmoRef {
            name: self.name.clone(),
            img: self.img.clone(),
            id: self.id,
            source_id: self.source_id.clone(),
            quantity,
        }
    }

    /// Host document for this ammunition, keeping its id
    pub fn to_item(&self) -> Item {
        let data = AmmunitionData {
            quantity: self.quantity,
            category: self.category.clone(),
            uses: self.uses,
            auto_eject: self.auto_eject,
            equipped: Equipped::default(),
            rules: self.rules.clone(),
            description: self.description_text.clone(),
        };
        let item = Item::ammunition(self.name.clone(), data)
            .with_id(self.id)
            .with_img(self.img.clone());
        match &self.source_id {
            Some(source) => item.with_source(source.clone()),
            None => item,
        }
    }
}

/// Ammunition sitting in the actor's inventory
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryAmmunition {
    pub ammunition: Ammunition,
    pub is_stowed: bool,
}

impl InventoryAmmunition {
    pub fn from_item(item: &Item) -> Option<Self> {
        let is_stowed = item.as_ammunition()?.equipped.is_stowed();
        Some(Self {
            ammunition: Ammunition::from_item(item)?,
            is_stowed,
        })
    }

    /// Available to load: carried and not empty
    pub fn is_available(&self) -> bool {
        !self.is_stowed && self.ammunition.quantity > 0
    }
}
