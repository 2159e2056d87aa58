//! Canonical weapon model.
//!
//! A `Weapon` is a disposable projection: weapon systems build it from the
//! host documents at the start of an action and it is dropped when the
//! action ends. Derived fields are only computed by [`Weapon::refresh_derived`].

use ranged_combat_domain::{
    accepts, ammunition_category, inspect_traits, parse_reload, AmmoRef, Ammunition,
    CapacityAmmunition, CarryType, InventoryAmmunition, Item, ItemId, LoadedAmmunition, Magazine,
    SourceId, StandardAmmunition,
};

/// Effects attached to a weapon, by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeaponMarkers {
    /// Loaded-round record holding the weapon's rounds or chamber count
    pub loaded: Option<ItemId>,
    pub magazine: Option<ItemId>,
    pub chamber: Option<ItemId>,
    /// Loaded marker of a repeating weapon that has been readied
    pub cocked: Option<ItemId>,
    pub conjured: Option<ItemId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Weapon {
    pub id: ItemId,
    pub name: String,
    pub img: String,
    pub source_id: Option<SourceId>,

    pub group: Option<String>,
    pub base_item: Option<String>,
    pub traits: Vec<String>,
    pub is_ranged: bool,
    pub hands: u8,

    pub is_repeating: bool,
    pub is_capacity: bool,
    pub is_double_barrel: bool,
    pub requires_loading: bool,

    pub capacity: u32,
    pub remaining_capacity: u32,
    pub reload_actions: Option<u32>,
    /// Rounds consumed per shot
    pub expend: u32,

    pub is_equipped: bool,
    pub is_stowed: bool,

    pub ammunition_category: Option<String>,
    /// Preferred inventory stack
    pub selected_ammunition_id: Option<ItemId>,
    pub loaded_ammunition: Vec<LoadedAmmunition>,
    pub compatible_ammunition: Vec<InventoryAmmunition>,
    /// Ammunition type a capacity weapon fires next
    pub selected_chamber: Option<AmmoRef>,
    pub markers: WeaponMarkers,
    pub is_ready_to_fire: bool,
}

impl Weapon {
    /// Classification and equip state of a weapon document. Loaded and
    /// compatible ammunition are left empty for the weapon system to fill.
    pub fn from_item(item: &Item) -> Option<Self> {
        let data = item.as_weapon()?;
        let profile = inspect_traits(&data.traits);
        let reload_actions = parse_reload(data.reload.as_deref());
        let hands = match data.usage.as_deref() {
            Some(usage) if usage.contains("two-hands") => 2,
            _ => 1,
        };

        Some(Self {
            id: item.id,
            name: item.name.clone(),
            img: item.img.clone(),
            source_id: item.source_id.clone(),
            group: data.group.clone(),
            base_item: data.base_item.clone(),
            traits: data.traits.clone(),
            is_ranged: data.range.is_some(),
            hands,
            is_repeating: profile.is_repeating,
            is_capacity: profile.is_capacity,
            is_double_barrel: profile.is_double_barrel,
            requires_loading: profile.is_repeating || reload_actions.is_some_and(|r| r > 0),
            capacity: profile.capacity,
            remaining_capacity: profile.capacity,
            reload_actions,
            expend: data.ammunition.as_ref().map_or(1, |a| a.expend.max(1)),
            is_equipped: data.equipped.carry_type == CarryType::Held,
            is_stowed: data.equipped.is_stowed(),
            ammunition_category: ammunition_category(data),
            selected_ammunition_id: data.selected_ammo_id,
            loaded_ammunition: Vec::new(),
            compatible_ammunition: Vec::new(),
            selected_chamber: None,
            markers: WeaponMarkers::default(),
            is_ready_to_fire: false,
        })
    }

    /// Recompute `remaining_capacity` and `is_ready_to_fire`.
    pub fn refresh_derived(&mut self) {
        self.remaining_capacity = self.capacity.saturating_sub(self.loaded_quantity());
        self.is_ready_to_fire = if self.requires_loading {
            self.loaded_uses() >= self.expend && (!self.is_reload_gated() || self.is_cocked())
        } else if self.uses_ammunition() {
            self.preferred_ammunition()
                .is_some_and(|a| a.ammunition.total_uses() >= self.expend)
        } else {
            true
        };
    }

    pub fn uses_ammunition(&self) -> bool {
        self.ammunition_category.is_some()
    }

    /// Repeating weapons with a reload entry must be readied between magazines
    pub fn is_reload_gated(&self) -> bool {
        self.is_repeating && self.reload_actions.is_some_and(|r| r > 0)
    }

    pub fn is_cocked(&self) -> bool {
        self.markers.cocked.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        !self.loaded_ammunition.is_empty()
    }

    pub fn loaded_quantity(&self) -> u32 {
        self.loaded_ammunition.iter().map(|l| l.quantity()).sum()
    }

    pub fn loaded_uses(&self) -> u32 {
        self.loaded_ammunition
            .iter()
            .map(|l| l.remaining_uses())
            .sum()
    }

    pub fn accepts(&self, ammunition: &Ammunition) -> bool {
        accepts(
            self.ammunition_category.as_deref(),
            self.is_repeating,
            ammunition,
        )
    }

    pub fn magazine(&self) -> Option<&Magazine> {
        self.loaded_ammunition.iter().find_map(|l| match l {
            LoadedAmmunition::Magazine(magazine) => Some(magazine),
            _ => None,
        })
    }

    pub fn magazine_mut(&mut self) -> Option<&mut Magazine> {
        self.loaded_ammunition.iter_mut().find_map(|l| match l {
            LoadedAmmunition::Magazine(magazine) => Some(magazine),
            _ => None,
        })
    }

    pub fn chambers(&self) -> Option<&CapacityAmmunition> {
        self.loaded_ammunition.iter().find_map(|l| match l {
            LoadedAmmunition::Capacity(chambers) => Some(chambers),
            _ => None,
        })
    }

    pub fn chambers_mut(&mut self) -> Option<&mut CapacityAmmunition> {
        self.loaded_ammunition.iter_mut().find_map(|l| match l {
            LoadedAmmunition::Capacity(chambers) => Some(chambers),
            _ => None,
        })
    }

    /// Load rounds into a capacity weapon's chambers
    pub fn load_chamber(&mut self, rounds: Ammunition) {
        match self.chambers_mut() {
            Some(chambers) => chambers.load(rounds),
            None => {
                let mut chambers = CapacityAmmunition::default();
                chambers.load(rounds);
                self.loaded_ammunition
                    .push(LoadedAmmunition::Capacity(chambers));
            }
        }
    }

    /// Rounds loaded from the inventory in a single-type weapon
    pub fn standard(&self) -> Option<&StandardAmmunition> {
        self.loaded_ammunition.iter().find_map(|l| match l {
            LoadedAmmunition::Standard(standard) if !standard.conjured => Some(standard),
            _ => None,
        })
    }

    pub fn conjured_round(&self) -> Option<&StandardAmmunition> {
        self.loaded_ammunition.iter().find_map(|l| match l {
            LoadedAmmunition::Standard(standard) if standard.conjured => Some(standard),
            _ => None,
        })
    }

    /// Drop empty entries left behind by firing or unloading
    pub fn prune_loaded(&mut self) {
        self.loaded_ammunition.retain(|l| match l {
            LoadedAmmunition::Magazine(_) => true,
            other => other.quantity() > 0,
        });
    }

    /// Distinct ammunition types loaded from the inventory, oldest first
    pub fn loaded_types(&self) -> Vec<&Ammunition> {
        self.loaded_ammunition
            .iter()
            .filter(|l| !l.is_conjured())
            .flat_map(|l| l.ammunition())
            .collect()
    }

    /// Stacks that could be loaded right now
    pub fn available_ammunition(&self) -> impl Iterator<Item = &InventoryAmmunition> {
        self.compatible_ammunition.iter().filter(|a| a.is_available())
    }

    /// The selected stack if it is still available, otherwise the only one
    pub fn preferred_ammunition(&self) -> Option<&InventoryAmmunition> {
        if let Some(selected) = self.selected_ammunition_id {
            if let Some(stack) = self
                .available_ammunition()
                .find(|a| a.ammunition.id == selected)
            {
                return Some(stack);
            }
        }
        let mut available = self.available_ammunition();
        match (available.next(), available.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }
}
