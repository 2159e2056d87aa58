//! Ammunition attached to a weapon.

use ranged_combat_domain::{Ammunition, ItemId, MagazineState, Uses};

/// A magazine seated in a repeating weapon: one unit with a charge counter
#[derive(Debug, Clone, PartialEq)]
pub struct Magazine {
    /// The magazine as a single-unit stack
    pub ammunition: Ammunition,
    pub remaining: u32,
    pub capacity: u32,
    /// Full units of the same stack held behind the seated one
    pub reserve: u32,
}

impl Magazine {
    /// Seat the top unit of a magazine stack
    pub fn from_stack(stack: &Ammunition) -> Self {
        let remaining = stack.remaining_uses();
        let capacity = stack.max_uses();
        let mut ammunition = stack.with_quantity(1);
        ammunition.uses = Some(Uses {
            value: remaining,
            max: capacity,
            auto_destroy: stack.allow_destroy,
        });
        Self {
            ammunition,
            remaining,
            capacity,
            reserve: 0,
        }
    }

    /// A whole stack held by the weapon: the top unit is seated and the
    /// rest wait in reserve.
    pub fn from_loaded_stack(stack: &Ammunition) -> Self {
        Self {
            reserve: stack.quantity.saturating_sub(1),
            ..Self::from_stack(stack)
        }
    }

    pub fn from_state(state: &MagazineState, category: Option<String>) -> Self {
        let ammunition = Ammunition {
            id: state.ammunition_item_id,
            name: state.ammunition_name.clone(),
            img: state.ammunition_img.clone(),
            source_id: state.ammunition_source_id.clone(),
            category,
            quantity: 1,
            uses: Some(Uses::new(state.remaining, state.capacity)),
            auto_eject: state.auto_eject,
            allow_destroy: true,
            rules: Vec::new(),
            description_text: String::new(),
        };
        Self {
            ammunition,
            remaining: state.remaining,
            capacity: state.capacity,
            reserve: 0,
        }
    }

    pub fn to_state(&self, target_id: ItemId) -> MagazineState {
        MagazineState {
            target_id,
            capacity: self.capacity,
            remaining: self.remaining,
            ammunition_name: self.ammunition.name.clone(),
            ammunition_img: self.ammunition.img.clone(),
            ammunition_item_id: self.ammunition.id,
            ammunition_source_id: self.ammunition.source_id.clone(),
            auto_eject: self.ammunition.auto_eject,
        }
    }

    /// No charge has been spent since it was seated
    pub fn is_full(&self) -> bool {
        self.remaining == self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Shots left before the weapon needs a new magazine. A manual
    /// magazine has to be swapped before its reserve can be used.
    pub fn shots(&self) -> u32 {
        if self.ammunition.auto_eject {
            self.remaining + self.reserve * self.capacity
        } else {
            self.remaining
        }
    }

    /// Spend charges, returning the ammunition fired. An auto-eject
    /// magazine rolls over to a reserve unit when the seated one runs dry.
    pub fn spend(&mut self, units: u32) -> Ammunition {
        let mut spent = 0;
        while spent < units && self.remaining > 0 {
            self.remaining -= 1;
            spent += 1;
            if self.remaining == 0 && self.ammunition.auto_eject && self.reserve > 0 {
                self.reserve -= 1;
                self.remaining = self.capacity;
            }
        }
        if let Some(uses) = self.ammunition.uses.as_mut() {
            uses.value = self.remaining;
        }
        self.ammunition.with_quantity(spent)
    }

    /// Spent with nothing behind it, and set to drop out on its own
    pub fn is_ejected(&self) -> bool {
        self.is_empty() && self.reserve == 0 && self.ammunition.auto_eject
    }

    /// The seated unit and its reserve as one stack
    pub fn to_stack(&self) -> Ammunition {
        self.ammunition.with_quantity(1 + self.reserve)
    }
}

/// Rounds in a multi-chamber weapon, one entry per ammunition type.
///
/// Entries keep the order in which each type was first loaded. Topping up a
/// type adds to its entry in place, so the chamber cycle is stable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CapacityAmmunition {
    pub chambers: Vec<Ammunition>,
}

impl CapacityAmmunition {
    pub fn loaded(&self) -> u32 {
        self.chambers.iter().map(|c| c.quantity).sum()
    }

    pub fn load(&mut self, round: Ammunition) {
        match self.chambers.iter().position(|c| c.is_same_type(&round)) {
            Some(index) => self.chambers[index].quantity += round.quantity,
            None => self.chambers.push(round),
        }
    }

    pub fn chamber(&self, ammunition: &Ammunition) -> Option<&Ammunition> {
        self.chambers.iter().find(|c| c.is_same_type(ammunition))
    }

    /// The type added to the weapon last
    pub fn newest_type(&self) -> Option<&Ammunition> {
        self.chambers.last()
    }

    /// Take the whole entry of one ammunition type out of the weapon
    pub fn remove(&mut self, ammunition: &Ammunition) -> Option<Ammunition> {
        let index = self
            .chambers
            .iter()
            .position(|c| c.is_same_type(ammunition))?;
        Some(self.chambers.remove(index))
    }

    /// Fire `units` rounds of one type; empty entries are dropped
    pub fn fire(&mut self, ammunition: &Ammunition, units: u32) -> Option<Ammunition> {
        let index = self
            .chambers
            .iter()
            .position(|c| c.is_same_type(ammunition))?;
        let chamber = &mut self.chambers[index];
        let fired = chamber.with_quantity(units.min(chamber.quantity));
        chamber.quantity -= fired.quantity;
        if chamber.quantity == 0 {
            self.chambers.remove(index);
        }
        Some(fired)
    }
}

/// Rounds in a single-shot or double-barrel weapon; one ammunition type.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardAmmunition {
    /// Quantity is the number of rounds loaded
    pub ammunition: Ammunition,
    /// Conjured by magic rather than taken from the inventory
    pub conjured: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadedAmmunition {
    Magazine(Magazine),
    Capacity(CapacityAmmunition),
    Standard(StandardAmmunition),
}

impl LoadedAmmunition {
    /// Slots of capacity this entry occupies
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Magazine(_) => 1,
            Self::Capacity(chambers) => chambers.loaded(),
            Self::Standard(standard) => standard.ammunition.quantity,
        }
    }

    /// Shots this entry can still fire
    pub fn remaining_uses(&self) -> u32 {
        match self {
            Self::Magazine(magazine) => magazine.shots(),
            Self::Capacity(chambers) => chambers.loaded(),
            Self::Standard(standard) => standard.ammunition.quantity,
        }
    }

    pub fn is_conjured(&self) -> bool {
        matches!(self, Self::Standard(StandardAmmunition { conjured: true, .. }))
    }

    /// Every ammunition type held by this entry
    pub fn ammunition(&self) -> Vec<&Ammunition> {
        match self {
            Self::Magazine(magazine) => vec![&magazine.ammunition],
            Self::Capacity(chambers) => chambers.chambers.iter().collect(),
            Self::Standard(standard) => vec![&standard.ammunition],
        }
    }
}
