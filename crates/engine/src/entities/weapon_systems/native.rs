use ranged_combat_domain::{
    Actor, Ammunition, CapacityAmmunition, Item, ItemChange, LoadedAmmunition, Magazine,
    StandardAmmunition, StateError, Weapon,
};

use super::{AmmunitionTracking, RoundCustody, WeaponSystem};
use crate::entities::updates::Updates;
use crate::infrastructure::app_settings::ActorCapabilities;

/// Loaded ammunition kept by the host as sub-items of the weapon
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeSystem;

impl WeaponSystem for NativeSystem {
    fn tracking(&self) -> AmmunitionTracking {
        AmmunitionTracking::Native
    }

    fn claims(&self, capabilities: &ActorCapabilities) -> bool {
        capabilities.host_subitem_ammunition
    }

    fn round_custody(&self) -> RoundCustody {
        RoundCustody::Weapon
    }

    fn read_loaded(&self, _actor: &Actor, item: &Item, weapon: &mut Weapon) {
        let Some(data) = item.as_weapon() else {
            return;
        };
        let loaded: Vec<Ammunition> = data
            .subitems
            .iter()
            .filter_map(Ammunition::from_item)
            .filter(|a| a.quantity > 0)
            .collect();
        if loaded.is_empty() {
            return;
        }

        if weapon.is_repeating {
            for stack in &loaded {
                weapon
                    .loaded_ammunition
                    .push(LoadedAmmunition::Magazine(Magazine::from_loaded_stack(stack)));
            }
        } else if weapon.is_capacity {
            weapon
                .loaded_ammunition
                .push(LoadedAmmunition::Capacity(CapacityAmmunition { chambers: loaded }));
        } else {
            for ammunition in loaded {
                weapon
                    .loaded_ammunition
                    .push(LoadedAmmunition::Standard(StandardAmmunition {
                        ammunition,
                        conjured: false,
                    }));
            }
        }
    }

    fn write_loaded(&self, weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError> {
        let subitems: Vec<Item> = weapon
            .loaded_ammunition
            .iter()
            .filter(|l| !l.is_conjured())
            .flat_map(|l| match l {
                LoadedAmmunition::Magazine(magazine) => vec![magazine.to_stack().to_item()],
                other => other
                    .ammunition()
                    .into_iter()
                    .filter(|a| a.quantity > 0)
                    .map(Ammunition::to_item)
                    .collect(),
            })
            .collect();
        updates.update_item(weapon.id, vec![ItemChange::Subitems(subitems)]);
        Ok(())
    }
}
