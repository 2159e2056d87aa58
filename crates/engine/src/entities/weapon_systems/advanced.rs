use ranged_combat_domain::{
    Actor, AmmoRef, Ammunition, CapacityAmmunition, EffectTemplate, EntityKind, Item, ItemChange,
    LoadedAmmunition, LoadedRoundState, Magazine, MagazineState, PersistedState,
    StandardAmmunition, StateError, Weapon,
};

use super::markers::hydrate;
use super::{AmmunitionTracking, RoundCustody, WeaponSystem};
use crate::entities::updates::Updates;
use crate::infrastructure::app_settings::ActorCapabilities;

/// Loaded rounds and magazines recorded in effect flags
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedSystem;

impl WeaponSystem for AdvancedSystem {
    fn tracking(&self) -> AmmunitionTracking {
        AmmunitionTracking::Advanced
    }

    fn claims(&self, capabilities: &ActorCapabilities) -> bool {
        !capabilities.host_subitem_ammunition && capabilities.advanced_ammunition
    }

    fn round_custody(&self) -> RoundCustody {
        RoundCustody::Weapon
    }

    fn read_loaded(&self, actor: &Actor, _item: &Item, weapon: &mut Weapon) {
        if let Some(effect) = weapon.markers.magazine.and_then(|id| actor.item(id)) {
            match MagazineState::read(effect) {
                Ok(state) => {
                    let mut magazine =
                        Magazine::from_state(&state, weapon.ammunition_category.clone());
                    magazine.ammunition = hydrate(actor, magazine.ammunition);
                    weapon
                        .loaded_ammunition
                        .push(LoadedAmmunition::Magazine(magazine));
                }
                Err(e) => tracing::warn!(
                    actor_id = %actor.id,
                    weapon = %weapon.name,
                    error = %e,
                    "Ignoring unreadable magazine"
                ),
            }
        }

        let Some(effect) = weapon.markers.loaded.and_then(|id| actor.item(id)) else {
            return;
        };
        let state = match LoadedRoundState::read(effect) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    actor_id = %actor.id,
                    weapon = %weapon.name,
                    error = %e,
                    "Ignoring unreadable loaded rounds"
                );
                return;
            }
        };

        let category = weapon.ammunition_category.clone();
        let rounds: Vec<Ammunition> = state
            .refs()
            .iter()
            .map(|reference| hydrate(actor, Ammunition::from_ref(reference, category.clone())))
            .collect();

        if weapon.is_capacity {
            weapon
                .loaded_ammunition
                .push(LoadedAmmunition::Capacity(CapacityAmmunition { chambers: rounds }));
        } else if let Some(first) = rounds.into_iter().next() {
            // Single references only carry a count for double-barrel weapons
            let quantity = state
                .loaded_chambers
                .or(first_quantity(state.refs()))
                .unwrap_or(1);
            weapon
                .loaded_ammunition
                .push(LoadedAmmunition::Standard(StandardAmmunition {
                    ammunition: first.with_quantity(quantity),
                    conjured: false,
                }));
        }
    }

    fn write_loaded(&self, weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError> {
        if weapon.is_repeating {
            return write_magazine(weapon, updates);
        }

        let loaded: Vec<&Ammunition> = weapon
            .loaded_types()
            .into_iter()
            .filter(|a| a.quantity > 0)
            .collect();
        if loaded.is_empty() {
            if let Some(id) = weapon.markers.loaded.take() {
                updates.delete(EntityKind::Effect, id);
            }
            return Ok(());
        }

        let state = if weapon.is_capacity {
            LoadedRoundState::chambers(
                weapon.id,
                loaded.iter().map(|a| a.to_ref(Some(a.quantity))).collect(),
                weapon.capacity,
            )
        } else {
            let round = loaded[0];
            LoadedRoundState::single(weapon.id, round.to_ref(None), round.quantity, weapon.capacity)
        };
        let name = loaded_name(EffectTemplate::Loaded, &loaded);
        let changes = vec![ItemChange::Name(name), state.to_change()?];
        let id = updates.upsert_effect(weapon.markers.loaded, EffectTemplate::Loaded, changes);
        weapon.markers.loaded = Some(id);
        Ok(())
    }
}

fn write_magazine(weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError> {
    let Some(magazine) = weapon.magazine() else {
        if let Some(id) = weapon.markers.magazine.take() {
            updates.delete(EntityKind::Effect, id);
        }
        return Ok(());
    };
    let state = magazine.to_state(weapon.id);
    let name = loaded_name(EffectTemplate::MagazineLoaded, &[&magazine.ammunition]);
    let changes = vec![ItemChange::Name(name), state.to_change()?];
    let id = updates.upsert_effect(
        weapon.markers.magazine,
        EffectTemplate::MagazineLoaded,
        changes,
    );
    weapon.markers.magazine = Some(id);
    Ok(())
}

fn first_quantity(refs: &[AmmoRef]) -> Option<u32> {
    refs.first().and_then(|r| r.quantity)
}

/// "Loaded (Bolt)", or just the template name when types are mixed
fn loaded_name(template: EffectTemplate, loaded: &[&Ammunition]) -> String {
    match loaded {
        [only] => format!("{} ({})", template.default_name(), only.name),
        _ => template.default_name().to_string(),
    }
}
