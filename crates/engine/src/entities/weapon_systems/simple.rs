use ranged_combat_domain::{
    Actor, AmmoRef, Ammunition, CapacityAmmunition, EffectTemplate, EntityKind, Item, ItemChange,
    ItemId, LoadedAmmunition, LoadedRoundState, Magazine, PersistedState, StandardAmmunition,
    StateError, Weapon, DEFAULT_ITEM_IMG,
};

use super::markers::hydrate;
use super::{AmmunitionTracking, RoundCustody, WeaponSystem};
use crate::entities::updates::Updates;
use crate::infrastructure::app_settings::ActorCapabilities;

/// Only a chamber count is recorded; rounds are spent from the preferred
/// inventory stack when fired.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSystem;

impl WeaponSystem for SimpleSystem {
    fn tracking(&self) -> AmmunitionTracking {
        AmmunitionTracking::Simple
    }

    fn claims(&self, capabilities: &ActorCapabilities) -> bool {
        !capabilities.host_subitem_ammunition && !capabilities.advanced_ammunition
    }

    fn round_custody(&self) -> RoundCustody {
        RoundCustody::Inventory
    }

    fn supports_magazines(&self) -> bool {
        false
    }

    fn read_loaded(&self, actor: &Actor, _item: &Item, weapon: &mut Weapon) {
        if weapon.is_repeating {
            // The top unit of the preferred stack is the seated magazine
            let magazine = weapon
                .preferred_ammunition()
                .map(|stack| Magazine::from_stack(&stack.ammunition));
            if let Some(magazine) = magazine {
                weapon
                    .loaded_ammunition
                    .push(LoadedAmmunition::Magazine(magazine));
            }
            return;
        }

        let Some(marker) = weapon.markers.loaded else {
            return;
        };
        let state = match actor.item(marker).map(LoadedRoundState::read) {
            Some(Ok(state)) => state,
            Some(Err(e)) => {
                tracing::warn!(
                    actor_id = %actor.id,
                    weapon = %weapon.name,
                    error = %e,
                    "Ignoring unreadable chamber count"
                );
                return;
            }
            None => return,
        };
        let count = state
            .loaded_chambers
            .unwrap_or_else(|| state.refs().iter().map(|r| r.quantity.unwrap_or(1)).sum())
            .max(1);

        let round = projected_round(actor, weapon, &state, marker).with_quantity(count);
        if weapon.is_capacity {
            weapon
                .loaded_ammunition
                .push(LoadedAmmunition::Capacity(CapacityAmmunition {
                    chambers: vec![round],
                }));
        } else {
            weapon
                .loaded_ammunition
                .push(LoadedAmmunition::Standard(StandardAmmunition {
                    ammunition: round,
                    conjured: false,
                }));
        }
    }

    fn write_loaded(&self, weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError> {
        if weapon.is_repeating {
            return Ok(());
        }
        let loaded = weapon
            .loaded_ammunition
            .iter()
            .filter(|l| !l.is_conjured())
            .map(|l| l.quantity())
            .sum::<u32>();
        if loaded == 0 {
            if let Some(id) = weapon.markers.loaded.take() {
                updates.delete(EntityKind::Effect, id);
            }
            return Ok(());
        }

        let state = LoadedRoundState::chamber_count(weapon.id, loaded, weapon.capacity);
        let name = if weapon.capacity > 1 {
            format!(
                "{} ({loaded}/{})",
                EffectTemplate::Loaded.default_name(),
                weapon.capacity
            )
        } else {
            EffectTemplate::Loaded.default_name().to_string()
        };
        let changes = vec![ItemChange::Name(name), state.to_change()?];
        let id = updates.upsert_effect(weapon.markers.loaded, EffectTemplate::Loaded, changes);
        weapon.markers.loaded = Some(id);
        Ok(())
    }
}

/// What the counted rounds are shown as: the preferred stack, else the
/// reference stored by another tracking mode, else a placeholder.
fn projected_round(
    actor: &Actor,
    weapon: &Weapon,
    state: &LoadedRoundState,
    marker: ItemId,
) -> Ammunition {
    if let Some(stack) = weapon.preferred_ammunition() {
        return stack.ammunition.clone();
    }
    let category = weapon.ammunition_category.clone();
    match state.refs().first() {
        Some(reference) => hydrate(actor, Ammunition::from_ref(reference, category)),
        None => Ammunition::from_ref(
            &AmmoRef {
                name: format!("{} round", weapon.name),
                img: DEFAULT_ITEM_IMG.to_string(),
                id: marker,
                source_id: None,
                quantity: None,
            },
            category,
        ),
    }
}
