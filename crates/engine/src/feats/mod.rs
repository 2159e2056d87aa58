//! Feat modules.
//!
//! Each feat is a hook subscriber. None of them is known to the actions;
//! they are wired onto the bus once, at composition.

mod ammunition_effects;
mod crossbow;
mod fake_out;

pub use ammunition_effects::AmmunitionEffects;
pub use crossbow::{CrossbowAce, CrossbowCrackShot};
pub use fake_out::FakeOut;

use std::sync::Arc;

use ranged_combat_domain::{
    Actor, EffectTemplate, ItemChange, ItemId, PersistedState, TargetedEffectState,
    FLAG_NAMESPACE,
};

use crate::entities::updates::UpdateCommand;
use crate::entities::Updates;
use crate::hooks::{HookBus, HookError, HookKey};

/// Register every feat on the bus.
pub fn register_all(bus: &mut HookBus) {
    let ammunition_effects = Arc::new(AmmunitionEffects);
    bus.register(HookKey::WeaponAttack, ammunition_effects.clone());
    bus.register(HookKey::AmmunitionFire, ammunition_effects.clone());
    bus.register(HookKey::WeaponDamage, ammunition_effects);

    let ace = Arc::new(CrossbowAce);
    bus.register(HookKey::Reload, ace.clone());
    bus.register(HookKey::PostAction, ace);

    let crack_shot = Arc::new(CrossbowCrackShot);
    bus.register(HookKey::Reload, crack_shot.clone());
    bus.register(HookKey::WeaponDamage, crack_shot);

    bus.register(HookKey::AuxiliaryActions, Arc::new(FakeOut));
}

/// Ids of this template's effects on the actor, with the weapon they target
fn targeted_effects(actor: &Actor, template: EffectTemplate) -> Vec<(ItemId, ItemId)> {
    actor
        .effects()
        .filter(|e| EffectTemplate::of(e) == Some(template))
        .filter_map(|e| match TargetedEffectState::read(e) {
            Ok(state) => Some((e.id, state.target_id)),
            Err(err) => {
                tracing::warn!(actor_id = %actor.id, effect = %e.name, error = %err, "Unreadable feat effect");
                None
            }
        })
        .collect()
}

/// Weapons that queued creates of this template will target
fn pending_targets(updates: &Updates, template: EffectTemplate) -> Vec<ItemId> {
    let source = template.source_id();
    updates
        .commands()
        .iter()
        .filter_map(|command| match command {
            UpdateCommand::Defer(deferred) if deferred.template == source => Some(&deferred.patch),
            _ => None,
        })
        .flat_map(|patch| patch.changes.iter())
        .filter_map(|change| match change {
            ItemChange::Flag { key, value } if key == FLAG_NAMESPACE => {
                TargetedEffectState::from_value(value).ok()
            }
            _ => None,
        })
        .map(|state| state.target_id)
        .collect()
}

/// Queue a template effect aimed at a weapon
fn apply_targeted(
    updates: &mut Updates,
    template: EffectTemplate,
    weapon_id: ItemId,
    mut changes: Vec<ItemChange>,
    subscriber: &'static str,
) -> Result<ItemId, HookError> {
    let state = TargetedEffectState::new(weapon_id)
        .to_change()
        .map_err(|e| HookError::failed(subscriber, e))?;
    changes.push(state);
    Ok(updates.create_from_template(template.source_id(), changes, template.fallback()))
}
