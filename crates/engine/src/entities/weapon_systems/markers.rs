//! Reading the effects every weapon system attaches to weapons.

use ranged_combat_domain::{
    Actor, Ammunition, ChamberState, EffectTemplate, Item, LoadedAmmunition, LoadedRoundState,
    MagazineState, PersistedState, StandardAmmunition, StateError, TargetedEffectState, Weapon,
};

/// Record which marker effects belong to `weapon`, read the chamber
/// selection and add a conjured round if one is present.
pub(super) fn read_markers(actor: &Actor, weapon: &mut Weapon) {
    for effect in actor.effects() {
        let Some(template) = EffectTemplate::of(effect) else {
            continue;
        };
        if let Err(e) = read_marker(template, effect, weapon) {
            tracing::warn!(
                actor_id = %actor.id,
                effect = %effect.name,
                error = %e,
                "Skipping unreadable weapon marker"
            );
        }
    }
}

fn read_marker(
    template: EffectTemplate,
    effect: &Item,
    weapon: &mut Weapon,
) -> Result<(), StateError> {
    match template {
        EffectTemplate::Loaded => {
            let state = LoadedRoundState::read(effect)?;
            if state.target_id == weapon.id {
                if weapon.is_repeating {
                    weapon.markers.cocked = Some(effect.id);
                } else {
                    weapon.markers.loaded = Some(effect.id);
                }
            }
        }
        EffectTemplate::MagazineLoaded => {
            let state = MagazineState::read(effect)?;
            if state.target_id == weapon.id {
                weapon.markers.magazine = Some(effect.id);
            }
        }
        EffectTemplate::ChamberLoaded => {
            let state = ChamberState::read(effect)?;
            if state.target_id == weapon.id {
                weapon.markers.chamber = Some(effect.id);
                weapon.selected_chamber = Some(state.ammunition);
            }
        }
        EffectTemplate::ConjuredRound => {
            let state = TargetedEffectState::read(effect)?;
            if state.target_id == weapon.id {
                weapon.markers.conjured = Some(effect.id);
                weapon
                    .loaded_ammunition
                    .push(LoadedAmmunition::Standard(StandardAmmunition {
                        ammunition: Ammunition::conjured(
                            effect.id,
                            weapon.ammunition_category.clone(),
                        ),
                        conjured: true,
                    }));
            }
        }
        EffectTemplate::AmmunitionEffect
        | EffectTemplate::CrossbowAce
        | EffectTemplate::CrossbowCrackShot => {}
    }
    Ok(())
}

/// Copy rule data from the inventory stack a persisted reference points at
pub(super) fn hydrate(actor: &Actor, mut ammunition: Ammunition) -> Ammunition {
    let stack = actor
        .ammunition()
        .filter_map(Ammunition::from_item)
        .find(|a| a.id == ammunition.id)
        .or_else(|| {
            actor
                .ammunition()
                .filter_map(Ammunition::from_item)
                .find(|a| a.is_same_type(&ammunition))
        });
    if let Some(stack) = stack {
        ammunition.rules = stack.rules;
        ammunition.description_text = stack.description_text;
        if ammunition.category.is_none() {
            ammunition.category = stack.category;
        }
    }
    ammunition
}
