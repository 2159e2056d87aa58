//! Marker effects shared by every weapon system: the selected chamber,
//! the cocked state of a repeater and conjured rounds.

use ranged_combat_domain::{
    AmmoRef, ChamberState, EffectTemplate, EntityKind, ItemChange, LoadedRoundState,
    PersistedState, StateError, TargetedEffectState, Weapon,
};

use crate::entities::Updates;

pub(super) fn select_chamber(
    weapon: &mut Weapon,
    ammunition: AmmoRef,
    updates: &mut Updates,
) -> Result<(), StateError> {
    let name = format!(
        "{} ({})",
        EffectTemplate::ChamberLoaded.default_name(),
        ammunition.name
    );
    let state = ChamberState {
        target_id: weapon.id,
        ammunition: ammunition.clone(),
    };
    let changes = vec![ItemChange::Name(name), state.to_change()?];
    let id = updates.upsert_effect(weapon.markers.chamber, EffectTemplate::ChamberLoaded, changes);
    weapon.markers.chamber = Some(id);
    updates.floaty_text(format!("Chamber: {}", ammunition.name), true);
    weapon.selected_chamber = Some(ammunition);
    Ok(())
}

pub(super) fn clear_chamber(weapon: &mut Weapon, updates: &mut Updates) {
    if let Some(id) = weapon.markers.chamber.take() {
        updates.delete(EntityKind::Effect, id);
    }
    weapon.selected_chamber = None;
}

pub(super) fn cock(weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError> {
    let changes = vec![
        ItemChange::Name(format!(
            "{} ({})",
            EffectTemplate::Loaded.default_name(),
            weapon.name
        )),
        LoadedRoundState::cocked(weapon.id).to_change()?,
    ];
    let id = updates.upsert_effect(weapon.markers.cocked, EffectTemplate::Loaded, changes);
    weapon.markers.cocked = Some(id);
    Ok(())
}

pub(super) fn uncock(weapon: &mut Weapon, updates: &mut Updates) {
    if let Some(id) = weapon.markers.cocked.take() {
        updates.delete(EntityKind::Effect, id);
    }
}

pub(super) fn conjure(weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError> {
    let changes = vec![TargetedEffectState::new(weapon.id).to_change()?];
    let id = updates.upsert_effect(None, EffectTemplate::ConjuredRound, changes);
    weapon.markers.conjured = Some(id);
    Ok(())
}

/// Destroy the conjured round; it never returns to the inventory
pub(super) fn remove_conjured(weapon: &mut Weapon, updates: &mut Updates) {
    if let Some(id) = weapon.markers.conjured.take() {
        updates.delete(EntityKind::Effect, id);
    }
    weapon.loaded_ammunition.retain(|l| !l.is_conjured());
}
