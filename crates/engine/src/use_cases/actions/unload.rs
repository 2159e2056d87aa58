//! Unload use case.
//!
//! Reverses a reload. Capacity weapons give back one chamber type at a
//! time: the selected chamber, else the type added last.

use ranged_combat_domain::{ActorId, Ammunition, ItemId, LoadedAmmunition, Weapon};

use super::inventory::AmmunitionPool;
use super::markers;
use super::selection::{select_weapon, Choice};
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::{RoundCustody, Updates};

pub struct Unload {
    ports: ActionPorts,
}

impl Unload {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Execute the unload use case.
    ///
    /// # Arguments
    /// * `actor_id` - The actor holding the weapon
    /// * `weapon_id` - The weapon to unload, or `None` to pick a loaded one
    ///
    /// # Returns
    /// * `Ok(ActionOutcome::Completed)` - Rounds or magazine taken out
    /// * `Ok(ActionOutcome::Cancelled)` - The user kept a conjured round
    /// * `Err(ActionError)` - The host could not be read or written
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: Option<ItemId>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (system, weapons) = self.ports.loadout(&actor)?;
        let tracks_magazines = system.supports_magazines();

        let candidates: Vec<Weapon> = weapons
            .into_iter()
            .filter(|w| w.is_loaded() && (tracks_magazines || w.magazine().is_none()))
            .collect();
        let mut weapon = match select_weapon(
            &self.ports,
            &actor,
            candidates,
            weapon_id,
            "Select a weapon to unload",
        )
        .await
        {
            Choice::Picked(weapon) => weapon,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                let reason = match weapon_id {
                    Some(id) => Precondition::WeaponNotFound(id),
                    None => Precondition::NoLoadedWeapon,
                };
                return Ok(self.ports.reject(actor_id, reason));
            }
        };

        let mut updates = Updates::new(actor_id);

        if weapon.conjured_round().is_some() {
            let confirmed = self
                .ports
                .prompt
                .confirm(
                    actor_id,
                    "Unload conjured bullet".to_string(),
                    format!(
                        "The conjured bullet in {} will be destroyed. Unload it?",
                        weapon.name
                    ),
                )
                .await;
            if !confirmed {
                return Ok(ActionOutcome::Cancelled);
            }
            markers::remove_conjured(&mut weapon, &mut updates);
            updates.floaty_text("Conjured bullet dispelled", false);
        } else {
            let mut pool = AmmunitionPool::new(&actor);
            let returns = system.round_custody() == RoundCustody::Weapon;
            for rounds in take_out(&mut weapon, &mut updates) {
                if returns {
                    pool.return_rounds(&mut updates, &rounds);
                }
                updates.floaty_text(format!("Unloaded {}", rounds.name), false);
            }
            if let Some(magazine) = weapon.magazine().cloned() {
                pool.return_magazine(&mut updates, &magazine);
                weapon
                    .loaded_ammunition
                    .retain(|l| !matches!(l, LoadedAmmunition::Magazine(_)));
                markers::uncock(&mut weapon, &mut updates);
                updates.floaty_text(
                    format!(
                        "Unloaded {} ({}/{})",
                        magazine.ammunition.name, magazine.remaining, magazine.capacity
                    ),
                    false,
                );
            }
        }

        system.write_loaded(&mut weapon, &mut updates)?;
        weapon.refresh_derived();
        tracing::debug!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            loaded = weapon.loaded_quantity(),
            "Unloaded weapon"
        );

        let summary = self.ports.commit(updates).await?;
        tracing::info!(actor_id = %actor_id, weapon = %weapon.name, "Unloaded weapon");
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}

/// Remove the rounds an unload gives back, leaving magazines alone
fn take_out(weapon: &mut Weapon, updates: &mut Updates) -> Vec<Ammunition> {
    if weapon.is_capacity {
        let selected = weapon.selected_chamber.clone();
        let Some(chambers) = weapon.chambers_mut() else {
            return Vec::new();
        };
        let index = selected
            .as_ref()
            .and_then(|r| chambers.chambers.iter().position(|c| c.matches_ref(r)))
            .or_else(|| chambers.chambers.len().checked_sub(1));
        let Some(index) = index else {
            return Vec::new();
        };
        let removed = chambers.chambers.remove(index);
        let clears_selection = selected.is_some_and(|r| removed.matches_ref(&r));
        weapon.prune_loaded();
        if clears_selection {
            markers::clear_chamber(weapon, updates);
        }
        return vec![removed];
    }

    let rounds = weapon.standard().map(|s| s.ammunition.clone());
    weapon
        .loaded_ammunition
        .retain(|l| !matches!(l, LoadedAmmunition::Standard(s) if !s.conjured));
    rounds.into_iter().collect()
}
