//! Switch ammunition use case.
//!
//! Changes the weapon's preferred stack. No rounds move.

use ranged_combat_domain::{ActorId, InventoryAmmunition, ItemChange, ItemId, Weapon};

use super::selection::{select_ammunition, select_weapon, Choice};
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::Updates;

pub struct SwitchAmmunition {
    ports: ActionPorts,
}

impl SwitchAmmunition {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Make `ammunition_id` the weapon's preferred stack. Either id may be
    /// left out and picked by the user.
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: Option<ItemId>,
        ammunition_id: Option<ItemId>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (_, weapons) = self.ports.loadout(&actor)?;

        let candidates: Vec<Weapon> = weapons
            .into_iter()
            .filter(|w| !alternatives(w).is_empty())
            .collect();
        let weapon = match select_weapon(
            &self.ports,
            &actor,
            candidates,
            weapon_id,
            "Select a weapon to switch ammunition for",
        )
        .await
        {
            Choice::Picked(weapon) => weapon,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                let reason = match weapon_id {
                    Some(id) => Precondition::WeaponNotFound(id),
                    None => Precondition::NoSwitchableWeapon,
                };
                return Ok(self.ports.reject(actor_id, reason));
            }
        };

        let mut options = alternatives(&weapon);
        if let Some(id) = ammunition_id {
            options.retain(|a| a.ammunition.id == id);
        }
        let stack = match select_ammunition(
            &self.ports,
            &actor,
            &weapon,
            options,
            "Select ammunition to use",
        )
        .await
        {
            Choice::Picked(stack) => stack.ammunition,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                return Ok(self.ports.reject(
                    actor_id,
                    Precondition::NoOtherAmmunition {
                        weapon: weapon.name.clone(),
                    },
                ))
            }
        };

        let mut updates = Updates::new(actor_id);
        updates.update_item(weapon.id, vec![ItemChange::SelectedAmmo(Some(stack.id))]);
        updates.floaty_text(format!("{}: {}", weapon.name, stack.name), true);

        let summary = self.ports.commit(updates).await?;
        tracing::info!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            ammunition = %stack.name,
            "Switched ammunition"
        );
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}

/// Available stacks other than the one already selected
pub(super) fn alternatives(weapon: &Weapon) -> Vec<InventoryAmmunition> {
    weapon
        .available_ammunition()
        .filter(|a| Some(a.ammunition.id) != weapon.selected_ammunition_id)
        .cloned()
        .collect()
}
