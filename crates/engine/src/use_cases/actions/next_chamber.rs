//! Select next chamber use case.
//!
//! Cycles which loaded ammunition type a capacity weapon fires next.

use ranged_combat_domain::{ActorId, ItemId, Weapon};

use super::markers;
use super::selection::{select_weapon, Choice};
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::Updates;

pub struct NextChamber {
    ports: ActionPorts,
}

impl NextChamber {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Select the chamber after the current one, wrapping around.
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: Option<ItemId>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (_, weapons) = self.ports.loadout(&actor)?;

        let candidates: Vec<Weapon> = weapons
            .into_iter()
            .filter(|w| w.is_capacity && chamber_types(w) > 1)
            .collect();
        let mut weapon = match select_weapon(
            &self.ports,
            &actor,
            candidates,
            weapon_id,
            "Select a weapon to switch chambers",
        )
        .await
        {
            Choice::Picked(weapon) => weapon,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                return Ok(self.ports.reject(actor_id, Precondition::NoMixedChambers));
            }
        };

        let Some(chambers) = weapon.chambers().map(|c| c.chambers.clone()) else {
            return Ok(self.ports.reject(actor_id, Precondition::NoMixedChambers));
        };
        let current = weapon
            .selected_chamber
            .as_ref()
            .and_then(|r| chambers.iter().position(|c| c.matches_ref(r)));
        let next = current.map_or(0, |i| (i + 1) % chambers.len());
        let Some(target) = chambers.get(next) else {
            return Ok(self.ports.reject(actor_id, Precondition::NoMixedChambers));
        };

        let mut updates = Updates::new(actor_id);
        markers::select_chamber(&mut weapon, target.to_ref(None), &mut updates)?;

        let summary = self.ports.commit(updates).await?;
        tracing::info!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            chamber = %target.name,
            "Selected next chamber"
        );
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}

fn chamber_types(weapon: &Weapon) -> usize {
    weapon.chambers().map_or(0, |c| c.chambers.len())
}
