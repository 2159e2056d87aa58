//! Conjure bullet use case.
//!
//! Loads a magical round into an equipped firearm. The round lives in an
//! effect, not the inventory, and is gone once fired or unloaded.

use ranged_combat_domain::{slugs, ActorId, ItemId, Weapon};

use super::markers;
use super::selection::{select_weapon, Choice};
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::Updates;

const FIREARM_GROUP: &str = "firearm";

pub struct ConjureBullet {
    ports: ActionPorts,
}

impl ConjureBullet {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Conjure a round into `weapon_id`, or into a firearm the user picks.
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: Option<ItemId>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        if !actor.has_ability(slugs::CONJURE_BULLET) {
            return Ok(self.ports.reject(actor_id, Precondition::CannotConjure));
        }
        let (_, weapons) = self.ports.loadout(&actor)?;

        let already_conjured = weapons
            .iter()
            .find(|w| Some(w.id) == weapon_id && w.conjured_round().is_some())
            .map(|w| w.name.clone());
        let candidates: Vec<Weapon> = weapons.into_iter().filter(can_hold_conjured).collect();
        let mut weapon = match select_weapon(
            &self.ports,
            &actor,
            candidates,
            weapon_id,
            "Select a firearm to conjure a bullet into",
        )
        .await
        {
            Choice::Picked(weapon) => weapon,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                let reason = match already_conjured {
                    Some(weapon) => Precondition::AlreadyConjured { weapon },
                    None => Precondition::NoFirearmWithRoom,
                };
                return Ok(self.ports.reject(actor_id, reason));
            }
        };

        let mut updates = Updates::new(actor_id);
        markers::conjure(&mut weapon, &mut updates)?;
        updates.floaty_text("Conjured bullet", true);

        let summary = self.ports.commit(updates).await?;
        tracing::info!(actor_id = %actor_id, weapon = %weapon.name, "Conjured bullet");
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}

/// Equipped firearms loaded round by round, with a free chamber
pub(super) fn can_hold_conjured(weapon: &Weapon) -> bool {
    weapon.is_equipped
        && weapon.group.as_deref() == Some(FIREARM_GROUP)
        && weapon.requires_loading
        && !weapon.is_repeating
        && weapon.remaining_capacity > 0
        && weapon.conjured_round().is_none()
}
