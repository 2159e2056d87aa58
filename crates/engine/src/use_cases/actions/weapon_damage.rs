//! Weapon damage use case.
//!
//! Runs when the host rolls damage with a weapon so subscribers can clean
//! up effects that only last until the hit lands.

use ranged_combat_domain::{ActorId, ItemId};

use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::Updates;
use crate::hooks::HookEvent;

pub struct WeaponDamage {
    ports: ActionPorts,
}

impl WeaponDamage {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Publish `weapon-damage` for `weapon_id` against `target`.
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: ItemId,
        target: Option<String>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (_, weapons) = self.ports.loadout(&actor)?;
        let Some(weapon) = weapons.into_iter().find(|w| w.id == weapon_id) else {
            return Ok(self
                .ports
                .reject(actor_id, Precondition::WeaponNotFound(weapon_id)));
        };

        let mut updates = Updates::new(actor_id);
        self.ports
            .hooks
            .publish(&mut HookEvent::WeaponDamage {
                actor: &actor,
                weapon: &weapon,
                target: target.as_deref(),
                updates: &mut updates,
            })
            .await;

        let summary = self.ports.commit(updates).await?;
        tracing::debug!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            target = target.as_deref().unwrap_or("none"),
            "Processed weapon damage"
        );
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}
