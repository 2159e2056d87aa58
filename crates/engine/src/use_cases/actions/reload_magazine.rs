//! Reload magazine use case.
//!
//! Swaps the magazine of a repeating weapon. The old magazine goes back to
//! the inventory: whole if unspent, as a partial stack if some charges are
//! left, not at all if empty.

use ranged_combat_domain::{ActorId, ItemId, LoadedAmmunition, Weapon};

use super::inventory::AmmunitionPool;
use super::markers;
use super::selection::{select_ammunition, select_weapon, Choice};
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::Updates;
use crate::hooks::HookEvent;

pub struct ReloadMagazine {
    ports: ActionPorts,
}

impl ReloadMagazine {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Execute the reload magazine use case.
    ///
    /// # Arguments
    /// * `actor_id` - The actor holding the weapon
    /// * `weapon_id` - The repeating weapon, or `None` to pick one
    ///
    /// # Returns
    /// * `Ok(ActionOutcome::Completed)` - A magazine was seated
    /// * `Ok(ActionOutcome::Rejected)` - No weapon or no better magazine
    /// * `Err(ActionError)` - The host could not be read or written
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: Option<ItemId>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (system, weapons) = self.ports.loadout(&actor)?;

        let candidates: Vec<Weapon> = weapons
            .into_iter()
            .filter(|w| w.is_equipped && w.is_repeating)
            .collect();
        let mut weapon = match select_weapon(
            &self.ports,
            &actor,
            candidates,
            weapon_id,
            "Select a weapon to load a magazine into",
        )
        .await
        {
            Choice::Picked(weapon) => weapon,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                let reason = match weapon_id {
                    Some(id) => Precondition::WeaponNotFound(id),
                    None => Precondition::NoMagazineWeapon,
                };
                return Ok(self.ports.reject(actor_id, reason));
            }
        };

        if !system.supports_magazines() {
            return Ok(self.ports.reject(
                actor_id,
                Precondition::MagazinesUntracked {
                    weapon: weapon.name.clone(),
                },
            ));
        }

        let candidates = weapon.available_ammunition().cloned().collect();
        let stack = match select_ammunition(
            &self.ports,
            &actor,
            &weapon,
            candidates,
            "Select a magazine",
        )
        .await
        {
            Choice::Picked(stack) => stack.ammunition,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                return Ok(self.ports.reject(
                    actor_id,
                    Precondition::NoCompatibleAmmunition {
                        weapon: weapon.name.clone(),
                    },
                ))
            }
        };

        // Only a magazine of the same kind with more charges is worth the swap
        if let Some(current) = weapon.magazine() {
            if current.ammunition.is_same_type(&stack) && stack.remaining_uses() <= current.remaining
            {
                return Ok(self.ports.reject(
                    actor_id,
                    Precondition::NoBetterMagazine {
                        weapon: weapon.name.clone(),
                    },
                ));
            }
        }

        let mut updates = Updates::new(actor_id);
        let mut pool = AmmunitionPool::new(&actor);

        if let Some(current) = weapon.magazine().cloned() {
            pool.return_magazine(&mut updates, &current);
            weapon
                .loaded_ammunition
                .retain(|l| !matches!(l, LoadedAmmunition::Magazine(_)));
            markers::uncock(&mut weapon, &mut updates);
            updates.floaty_text(
                format!(
                    "Unloaded {} ({}/{})",
                    current.ammunition.name, current.remaining, current.capacity
                ),
                false,
            );
        }

        let Some(magazine) = pool.take_magazine(&mut updates, stack.id) else {
            return Ok(self.ports.reject(
                actor_id,
                Precondition::NoCompatibleAmmunition {
                    weapon: weapon.name.clone(),
                },
            ));
        };
        let loaded = magazine.ammunition.clone();
        updates.floaty_text(
            format!(
                "Loaded {} ({}/{})",
                loaded.name, magazine.remaining, magazine.capacity
            ),
            true,
        );
        weapon
            .loaded_ammunition
            .push(LoadedAmmunition::Magazine(magazine));
        system.write_loaded(&mut weapon, &mut updates)?;
        weapon.refresh_derived();

        tracing::debug!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            magazine = %loaded.name,
            "Seated magazine"
        );

        self.ports
            .hooks
            .publish(&mut HookEvent::Reload {
                actor: &actor,
                weapon: &weapon,
                ammunition: &loaded,
                updates: &mut updates,
            })
            .await;

        let summary = self.ports.commit(updates).await?;
        tracing::info!(actor_id = %actor_id, weapon = %weapon.name, "Reloaded magazine");
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}
