//! Reload use case.
//!
//! Loads one round into the chosen weapon. Repeating weapons are cocked
//! instead; their magazines are swapped by [`super::ReloadMagazine`].

use ranged_combat_domain::{
    Actor, ActorId, Ammunition, ItemChange, ItemId, LoadedAmmunition, StandardAmmunition, Weapon,
};

use super::inventory::AmmunitionPool;
use super::markers;
use super::selection::{select_ammunition, select_weapon, Choice};
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::{RoundCustody, Updates};
use crate::hooks::HookEvent;

pub struct Reload {
    ports: ActionPorts,
}

impl Reload {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Reload a weapon. Without `weapon_id` the only reloadable weapon is
    /// used, or the user picks one.
    pub async fn execute(
        &self,
        actor_id: ActorId,
        weapon_id: Option<ItemId>,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (system, weapons) = self.ports.loadout(&actor)?;

        let candidates: Vec<Weapon> = weapons
            .into_iter()
            .filter(|w| w.is_equipped && is_reloadable(w))
            .collect();
        let mut weapon = match select_weapon(
            &self.ports,
            &actor,
            candidates,
            weapon_id,
            "Select a weapon to reload",
        )
        .await
        {
            Choice::Picked(weapon) => weapon,
            Choice::Declined => return Ok(ActionOutcome::Cancelled),
            Choice::Empty => {
                let reason = match weapon_id {
                    Some(id) => Precondition::WeaponNotFound(id),
                    None => Precondition::NoReloadableWeapon,
                };
                return Ok(self.ports.reject(actor_id, reason));
            }
        };

        let mut updates = Updates::new(actor_id);

        if weapon.is_repeating {
            return self.cock(actor_id, &actor, weapon, updates).await;
        }

        // A full single-type weapon can still swap to another type
        let full = weapon.remaining_capacity == 0;
        let loaded_type = weapon.standard().map(|s| s.ammunition.clone());
        let candidates: Vec<_> = weapon
            .available_ammunition()
            .filter(|a| {
                !full
                    || loaded_type
                        .as_ref()
                        .is_some_and(|l| !l.is_same_type(&a.ammunition))
            })
            .cloned()
            .collect();
        if full && (weapon.is_capacity || candidates.is_empty()) {
            return Ok(self.ports.reject(
                actor_id,
                Precondition::AlreadyFull {
                    weapon: weapon.name.clone(),
                },
            ));
        }

        let stack = match select_ammunition(
            &self.ports,
            &actor,
            &weapon,
            candidates,
            "Select ammunition to load",
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

        let custody = system.round_custody();
        let mut pool = AmmunitionPool::new(&actor);
        if !weapon.is_capacity {
            unload_other_type(&mut weapon, &stack, custody, &mut pool, &mut updates);
        }
        if weapon.loaded_quantity() >= weapon.capacity {
            return Ok(self.ports.reject(
                actor_id,
                Precondition::AlreadyFull {
                    weapon: weapon.name.clone(),
                },
            ));
        }

        let round = match custody {
            RoundCustody::Weapon => {
                let Some(round) = pool.take(&mut updates, stack.id, 1) else {
                    return Ok(self.ports.reject(
                        actor_id,
                        Precondition::InsufficientAmmunition {
                            weapon: weapon.name.clone(),
                            needed: 1,
                            available: stack.quantity,
                        },
                    ));
                };
                round
            }
            RoundCustody::Inventory => {
                let needed = weapon.loaded_quantity() + 1;
                if stack.total_uses() < needed {
                    return Ok(self.ports.reject(
                        actor_id,
                        Precondition::InsufficientAmmunition {
                            weapon: weapon.name.clone(),
                            needed,
                            available: stack.total_uses(),
                        },
                    ));
                }
                if weapon.selected_ammunition_id != Some(stack.id) {
                    updates.update_item(weapon.id, vec![ItemChange::SelectedAmmo(Some(stack.id))]);
                    weapon.selected_ammunition_id = Some(stack.id);
                }
                stack.with_quantity(1)
            }
        };

        load_round(&mut weapon, round.clone());
        if weapon.is_capacity
            && weapon.selected_chamber.is_none()
            && self.ports.systems.settings().auto_select_chamber
        {
            markers::select_chamber(&mut weapon, round.to_ref(None), &mut updates)?;
        }
        system.write_loaded(&mut weapon, &mut updates)?;
        weapon.refresh_derived();
        updates.floaty_text(format!("Loaded {}", round.name), true);

        tracing::debug!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            ammunition = %round.name,
            loaded = weapon.loaded_quantity(),
            "Loaded round"
        );

        self.ports
            .hooks
            .publish(&mut HookEvent::Reload {
                actor: &actor,
                weapon: &weapon,
                ammunition: &round,
                updates: &mut updates,
            })
            .await;

        let summary = self.ports.commit(updates).await?;
        tracing::info!(actor_id = %actor_id, weapon = %weapon.name, "Reloaded weapon");
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }

    /// Ready a repeater whose magazine still has charges
    async fn cock(
        &self,
        actor_id: ActorId,
        actor: &Actor,
        mut weapon: Weapon,
        mut updates: Updates,
    ) -> Result<ActionOutcome, ActionError> {
        let name = weapon.name.clone();
        if weapon.is_cocked() {
            return Ok(self
                .ports
                .reject(actor_id, Precondition::AlreadyCocked { weapon: name }));
        }
        let magazine = match weapon.magazine() {
            None => {
                return Ok(self
                    .ports
                    .reject(actor_id, Precondition::NoMagazine { weapon: name }))
            }
            Some(magazine) if magazine.is_empty() => {
                return Ok(self
                    .ports
                    .reject(actor_id, Precondition::MagazineEmpty { weapon: name }))
            }
            Some(magazine) => magazine.ammunition.clone(),
        };

        markers::cock(&mut weapon, &mut updates)?;
        weapon.refresh_derived();
        updates.floaty_text(format!("Readied {}", weapon.name), true);

        self.ports
            .hooks
            .publish(&mut HookEvent::Reload {
                actor,
                weapon: &weapon,
                ammunition: &magazine,
                updates: &mut updates,
            })
            .await;

        let summary = self.ports.commit(updates).await?;
        tracing::info!(actor_id = %actor_id, weapon = %weapon.name, "Readied repeating weapon");
        Ok(ActionOutcome::Completed(ActionReport::for_weapon(
            weapon.id, summary,
        )))
    }
}

/// Weapons reload applies to: loaded one round at a time, or repeaters
/// that must be readied between shots
pub(super) fn is_reloadable(weapon: &Weapon) -> bool {
    if weapon.is_repeating {
        weapon.is_reload_gated()
    } else {
        weapon.requires_loading && weapon.uses_ammunition()
    }
}

/// A single-type weapon drops rounds of another type before loading. Rounds
/// the weapon holds go back to the inventory.
fn unload_other_type(
    weapon: &mut Weapon,
    incoming: &Ammunition,
    custody: RoundCustody,
    pool: &mut AmmunitionPool,
    updates: &mut Updates,
) {
    let Some(loaded) = weapon.standard().map(|s| s.ammunition.clone()) else {
        return;
    };
    if loaded.is_same_type(incoming) {
        return;
    }
    if custody == RoundCustody::Weapon {
        pool.return_rounds(updates, &loaded);
    }
    weapon
        .loaded_ammunition
        .retain(|l| !matches!(l, LoadedAmmunition::Standard(s) if !s.conjured));
    updates.floaty_text(format!("Unloaded {}", loaded.name), false);
}

fn load_round(weapon: &mut Weapon, round: Ammunition) {
    if weapon.is_capacity {
        weapon.load_chamber(round);
        return;
    }
    let existing = weapon.loaded_ammunition.iter_mut().find_map(|l| match l {
        LoadedAmmunition::Standard(s) if !s.conjured && s.ammunition.is_same_type(&round) => {
            Some(s)
        }
        _ => None,
    });
    match existing {
        Some(standard) => standard.ammunition.quantity += round.quantity,
        None => weapon
            .loaded_ammunition
            .push(LoadedAmmunition::Standard(StandardAmmunition {
                ammunition: round,
                conjured: false,
            })),
    }
}
