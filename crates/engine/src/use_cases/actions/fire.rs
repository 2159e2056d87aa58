//! Fire use case.
//!
//! Runs when the host rolls an attack with a weapon. Spends the rounds the
//! shot needs and tells subscribers what was fired. Conjured rounds always
//! go first.

use ranged_combat_domain::{
    Actor, ActorId, Ammunition, ItemId, LoadedAmmunition, StateError, Weapon,
};

use super::inventory::AmmunitionPool;
use super::markers;
use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::{RoundCustody, Updates};
use crate::hooks::HookEvent;
use crate::infrastructure::ports::{ChoiceOption, ChoicePrompt};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FireMode {
    #[default]
    Single,
    /// Both barrels of a double-barrel weapon at once
    BothBarrels,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireRequest {
    pub weapon_id: ItemId,
    pub mode: FireMode,
    /// Publish `weapon-attack` before spending; false when a feat fires the
    /// weapon without rolling an attack
    pub attack: bool,
}

impl FireRequest {
    pub fn attack(weapon_id: ItemId) -> Self {
        Self {
            weapon_id,
            mode: FireMode::Single,
            attack: true,
        }
    }

    pub fn without_attack(weapon_id: ItemId) -> Self {
        Self {
            attack: false,
            ..Self::attack(weapon_id)
        }
    }

    pub fn both_barrels(mut self) -> Self {
        self.mode = FireMode::BothBarrels;
        self
    }
}

pub struct Fire {
    ports: ActionPorts,
}

impl Fire {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Execute the fire use case.
    ///
    /// # Arguments
    /// * `actor_id` - The actor attacking
    /// * `request` - The weapon, fire mode and whether an attack is rolled
    ///
    /// # Returns
    /// * `Ok(ActionOutcome::Completed)` - Rounds spent; the report names the first one fired
    /// * `Ok(ActionOutcome::Rejected)` - The weapon cannot fire; nothing was written
    /// * `Ok(ActionOutcome::Cancelled)` - The user declined to pick a chamber
    /// * `Err(ActionError)` - The host could not be read or written
    pub async fn execute(
        &self,
        actor_id: ActorId,
        request: FireRequest,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (system, weapons) = self.ports.loadout(&actor)?;
        let Some(mut weapon) = weapons.into_iter().find(|w| w.id == request.weapon_id) else {
            return Ok(self
                .ports
                .reject(actor_id, Precondition::WeaponNotFound(request.weapon_id)));
        };
        let mut updates = Updates::new(actor_id);

        if !weapon.uses_ammunition() {
            if request.attack {
                self.publish_attack(&actor, &weapon, &mut updates).await;
            }
            let summary = self.ports.commit(updates).await?;
            return Ok(ActionOutcome::Completed(ActionReport::for_weapon(
                weapon.id, summary,
            )));
        }

        let units = match check_ready(&weapon, request.mode) {
            Ok(units) => units,
            Err(reason) => return Ok(self.ports.reject(actor_id, reason)),
        };
        let conjured_units = u32::from(weapon.conjured_round().is_some()).min(units);
        let rest = units - conjured_units;

        let chamber = if rest > 0 && weapon.is_capacity {
            match self.resolve_chamber(&actor, &weapon).await {
                Some(chamber) => Some(chamber),
                None => return Ok(ActionOutcome::Cancelled),
            }
        } else {
            None
        };
        if let Some(chamber) = &chamber {
            if chamber.quantity < rest {
                return Ok(self.ports.reject(
                    actor_id,
                    Precondition::InsufficientAmmunition {
                        weapon: weapon.name.clone(),
                        needed: rest,
                        available: chamber.quantity,
                    },
                ));
            }
        }

        if request.attack {
            self.publish_attack(&actor, &weapon, &mut updates).await;
        }

        let custody = system.round_custody();
        let mut pool = AmmunitionPool::new(&actor);
        let mut fired = Vec::new();

        if conjured_units > 0 {
            if let Some(conjured) = weapon.conjured_round().map(|c| c.ammunition.clone()) {
                markers::remove_conjured(&mut weapon, &mut updates);
                fired.push(conjured);
            }
        }
        if rest > 0 {
            let shot = if weapon.is_repeating {
                fire_magazine(&mut weapon, custody, &mut pool, &mut updates, rest)
            } else if let Some(chamber) = &chamber {
                fire_chamber(&mut weapon, chamber, custody, &mut pool, &mut updates, rest)?
            } else if weapon.requires_loading {
                fire_standard(&mut weapon, custody, &mut pool, &mut updates, rest)
            } else {
                weapon
                    .preferred_ammunition()
                    .map(|stack| stack.ammunition.id)
                    .and_then(|id| pool.spend(&mut updates, id, rest))
            };
            fired.extend(shot);
        }

        if weapon.requires_loading {
            system.write_loaded(&mut weapon, &mut updates)?;
        }
        weapon.refresh_derived();

        for ammunition in &fired {
            tracing::debug!(
                actor_id = %actor_id,
                weapon = %weapon.name,
                ammunition = %ammunition.name,
                units = ammunition.quantity,
                "Fired ammunition"
            );
            self.ports
                .hooks
                .publish(&mut HookEvent::AmmunitionFire {
                    actor: &actor,
                    weapon: &weapon,
                    ammunition,
                    updates: &mut updates,
                })
                .await;
        }

        let summary = self.ports.commit(updates).await?;
        tracing::info!(
            actor_id = %actor_id,
            weapon = %weapon.name,
            remaining = weapon.loaded_uses(),
            "Fired weapon"
        );
        Ok(ActionOutcome::Completed(ActionReport {
            weapon_id: Some(weapon.id),
            summary,
            fired: fired.into_iter().next(),
        }))
    }

    async fn publish_attack(&self, actor: &Actor, weapon: &Weapon, updates: &mut Updates) {
        self.ports
            .hooks
            .publish(&mut HookEvent::WeaponAttack {
                actor,
                weapon,
                updates,
            })
            .await;
    }

    /// The chamber type the shot comes from: the selected one, the only
    /// one, or whichever the user picks. `None` if the user declines.
    async fn resolve_chamber(&self, actor: &Actor, weapon: &Weapon) -> Option<Ammunition> {
        let chambers = weapon.chambers()?.chambers.clone();
        if let Some(selected) = &weapon.selected_chamber {
            if let Some(chamber) = chambers.iter().find(|c| c.matches_ref(selected)) {
                return Some(chamber.clone());
            }
        }
        if let [only] = chambers.as_slice() {
            return Some(only.clone());
        }

        let prompt = ChoicePrompt {
            title: format!("Select ammunition to fire from {}", weapon.name),
            options: chambers
                .iter()
                .map(|c| ChoiceOption {
                    id: c.id,
                    name: c.name.clone(),
                    img: c.img.clone(),
                    hint: Some(format!("x{}", c.quantity)),
                })
                .collect(),
        };
        let chosen = self.ports.prompt.choose(actor.id, prompt).await?;
        chambers.into_iter().find(|c| c.id == chosen)
    }
}

/// Units the shot needs, or why the weapon cannot fire
fn check_ready(weapon: &Weapon, mode: FireMode) -> Result<u32, Precondition> {
    let name = || weapon.name.clone();
    let units = match mode {
        FireMode::Single => weapon.expend,
        FireMode::BothBarrels if weapon.is_double_barrel => 2,
        FireMode::BothBarrels => return Err(Precondition::NotDoubleBarrel { weapon: name() }),
    };

    let available = if weapon.requires_loading {
        if weapon.is_repeating {
            if weapon.magazine().is_none() && weapon.conjured_round().is_none() {
                return Err(Precondition::NoMagazine { weapon: name() });
            }
            if weapon.is_reload_gated() && !weapon.is_cocked() {
                return Err(Precondition::NotCocked { weapon: name() });
            }
        }
        let available = weapon.loaded_uses();
        if available == 0 {
            return Err(match weapon.magazine() {
                Some(_) => Precondition::MagazineEmpty { weapon: name() },
                None => Precondition::NotLoaded { weapon: name() },
            });
        }
        available
    } else {
        let available = weapon
            .preferred_ammunition()
            .map_or(0, |stack| stack.ammunition.total_uses());
        if available == 0 {
            return Err(Precondition::NoCompatibleAmmunition { weapon: name() });
        }
        available
    };

    if available < units {
        return Err(Precondition::InsufficientAmmunition {
            weapon: name(),
            needed: units,
            available,
        });
    }
    Ok(units)
}

fn fire_magazine(
    weapon: &mut Weapon,
    custody: RoundCustody,
    pool: &mut AmmunitionPool,
    updates: &mut Updates,
    units: u32,
) -> Option<Ammunition> {
    let magazine = weapon.magazine_mut()?;
    let shot = magazine.spend(units);
    let ejected = (custody == RoundCustody::Weapon && magazine.is_ejected())
        .then(|| magazine.ammunition.name.clone());
    if custody == RoundCustody::Inventory {
        pool.spend(updates, shot.id, units);
    }
    if let Some(name) = ejected {
        weapon
            .loaded_ammunition
            .retain(|l| !matches!(l, LoadedAmmunition::Magazine(_)));
        updates.floaty_text(format!("Ejected {name}"), false);
    }
    if weapon.is_reload_gated() {
        markers::uncock(weapon, updates);
    }
    Some(shot)
}

fn fire_chamber(
    weapon: &mut Weapon,
    chamber: &Ammunition,
    custody: RoundCustody,
    pool: &mut AmmunitionPool,
    updates: &mut Updates,
    units: u32,
) -> Result<Option<Ammunition>, StateError> {
    let Some(shot) = weapon
        .chambers_mut()
        .and_then(|chambers| chambers.fire(chamber, units))
    else {
        return Ok(None);
    };
    weapon.prune_loaded();
    if custody == RoundCustody::Inventory {
        pool.spend(updates, shot.id, units);
    }

    // The next shot has to choose again unless only one type is left
    let remaining = weapon
        .chambers()
        .map(|c| c.chambers.clone())
        .unwrap_or_default();
    match remaining.as_slice() {
        [only] => {
            let still_selected = weapon
                .selected_chamber
                .as_ref()
                .is_some_and(|r| only.matches_ref(r));
            if !still_selected && weapon.markers.chamber.is_some() {
                markers::select_chamber(weapon, only.to_ref(None), updates)?;
            }
        }
        _ => markers::clear_chamber(weapon, updates),
    }
    Ok(Some(shot))
}

fn fire_standard(
    weapon: &mut Weapon,
    custody: RoundCustody,
    pool: &mut AmmunitionPool,
    updates: &mut Updates,
    units: u32,
) -> Option<Ammunition> {
    let standard = weapon.loaded_ammunition.iter_mut().find_map(|l| match l {
        LoadedAmmunition::Standard(s) if !s.conjured => Some(s),
        _ => None,
    })?;
    let shot = standard
        .ammunition
        .with_quantity(units.min(standard.ammunition.quantity));
    standard.ammunition.quantity -= shot.quantity;
    weapon.prune_loaded();
    if custody == RoundCustody::Inventory {
        pool.spend(updates, shot.id, units);
    }
    Some(shot)
}
