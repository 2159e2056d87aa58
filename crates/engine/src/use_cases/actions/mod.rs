//! Ammunition actions.
//!
//! Every action follows the same shape: read the actor, build its weapons
//! through the active weapon system, check preconditions, queue changes on
//! one [`Updates`], publish hooks, and commit once. A failed precondition
//! is reported to the user and leaves the actor untouched.

mod action_used;
mod auxiliary;
mod conjure_bullet;
mod error;
mod fire;
mod inventory;
mod markers;
mod next_chamber;
mod reload;
mod reload_magazine;
mod selection;
mod switch_ammunition;
mod unload;
mod weapon_damage;

#[cfg(test)]
mod tests;

pub use action_used::ActionUsed;
pub use auxiliary::AuxiliaryActions;
pub use conjure_bullet::ConjureBullet;
pub use error::{ActionError, Precondition};
pub use fire::{Fire, FireMode, FireRequest};
pub use next_chamber::NextChamber;
pub use reload::Reload;
pub use reload_magazine::ReloadMagazine;
pub use switch_ammunition::SwitchAmmunition;
pub use unload::Unload;
pub use weapon_damage::WeaponDamage;

use std::sync::Arc;

use ranged_combat_domain::{Actor, ActorId, Ammunition, ItemId, Weapon};

use crate::entities::{CommitSummary, Updates, WeaponSystem, WeaponSystems};
use crate::hooks::HookBus;
use crate::infrastructure::ports::{HostStore, ItemFilter, NotificationPort, PromptPort};

/// Everything an action talks to
#[derive(Clone)]
pub struct ActionPorts {
    pub store: Arc<dyn HostStore>,
    pub prompt: Arc<dyn PromptPort>,
    pub notifier: Arc<dyn NotificationPort>,
    pub hooks: Arc<HookBus>,
    pub systems: Arc<WeaponSystems>,
}

impl ActionPorts {
    /// Read the actor and all of its items as they are now.
    pub async fn load_actor(&self, actor_id: ActorId) -> Result<Actor, ActionError> {
        let profile = self
            .store
            .get_actor(actor_id)
            .await?
            .ok_or(ActionError::ActorNotFound(actor_id))?;
        let items = self.store.list_items(actor_id, ItemFilter::All).await?;
        Ok(Actor::from_profile(profile, items))
    }

    /// The actor's weapon system and every weapon it carries
    pub fn loadout(
        &self,
        actor: &Actor,
    ) -> Result<(Arc<dyn WeaponSystem>, Vec<Weapon>), ActionError> {
        let system = self.systems.resolve(actor)?;
        Ok((system, self.systems.get_weapons(actor)))
    }

    pub async fn commit(&self, updates: Updates) -> Result<CommitSummary, ActionError> {
        let floating_text = self.systems.settings().floating_combat_text;
        Ok(updates
            .commit(self.store.as_ref(), self.notifier.as_ref(), floating_text)
            .await?)
    }

    /// Tell the user why nothing happened.
    pub fn reject(&self, actor_id: ActorId, precondition: Precondition) -> ActionOutcome {
        let message = precondition.to_string();
        tracing::info!(actor_id = %actor_id, reason = %message, "Action rejected");
        self.notifier.warn(actor_id, &message);
        ActionOutcome::Rejected(precondition)
    }
}

/// What a completed action did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionReport {
    pub weapon_id: Option<ItemId>,
    pub summary: CommitSummary,
    /// Ammunition spent by a fire action
    pub fired: Option<Ammunition>,
}

impl ActionReport {
    pub fn for_weapon(weapon_id: ItemId, summary: CommitSummary) -> Self {
        Self {
            weapon_id: Some(weapon_id),
            summary,
            fired: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Completed(ActionReport),
    Rejected(Precondition),
    /// The user declined a prompt before anything was queued
    Cancelled,
}

impl ActionOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn precondition(&self) -> Option<&Precondition> {
        match self {
            Self::Rejected(precondition) => Some(precondition),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&ActionReport> {
        match self {
            Self::Completed(report) => Some(report),
            _ => None,
        }
    }
}

/// Container for the ammunition actions.
pub struct AmmunitionActions {
    pub reload: Arc<Reload>,
    pub reload_magazine: Arc<ReloadMagazine>,
    pub unload: Arc<Unload>,
    pub switch_ammunition: Arc<SwitchAmmunition>,
    pub next_chamber: Arc<NextChamber>,
    pub fire: Arc<Fire>,
    pub conjure_bullet: Arc<ConjureBullet>,
    pub weapon_damage: Arc<WeaponDamage>,
    pub action_used: Arc<ActionUsed>,
    pub auxiliary: Arc<AuxiliaryActions>,
}

impl AmmunitionActions {
    pub fn new(ports: ActionPorts) -> Self {
        let reload = Arc::new(Reload::new(ports.clone()));
        let reload_magazine = Arc::new(ReloadMagazine::new(ports.clone()));
        let unload = Arc::new(Unload::new(ports.clone()));
        let switch_ammunition = Arc::new(SwitchAmmunition::new(ports.clone()));
        let next_chamber = Arc::new(NextChamber::new(ports.clone()));
        let fire = Arc::new(Fire::new(ports.clone()));
        let conjure_bullet = Arc::new(ConjureBullet::new(ports.clone()));
        let weapon_damage = Arc::new(WeaponDamage::new(ports.clone()));
        let action_used = Arc::new(ActionUsed::new(ports.clone()));
        let auxiliary = Arc::new(AuxiliaryActions::new(
            ports,
            reload.clone(),
            reload_magazine.clone(),
            unload.clone(),
            switch_ammunition.clone(),
            next_chamber.clone(),
            conjure_bullet.clone(),
            fire.clone(),
        ));
        Self {
            reload,
            reload_magazine,
            unload,
            switch_ammunition,
            next_chamber,
            fire,
            conjure_bullet,
            weapon_damage,
            action_used,
            auxiliary,
        }
    }
}
