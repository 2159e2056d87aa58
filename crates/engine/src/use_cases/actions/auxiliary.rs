//! Auxiliary actions.
//!
//! The extra actions offered next to a weapon's strikes: the core loadout
//! actions that fit the weapon's state, plus whatever feats add through
//! `auxiliary-actions`.

use std::sync::Arc;

use ranged_combat_domain::{slugs, Actor, ActorId, ItemId, Weapon};

use super::conjure_bullet::can_hold_conjured;
use super::reload::is_reloadable;
use super::switch_ammunition::alternatives;
use super::{
    ActionError, ActionOutcome, ActionPorts, ActionReport, ConjureBullet, Fire, FireRequest,
    NextChamber, Precondition, Reload, ReloadMagazine, SwitchAmmunition, Unload,
};
use crate::entities::{Updates, WeaponSystem};
use crate::hooks::{AuxiliaryAction, AuxiliaryActionKind, HookEvent, PostActionResult};

pub struct AuxiliaryActions {
    ports: ActionPorts,
    reload: Arc<Reload>,
    reload_magazine: Arc<ReloadMagazine>,
    unload: Arc<Unload>,
    switch_ammunition: Arc<SwitchAmmunition>,
    next_chamber: Arc<NextChamber>,
    conjure_bullet: Arc<ConjureBullet>,
    fire: Arc<Fire>,
}

impl AuxiliaryActions {
    pub fn new(
        ports: ActionPorts,
        reload: Arc<Reload>,
        reload_magazine: Arc<ReloadMagazine>,
        unload: Arc<Unload>,
        switch_ammunition: Arc<SwitchAmmunition>,
        next_chamber: Arc<NextChamber>,
        conjure_bullet: Arc<ConjureBullet>,
        fire: Arc<Fire>,
    ) -> Self {
        Self {
            ports,
            reload,
            reload_magazine,
            unload,
            switch_ammunition,
            next_chamber,
            conjure_bullet,
            fire,
        }
    }

    /// Actions available for one weapon right now
    pub async fn list(
        &self,
        actor_id: ActorId,
        weapon_id: ItemId,
    ) -> Result<Vec<AuxiliaryAction>, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let (system, weapons) = self.ports.loadout(&actor)?;
        let Some(weapon) = weapons.into_iter().find(|w| w.id == weapon_id) else {
            tracing::debug!(actor_id = %actor_id, %weapon_id, "No such weapon, no auxiliary actions");
            return Ok(Vec::new());
        };

        let mut auxiliary_actions = core_actions(&actor, system.as_ref(), &weapon);
        self.ports
            .hooks
            .publish(&mut HookEvent::AuxiliaryActions {
                actor: &actor,
                weapon: &weapon,
                auxiliary_actions: &mut auxiliary_actions,
            })
            .await;
        Ok(auxiliary_actions)
    }

    /// Perform the action with this label
    pub async fn perform(
        &self,
        actor_id: ActorId,
        weapon_id: ItemId,
        label: &str,
    ) -> Result<ActionOutcome, ActionError> {
        let available = self.list(actor_id, weapon_id).await?;
        let Some(action) = available.into_iter().find(|a| a.label == label) else {
            let weapon = self
                .ports
                .load_actor(actor_id)
                .await?
                .item(weapon_id)
                .map_or_else(|| weapon_id.to_string(), |w| w.name.clone());
            return Ok(self.ports.reject(
                actor_id,
                Precondition::UnknownAuxiliaryAction {
                    weapon,
                    label: label.to_string(),
                },
            ));
        };
        tracing::debug!(actor_id = %actor_id, action = %action.label, "Performing auxiliary action");

        let weapon = Some(weapon_id);
        match action.kind {
            AuxiliaryActionKind::Reload => self.reload.execute(actor_id, weapon).await,
            AuxiliaryActionKind::ReloadMagazine => {
                self.reload_magazine.execute(actor_id, weapon).await
            }
            AuxiliaryActionKind::Unload => self.unload.execute(actor_id, weapon).await,
            AuxiliaryActionKind::NextChamber => self.next_chamber.execute(actor_id, weapon).await,
            AuxiliaryActionKind::SwitchAmmunition => {
                self.switch_ammunition
                    .execute(actor_id, weapon, None)
                    .await
            }
            AuxiliaryActionKind::ConjureBullet => {
                self.conjure_bullet.execute(actor_id, weapon).await
            }
            AuxiliaryActionKind::Feat { slug, fires_weapon } => {
                self.perform_feat(actor_id, weapon_id, &slug, fires_weapon)
                    .await
            }
        }
    }

    /// Fire without an attack when the feat needs it, then announce the
    /// feat through `post-action`.
    async fn perform_feat(
        &self,
        actor_id: ActorId,
        weapon_id: ItemId,
        slug: &str,
        fires_weapon: bool,
    ) -> Result<ActionOutcome, ActionError> {
        let mut report = ActionReport::default();
        let result = if fires_weapon {
            match self
                .fire
                .execute(actor_id, FireRequest::without_attack(weapon_id))
                .await?
            {
                ActionOutcome::Completed(fired) => report = fired,
                other => return Ok(other),
            }
            PostActionResult::WeaponFired { weapon_id }
        } else {
            PostActionResult::Performed
        };

        let actor = self.ports.load_actor(actor_id).await?;
        let Some(item) = actor.ability(slug).cloned() else {
            tracing::warn!(actor_id = %actor_id, slug, "Feat item is gone, skipping post-action");
            return Ok(ActionOutcome::Completed(report));
        };
        let mut updates = Updates::new(actor_id);
        self.ports
            .hooks
            .publish(&mut HookEvent::PostAction {
                actor: &actor,
                item: &item,
                result,
                updates: &mut updates,
            })
            .await;
        let summary = self.ports.commit(updates).await?;
        report.summary.created += summary.created;
        report.summary.updated += summary.updated;
        report.summary.deleted += summary.deleted;
        report.weapon_id = Some(weapon_id);
        Ok(ActionOutcome::Completed(report))
    }
}

/// Loadout actions that make sense for the weapon's current state
fn core_actions(actor: &Actor, system: &dyn WeaponSystem, weapon: &Weapon) -> Vec<AuxiliaryAction> {
    let mut actions = Vec::new();

    if weapon.is_equipped && is_reloadable(weapon) {
        let needs_reload = if weapon.is_repeating {
            !weapon.is_cocked() && weapon.magazine().is_some_and(|m| !m.is_empty())
        } else {
            weapon.remaining_capacity > 0
        };
        if needs_reload {
            actions.push(AuxiliaryAction::new(
                "Reload",
                AuxiliaryActionKind::Reload,
                weapon.reload_actions,
            ));
        }
    }
    if weapon.is_equipped && weapon.is_repeating && system.supports_magazines() {
        actions.push(AuxiliaryAction::new(
            "Reload Magazine",
            AuxiliaryActionKind::ReloadMagazine,
            None,
        ));
    }
    let unloadable = weapon.is_loaded() && (system.supports_magazines() || !weapon.is_repeating);
    if unloadable {
        actions.push(AuxiliaryAction::new(
            "Unload",
            AuxiliaryActionKind::Unload,
            Some(1),
        ));
    }
    if weapon.is_capacity && weapon.chambers().is_some_and(|c| c.chambers.len() > 1) {
        actions.push(AuxiliaryAction::new(
            "Next Chamber",
            AuxiliaryActionKind::NextChamber,
            Some(1),
        ));
    }
    if !alternatives(weapon).is_empty() {
        actions.push(AuxiliaryAction::new(
            "Switch Ammunition",
            AuxiliaryActionKind::SwitchAmmunition,
            None,
        ));
    }
    if actor.has_ability(slugs::CONJURE_BULLET) && can_hold_conjured(weapon) {
        actions.push(AuxiliaryAction::new(
            "Conjure Bullet",
            AuxiliaryActionKind::ConjureBullet,
            Some(1),
        ));
    }
    actions
}
