//! Crossbow feats.
//!
//! Crossbow Ace boosts a crossbow that was just reloaded, or every held
//! crossbow after Hunt Prey. Crossbow Crack Shot boosts the next hit after
//! a reload and ends once damage is rolled.

use async_trait::async_trait;

use ranged_combat_domain::{slugs, Actor, CarryType, EffectTemplate, EntityKind, ItemId};

use super::{apply_targeted, pending_targets, targeted_effects};
use crate::entities::Updates;
use crate::hooks::{HookError, HookEvent, HookSubscriber};

const CROSSBOW_GROUP: &str = "crossbow";

fn is_crossbow(group: Option<&str>) -> bool {
    group == Some(CROSSBOW_GROUP)
}

/// Queue the effect unless the weapon already has one or one is on its way
fn apply_once(
    actor: &Actor,
    updates: &mut Updates,
    template: EffectTemplate,
    weapon_id: ItemId,
    subscriber: &'static str,
) -> Result<(), HookError> {
    let present = targeted_effects(actor, template)
        .iter()
        .any(|(effect_id, target)| *target == weapon_id && !updates.is_deleted(*effect_id));
    if present || pending_targets(updates, template).contains(&weapon_id) {
        return Ok(());
    }
    apply_targeted(updates, template, weapon_id, Vec::new(), subscriber)?;
    tracing::debug!(
        actor_id = %actor.id,
        %weapon_id,
        effect = template.default_name(),
        "Applied crossbow effect"
    );
    Ok(())
}

pub struct CrossbowAce;

#[async_trait]
impl HookSubscriber for CrossbowAce {
    fn name(&self) -> &'static str {
        "crossbow-ace"
    }

    async fn handle(&self, event: &mut HookEvent<'_>) -> Result<(), HookError> {
        if !event.actor().has_ability(slugs::CROSSBOW_ACE) {
            return Ok(());
        }
        match event {
            HookEvent::Reload {
                actor,
                weapon,
                updates,
                ..
            } if is_crossbow(weapon.group.as_deref()) => {
                apply_once(actor, updates, EffectTemplate::CrossbowAce, weapon.id, self.name())
            }
            HookEvent::PostAction {
                actor,
                item,
                updates,
                ..
            } if item.slug() == Some(slugs::HUNT_PREY) => {
                let crossbows: Vec<ItemId> = actor
                    .weapons()
                    .filter(|w| {
                        w.as_weapon().is_some_and(|data| {
                            is_crossbow(data.group.as_deref())
                                && data.equipped.carry_type == CarryType::Held
                        })
                    })
                    .map(|w| w.id)
                    .collect();
                for weapon_id in crossbows {
                    apply_once(actor, updates, EffectTemplate::CrossbowAce, weapon_id, self.name())?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

pub struct CrossbowCrackShot;

#[async_trait]
impl HookSubscriber for CrossbowCrackShot {
    fn name(&self) -> &'static str {
        "crossbow-crack-shot"
    }

    async fn handle(&self, event: &mut HookEvent<'_>) -> Result<(), HookError> {
        match event {
            HookEvent::Reload {
                actor,
                weapon,
                updates,
                ..
            } if is_crossbow(weapon.group.as_deref())
                && actor.has_ability(slugs::CROSSBOW_CRACK_SHOT) =>
            {
                // Only one crack shot can be pending at a time
                if !targeted_effects(actor, EffectTemplate::CrossbowCrackShot).is_empty() {
                    return Ok(());
                }
                apply_once(
                    actor,
                    updates,
                    EffectTemplate::CrossbowCrackShot,
                    weapon.id,
                    self.name(),
                )
            }
            HookEvent::WeaponDamage {
                actor,
                weapon,
                updates,
                ..
            } => {
                for (effect_id, target) in
                    targeted_effects(actor, EffectTemplate::CrossbowCrackShot)
                {
                    if target == weapon.id {
                        updates.delete(EntityKind::Effect, effect_id);
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
