//! Projects the rules carried by fired ammunition onto the weapon for the
//! duration of the attack.

use async_trait::async_trait;

use ranged_combat_domain::{Actor, EffectTemplate, EntityKind, ItemChange, ItemId};

use super::{apply_targeted, targeted_effects};
use crate::entities::Updates;
use crate::hooks::{HookError, HookEvent, HookSubscriber};

pub struct AmmunitionEffects;

const NAME: &str = "ammunition-effects";

impl AmmunitionEffects {
    fn clear(actor: &Actor, weapon_id: ItemId, updates: &mut Updates) {
        for (effect_id, target) in targeted_effects(actor, EffectTemplate::AmmunitionEffect) {
            if target == weapon_id {
                updates.delete(EntityKind::Effect, effect_id);
            }
        }
    }
}

#[async_trait]
impl HookSubscriber for AmmunitionEffects {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn handle(&self, event: &mut HookEvent<'_>) -> Result<(), HookError> {
        match event {
            HookEvent::WeaponAttack {
                actor,
                weapon,
                updates,
            }
            | HookEvent::WeaponDamage {
                actor,
                weapon,
                updates,
                ..
            } => {
                Self::clear(actor, weapon.id, updates);
            }
            HookEvent::AmmunitionFire {
                weapon,
                ammunition,
                updates,
                ..
            } => {
                if ammunition.rules.is_empty() {
                    return Ok(());
                }
                let changes = vec![
                    ItemChange::Name(format!(
                        "{} ({})",
                        EffectTemplate::AmmunitionEffect.default_name(),
                        ammunition.name
                    )),
                    ItemChange::Rules(ammunition.rules.clone()),
                ];
                apply_targeted(
                    updates,
                    EffectTemplate::AmmunitionEffect,
                    weapon.id,
                    changes,
                    NAME,
                )?;
                tracing::debug!(
                    weapon = %weapon.name,
                    ammunition = %ammunition.name,
                    "Applied ammunition effect"
                );
            }
            _ => {}
        }
        Ok(())
    }
}
