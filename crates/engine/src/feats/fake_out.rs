//! Fake Out: spend a shot to distract an enemy instead of attacking.

use async_trait::async_trait;

use ranged_combat_domain::slugs;

use crate::hooks::{AuxiliaryAction, AuxiliaryActionKind, HookError, HookEvent, HookSubscriber};

const GROUPS: [&str; 2] = ["firearm", "crossbow"];

pub struct FakeOut;

#[async_trait]
impl HookSubscriber for FakeOut {
    fn name(&self) -> &'static str {
        "fake-out"
    }

    async fn handle(&self, event: &mut HookEvent<'_>) -> Result<(), HookError> {
        let HookEvent::AuxiliaryActions {
            actor,
            weapon,
            auxiliary_actions,
        } = event
        else {
            return Ok(());
        };
        let fits = weapon
            .group
            .as_deref()
            .is_some_and(|group| GROUPS.contains(&group));
        if actor.has_ability(slugs::FAKE_OUT) && fits && weapon.is_ready_to_fire {
            auxiliary_actions.push(AuxiliaryAction::new(
                "Fake Out",
                AuxiliaryActionKind::Feat {
                    slug: slugs::FAKE_OUT.to_string(),
                    fires_weapon: true,
                },
                Some(1),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ranged_combat_domain::{Actor, ActorKind, Item, Weapon, WeaponData};

    fn weapon(group: &str, ready: bool) -> Weapon {
        let mut weapon = Weapon::from_item(&Item::weapon(
            "Arquebus",
            WeaponData {
                group: Some(group.into()),
                ..WeaponData::default()
            },
        ))
        .expect("weapon");
        weapon.is_ready_to_fire = ready;
        weapon
    }

    async fn offered(actor: &Actor, weapon: &Weapon) -> Vec<AuxiliaryAction> {
        let mut auxiliary_actions = Vec::new();
        FakeOut
            .handle(&mut HookEvent::AuxiliaryActions {
                actor,
                weapon,
                auxiliary_actions: &mut auxiliary_actions,
            })
            .await
            .expect("handled");
        auxiliary_actions
    }

    #[tokio::test]
    async fn offered_for_a_ready_firearm() {
        let actor = Actor::new("Gunslinger", ActorKind::Character)
            .with_item(Item::feat(slugs::FAKE_OUT));

        let actions = offered(&actor, &weapon("firearm", true)).await;

        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].label, "Fake Out");
    }

    #[tokio::test]
    async fn not_offered_when_unloaded_or_for_bows() {
        let actor = Actor::new("Gunslinger", ActorKind::Character)
            .with_item(Item::feat(slugs::FAKE_OUT));

        assert!(offered(&actor, &weapon("firearm", false)).await.is_empty());
        assert!(offered(&actor, &weapon("bow", true)).await.is_empty());
    }
}
