use ranged_combat_domain::{slugs, AmmunitionData, Item};
use serde_json::json;

use crate::hooks::PostActionResult;
use crate::test_fixtures::{items, Harness};
use crate::use_cases::actions::FireRequest;

const ACE: &str = "Effect: Crossbow Ace";
const CRACK_SHOT: &str = "Effect: Crossbow Crack Shot";

#[tokio::test]
async fn crossbow_ace_is_applied_once_per_crossbow() {
    let crossbow = items::crossbow();
    let crossbow_id = crossbow.id;
    let h = Harness::character(vec![
        crossbow,
        items::bolts(4),
        Item::feat(slugs::CROSSBOW_ACE),
    ]);

    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(crossbow_id))
        .await
        .expect("reload runs");
    assert_eq!(h.effects_named(ACE).len(), 1);

    h.app
        .actions
        .unload
        .execute(h.actor_id, Some(crossbow_id))
        .await
        .expect("unload runs");
    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(crossbow_id))
        .await
        .expect("reload runs");
    assert_eq!(h.effects_named(ACE).len(), 1);
}

#[tokio::test]
async fn hunt_prey_boosts_every_held_crossbow() {
    let hunt_prey = Item::action(slugs::HUNT_PREY);
    let hunt_prey_id = hunt_prey.id;
    let h = Harness::character(vec![
        items::crossbow(),
        items::capacity_crossbow(),
        items::longbow(),
        Item::feat(slugs::CROSSBOW_ACE),
        hunt_prey,
    ]);

    for _ in 0..2 {
        let outcome = h
            .app
            .actions
            .action_used
            .execute(h.actor_id, hunt_prey_id, PostActionResult::Performed)
            .await
            .expect("action used runs");
        assert!(outcome.is_completed());
    }

    assert_eq!(h.effects_named(ACE).len(), 2);
}

#[tokio::test]
async fn crack_shot_lasts_until_damage_is_rolled() {
    let crossbow = items::crossbow();
    let crossbow_id = crossbow.id;
    let h = Harness::character(vec![
        crossbow,
        items::bolts(4),
        Item::feat(slugs::CROSSBOW_CRACK_SHOT),
    ]);

    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(crossbow_id))
        .await
        .expect("reload runs");
    assert_eq!(h.effects_named(CRACK_SHOT).len(), 1);

    h.app
        .actions
        .weapon_damage
        .execute(h.actor_id, crossbow_id, Some("Goblin".into()))
        .await
        .expect("damage runs");
    assert!(h.effects_named(CRACK_SHOT).is_empty());
}

#[tokio::test]
async fn ammunition_rules_ride_along_until_damage() {
    let bow = items::longbow();
    let mut data = AmmunitionData::new(2, "arrows");
    data.rules = vec![json!({ "key": "FlatModifier", "selector": "damage", "value": 1 })];
    let fire_arrows = Item::ammunition("Fire Arrow", data);
    let (bow_id, arrows_id) = (bow.id, fire_arrows.id);
    let h = Harness::character(vec![bow, fire_arrows]);

    h.app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(bow_id))
        .await
        .expect("fire runs");

    let effects = h.effects_named("Ammunition Effect");
    assert_eq!(effects.len(), 1);
    assert_eq!(effects[0].name, "Ammunition Effect (Fire Arrow)");
    assert_eq!(h.quantity(arrows_id), Some(1));

    h.app
        .actions
        .weapon_damage
        .execute(h.actor_id, bow_id, None)
        .await
        .expect("damage runs");
    assert!(h.effects_named("Ammunition Effect").is_empty());
}

#[tokio::test]
async fn plain_arrows_leave_no_effect() {
    let bow = items::longbow();
    let bow_id = bow.id;
    let h = Harness::character(vec![bow, items::arrows(3)]);

    h.app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(bow_id))
        .await
        .expect("fire runs");

    assert!(h.effects_named("Ammunition Effect").is_empty());
}
