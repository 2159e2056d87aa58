use ranged_combat_domain::{ItemId, Uses};

use crate::test_fixtures::{items, Harness};
use crate::use_cases::actions::{FireRequest, Precondition};

/// Seat the magazine stack `stack` into `weapon_id`
async fn seat(h: &Harness, weapon_id: ItemId, stack: ItemId) {
    h.prompt.choose_next(Some(stack));
    let outcome = h
        .app
        .actions
        .reload_magazine
        .execute(h.actor_id, Some(weapon_id))
        .await
        .expect("reload magazine runs");
    assert!(outcome.is_completed(), "magazine seated: {outcome:?}");
}

fn magazine_uses(h: &Harness, id: ItemId) -> Option<Uses> {
    h.item(id)
        .and_then(|i| i.as_ammunition().and_then(|a| a.uses))
}

#[tokio::test]
async fn a_fresher_magazine_of_the_same_kind_replaces_a_partial_one() {
    let repeater = items::repeating_crossbow();
    let partial = items::bolt_magazine(1, 7, 10);
    let fresh = items::bolt_magazine(2, 10, 10);
    let (repeater_id, partial_id, fresh_id) = (repeater.id, partial.id, fresh.id);
    let h = Harness::character(vec![repeater, partial, fresh]);

    seat(&h, repeater_id, partial_id).await;
    assert_eq!(h.quantity(partial_id), None, "the last unit left the stack");
    let seated = h.effects_named("Magazine Loaded");
    assert_eq!(seated.len(), 1);
    assert_eq!(seated[0].name, "Magazine Loaded (Bolt Magazine)");

    let outcome = h
        .app
        .actions
        .reload_magazine
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload magazine runs");
    assert!(outcome.is_completed());

    let weapon = h.weapon(repeater_id).await;
    let magazine = weapon.magazine().expect("magazine seated");
    assert_eq!((magazine.remaining, magazine.capacity), (10, 10));
    assert_eq!(h.quantity(fresh_id), Some(1));

    let stacks = h.stacks_of(&items::source("bolt-magazine"));
    assert_eq!(stacks.len(), 2);
    let returned = stacks
        .iter()
        .find(|s| s.id != fresh_id)
        .expect("partial magazine came back as its own stack");
    let data = returned.as_ammunition().expect("ammunition");
    assert_eq!(data.quantity, 1);
    assert_eq!(data.uses.map(|u| (u.value, u.max)), Some((7, 10)));
}

#[tokio::test]
async fn a_magazine_with_no_more_charges_is_not_worth_swapping() {
    let repeater = items::repeating_crossbow();
    let seated = items::bolt_magazine(1, 7, 10);
    let worse = items::bolt_magazine(1, 7, 10);
    let (repeater_id, seated_id) = (repeater.id, seated.id);
    let h = Harness::character(vec![repeater, seated, worse]);

    seat(&h, repeater_id, seated_id).await;
    h.store.clear_operations().await;

    let outcome = h
        .app
        .actions
        .reload_magazine
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload magazine runs");

    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::NoBetterMagazine {
            weapon: "Repeating Crossbow".into()
        })
    );
    assert!(h.store.operations().await.is_empty());
}

#[tokio::test]
async fn a_different_magazine_is_loaded_even_when_it_has_fewer_charges() {
    let repeater = items::repeating_crossbow();
    let seated = items::bolt_magazine(1, 7, 10);
    let piercing = items::piercing_magazine(1, 5, 10);
    let (repeater_id, seated_id, piercing_id) = (repeater.id, seated.id, piercing.id);
    let h = Harness::character(vec![repeater, seated, piercing]);

    seat(&h, repeater_id, seated_id).await;
    let outcome = h
        .app
        .actions
        .reload_magazine
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload magazine runs");
    assert!(outcome.is_completed());

    let weapon = h.weapon(repeater_id).await;
    let magazine = weapon.magazine().expect("magazine seated");
    assert_eq!(magazine.ammunition.name, "Piercing Magazine");
    assert_eq!(magazine.remaining, 5);
    assert_eq!(h.quantity(piercing_id), None);

    let returned = h.stacks_of(&items::source("bolt-magazine"));
    assert_eq!(returned.len(), 1);
    assert_ne!(returned[0].id, seated_id, "returned under a fresh id");
    assert_eq!(
        returned[0]
            .as_ammunition()
            .and_then(|a| a.uses)
            .map(|u| (u.value, u.max)),
        Some((7, 10))
    );
}

#[tokio::test]
async fn a_repeater_must_be_readied_before_each_shot() {
    let repeater = items::repeating_crossbow();
    let magazines = items::bolt_magazine(1, 10, 10);
    let (repeater_id, magazines_id) = (repeater.id, magazines.id);
    let h = Harness::character(vec![repeater, magazines]);

    seat(&h, repeater_id, magazines_id).await;
    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(repeater_id))
        .await
        .expect("fire runs");
    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::NotCocked {
            weapon: "Repeating Crossbow".into()
        })
    );

    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload runs");
    assert!(outcome.is_completed());
    assert!(h.weapon(repeater_id).await.is_ready_to_fire);

    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload runs");
    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::AlreadyCocked {
            weapon: "Repeating Crossbow".into()
        })
    );

    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(repeater_id))
        .await
        .expect("fire runs");
    assert!(outcome.is_completed());

    let weapon = h.weapon(repeater_id).await;
    assert_eq!(weapon.magazine().map(|m| m.remaining), Some(9));
    assert!(!weapon.is_cocked());
    assert!(!weapon.is_ready_to_fire);
}

#[tokio::test]
async fn unloading_a_full_magazine_returns_it_to_its_stack() {
    let repeater = items::repeating_crossbow();
    let magazines = items::bolt_magazine(3, 10, 10);
    let (repeater_id, magazines_id) = (repeater.id, magazines.id);
    let h = Harness::character(vec![repeater, magazines]);

    seat(&h, repeater_id, magazines_id).await;
    assert_eq!(h.quantity(magazines_id), Some(2));

    h.app
        .actions
        .unload
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("unload runs");

    assert_eq!(h.quantity(magazines_id), Some(3));
    assert_eq!(magazine_uses(&h, magazines_id).map(|u| u.value), Some(10));
    assert!(h.effects_named("Magazine Loaded").is_empty());
}

#[tokio::test]
async fn taking_a_partial_top_unit_refills_the_next_one() {
    let repeater = items::repeating_crossbow();
    let magazines = items::bolt_magazine(2, 4, 10);
    let (repeater_id, magazines_id) = (repeater.id, magazines.id);
    let h = Harness::character(vec![repeater, magazines]);

    seat(&h, repeater_id, magazines_id).await;

    assert_eq!(h.quantity(magazines_id), Some(1));
    assert_eq!(magazine_uses(&h, magazines_id).map(|u| u.value), Some(10));
    let weapon = h.weapon(repeater_id).await;
    assert_eq!(weapon.magazine().map(|m| m.remaining), Some(4));
}

#[tokio::test]
async fn the_last_charge_ejects_the_magazine() {
    let repeater = items::repeating_crossbow();
    let magazines = items::bolt_magazine(1, 1, 10);
    let (repeater_id, magazines_id) = (repeater.id, magazines.id);
    let h = Harness::character(vec![repeater, magazines]);

    seat(&h, repeater_id, magazines_id).await;
    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload runs");
    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(repeater_id))
        .await
        .expect("fire runs");
    assert!(outcome.is_completed());

    assert!(h.effects_named("Magazine Loaded").is_empty());
    assert!(h.weapon(repeater_id).await.magazine().is_none());
    assert!(h
        .notifier
        .floaty()
        .contains(&("Ejected Bolt Magazine".to_string(), false)));

    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, Some(repeater_id))
        .await
        .expect("reload runs");
    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::NoMagazine {
            weapon: "Repeating Crossbow".into()
        })
    );
}
