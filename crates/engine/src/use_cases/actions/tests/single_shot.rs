use crate::hooks::HookKey;
use crate::test_fixtures::{items, Harness};
use crate::use_cases::actions::{ActionOutcome, FireRequest, Precondition};

#[tokio::test]
async fn reload_then_fire_spends_one_round_from_the_inventory() {
    let pistol = items::pistol();
    let rounds = items::rounds(5);
    let (pistol_id, rounds_id) = (pistol.id, rounds.id);
    let h = Harness::character(vec![pistol, rounds]);

    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, None)
        .await
        .expect("reload runs");
    assert!(outcome.is_completed());
    assert_eq!(h.quantity(rounds_id), Some(4));
    let loaded = h.effects_named("Loaded");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Loaded (Round)");
    assert!(h.weapon(pistol_id).await.is_ready_to_fire);

    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(pistol_id))
        .await
        .expect("fire runs");
    let fired = outcome
        .report()
        .and_then(|r| r.fired.clone())
        .expect("a round was fired");
    assert_eq!(fired.id, rounds_id);
    assert_eq!(fired.quantity, 1);

    assert_eq!(h.quantity(rounds_id), Some(4), "firing does not touch the stack");
    assert!(h.effects_named("Loaded").is_empty());
    assert_eq!(h.hooks.count(HookKey::WeaponAttack), 1);
    assert_eq!(h.hooks.count(HookKey::AmmunitionFire), 1);
    assert_eq!(h.hooks.fired(), vec![("Round".to_string(), 1)]);
    assert!(!h.weapon(pistol_id).await.is_ready_to_fire);
}

#[tokio::test]
async fn reloading_a_loaded_pistol_is_rejected() {
    let pistol = items::pistol();
    let pistol_id = pistol.id;
    let h = Harness::character(vec![pistol, items::rounds(5)]);

    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(pistol_id))
        .await
        .expect("reload runs");
    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, Some(pistol_id))
        .await
        .expect("reload runs");

    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::AlreadyFull {
            weapon: "Dueling Pistol".into()
        })
    );
    assert_eq!(
        h.notifier.warnings(),
        vec!["Dueling Pistol is already fully loaded".to_string()]
    );
}

#[tokio::test]
async fn unloading_puts_the_round_back() {
    let pistol = items::pistol();
    let rounds = items::rounds(5);
    let (pistol_id, rounds_id) = (pistol.id, rounds.id);
    let h = Harness::character(vec![pistol, rounds]);

    h.app
        .actions
        .reload
        .execute(h.actor_id, None)
        .await
        .expect("reload runs");
    let outcome = h
        .app
        .actions
        .unload
        .execute(h.actor_id, None)
        .await
        .expect("unload runs");

    assert!(outcome.is_completed());
    assert_eq!(h.quantity(rounds_id), Some(5));
    assert!(h.effects_named("Loaded").is_empty());
    assert!(!h.weapon(pistol_id).await.is_loaded());
}

#[tokio::test]
async fn loading_a_different_type_gives_back_the_old_rounds() {
    let musket = items::double_barrel();
    let rounds = items::rounds(5);
    let mut silver = items::rounds(3);
    silver.name = "Silver Round".into();
    silver.source_id = Some(items::source("silver-rounds"));
    let (musket_id, rounds_id, silver_id) = (musket.id, rounds.id, silver.id);
    let h = Harness::character(vec![musket, rounds, silver]);

    h.prompt.choose_next(Some(rounds_id));
    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(musket_id))
        .await
        .expect("reload runs");
    assert_eq!(h.quantity(rounds_id), Some(4));

    h.prompt.choose_next(Some(silver_id));
    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(musket_id))
        .await
        .expect("reload runs");

    assert_eq!(h.quantity(rounds_id), Some(5));
    assert_eq!(h.quantity(silver_id), Some(2));
    let weapon = h.weapon(musket_id).await;
    let standard = weapon.standard().expect("rounds loaded");
    assert_eq!(standard.ammunition.name, "Silver Round");
    assert_eq!(standard.ammunition.quantity, 1);
    assert!(h
        .notifier
        .floaty()
        .contains(&("Unloaded Round".to_string(), false)));
}

#[tokio::test]
async fn a_loaded_pistol_swaps_to_another_ammunition_type() {
    let pistol = items::pistol();
    let rounds = items::rounds(5);
    let mut silver = items::rounds(3);
    silver.name = "Silver Round".into();
    silver.source_id = Some(items::source("silver-rounds"));
    let (pistol_id, rounds_id, silver_id) = (pistol.id, rounds.id, silver.id);
    let h = Harness::character(vec![pistol, rounds, silver]);

    h.prompt.choose_next(Some(rounds_id));
    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(pistol_id))
        .await
        .expect("reload runs");
    assert_eq!(h.quantity(rounds_id), Some(4));

    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, Some(pistol_id))
        .await
        .expect("reload runs");

    assert!(outcome.is_completed(), "swap completed: {outcome:?}");
    assert_eq!(h.prompt.asked().len(), 1, "silver is the only swap");
    assert_eq!(h.quantity(rounds_id), Some(5));
    assert_eq!(h.quantity(silver_id), Some(2));
    let weapon = h.weapon(pistol_id).await;
    let standard = weapon.standard().expect("silver loaded");
    assert_eq!(standard.ammunition.id, silver_id);
    assert_eq!(weapon.loaded_quantity(), 1);
    assert!(h
        .notifier
        .floaty()
        .contains(&("Unloaded Round".to_string(), false)));
}

#[tokio::test]
async fn a_loaded_pistol_with_one_ammunition_type_is_full() {
    let pistol = items::pistol();
    let rounds = items::rounds(5);
    let (pistol_id, rounds_id) = (pistol.id, rounds.id);
    let h = Harness::character(vec![pistol, rounds]);

    h.app
        .actions
        .reload
        .execute(h.actor_id, Some(pistol_id))
        .await
        .expect("reload runs");
    h.store.clear_operations().await;

    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, Some(pistol_id))
        .await
        .expect("reload runs");

    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::AlreadyFull {
            weapon: "Dueling Pistol".into()
        })
    );
    assert_eq!(h.quantity(rounds_id), Some(4));
    assert!(h.store.operations().await.is_empty());
}

#[tokio::test]
async fn declining_the_ammunition_prompt_cancels_without_changes() {
    let pistol = items::pistol();
    let mut silver = items::rounds(3);
    silver.source_id = Some(items::source("silver-rounds"));
    let h = Harness::character(vec![pistol, items::rounds(5), silver]);

    h.prompt.choose_next(None);
    let outcome = h
        .app
        .actions
        .reload
        .execute(h.actor_id, None)
        .await
        .expect("reload runs");

    assert_eq!(outcome, ActionOutcome::Cancelled);
    assert_eq!(h.prompt.asked().len(), 1);
    assert_eq!(h.prompt.asked()[0].options.len(), 2);
    assert!(h.store.operations().await.is_empty());
    assert!(h.notifier.warnings().is_empty());
}

#[tokio::test]
async fn firing_both_barrels_needs_two_rounds() {
    let musket = items::double_barrel();
    let rounds = items::rounds(4);
    let (musket_id, rounds_id) = (musket.id, rounds.id);
    let h = Harness::character(vec![musket, rounds]);

    h.app
        .actions
        .reload
        .execute(h.actor_id, None)
        .await
        .expect("reload runs");
    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(musket_id).both_barrels())
        .await
        .expect("fire runs");
    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::InsufficientAmmunition {
            weapon: "Double-Barreled Musket".into(),
            needed: 2,
            available: 1,
        })
    );

    h.app
        .actions
        .reload
        .execute(h.actor_id, None)
        .await
        .expect("reload runs");
    assert_eq!(h.quantity(rounds_id), Some(2));
    assert_eq!(h.weapon(musket_id).await.loaded_quantity(), 2);

    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(musket_id).both_barrels())
        .await
        .expect("fire runs");
    assert_eq!(outcome.report().and_then(|r| r.fired.as_ref()).map(|a| a.quantity), Some(2));
    assert!(!h.weapon(musket_id).await.is_loaded());
}

#[tokio::test]
async fn a_bow_fires_straight_from_its_stack() {
    let bow = items::longbow();
    let arrows = items::arrows(2);
    let (bow_id, arrows_id) = (bow.id, arrows.id);
    let h = Harness::character(vec![bow, arrows]);

    for _ in 0..2 {
        let outcome = h
            .app
            .actions
            .fire
            .execute(h.actor_id, FireRequest::attack(bow_id))
            .await
            .expect("fire runs");
        assert!(outcome.is_completed());
    }

    assert_eq!(h.quantity(arrows_id), None, "an empty stack is deleted");
    let outcome = h
        .app
        .actions
        .fire
        .execute(h.actor_id, FireRequest::attack(bow_id))
        .await
        .expect("fire runs");
    assert_eq!(
        outcome.precondition(),
        Some(&Precondition::NoCompatibleAmmunition {
            weapon: "Longbow".into()
        })
    );
}
