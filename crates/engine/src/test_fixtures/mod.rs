//! Test fixtures and common test helpers.
//!
//! Fakes for the interaction ports plus builders for the weapons and
//! ammunition most scenarios start from.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ranged_combat_domain::{
    Actor, ActorId, ActorKind, AmmunitionData, Equipped, Item, ItemId, SourceId, Uses, Weapon,
    WeaponData,
};

use crate::feats;
use crate::hooks::{HookBus, HookError, HookEvent, HookKey, HookSubscriber};
use crate::infrastructure::app_settings::EngineSettings;
use crate::infrastructure::in_memory::InMemoryHostStore;
use crate::infrastructure::ports::{ChoicePrompt, NotificationPort, PromptPort};
use crate::App;

/// Install a subscriber once so `RUST_LOG` works in tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Interaction fakes
// =============================================================================

/// Keeps every warning and floating text it is sent
#[derive(Default)]
pub struct RecordingNotifier {
    warnings: Mutex<Vec<String>>,
    floaty: Mutex<Vec<(String, bool)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().expect("notifier lock").clone()
    }

    pub fn floaty(&self) -> Vec<(String, bool)> {
        self.floaty.lock().expect("notifier lock").clone()
    }
}

impl NotificationPort for RecordingNotifier {
    fn warn(&self, _actor: ActorId, message: &str) {
        self.warnings
            .lock()
            .expect("notifier lock")
            .push(message.to_string());
    }

    fn floaty_text(&self, _actor: ActorId, text: &str, positive: bool) {
        self.floaty
            .lock()
            .expect("notifier lock")
            .push((text.to_string(), positive));
    }
}

/// Answers prompts from a script; an exhausted script declines
#[derive(Default)]
pub struct ScriptedPrompt {
    choices: Mutex<VecDeque<Option<ItemId>>>,
    confirmations: Mutex<VecDeque<bool>>,
    asked: Mutex<Vec<ChoicePrompt>>,
}

impl ScriptedPrompt {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn choose_next(&self, choice: Option<ItemId>) {
        self.choices.lock().expect("prompt lock").push_back(choice);
    }

    pub fn confirm_next(&self, answer: bool) {
        self.confirmations
            .lock()
            .expect("prompt lock")
            .push_back(answer);
    }

    /// Every choice prompt shown so far
    pub fn asked(&self) -> Vec<ChoicePrompt> {
        self.asked.lock().expect("prompt lock").clone()
    }
}

#[async_trait]
impl PromptPort for ScriptedPrompt {
    async fn choose(&self, _actor: ActorId, prompt: ChoicePrompt) -> Option<ItemId> {
        self.asked.lock().expect("prompt lock").push(prompt);
        self.choices
            .lock()
            .expect("prompt lock")
            .pop_front()
            .flatten()
    }

    async fn confirm(&self, _actor: ActorId, _title: String, _message: String) -> bool {
        self.confirmations
            .lock()
            .expect("prompt lock")
            .pop_front()
            .unwrap_or(false)
    }
}

// =============================================================================
// Items
// =============================================================================

pub mod items {
    use super::*;

    pub fn source(slug: &str) -> SourceId {
        SourceId::new(format!("Compendium.pf2e.equipment-srd.Item.{slug}")).expect("valid source")
    }

    fn ranged(name: &str, group: &str, traits: &[&str], reload: &str) -> Item {
        Item::weapon(
            name,
            WeaponData {
                traits: traits.iter().map(|t| t.to_string()).collect(),
                group: Some(group.into()),
                reload: Some(reload.into()),
                range: Some(60),
                equipped: Equipped::held(1),
                ..WeaponData::default()
            },
        )
    }

    pub fn pistol() -> Item {
        ranged("Dueling Pistol", "firearm", &["concussive"], "1")
    }

    pub fn crossbow() -> Item {
        ranged("Crossbow", "crossbow", &[], "1")
    }

    pub fn capacity_crossbow() -> Item {
        ranged("Triple Crossbow", "crossbow", &["capacity-3"], "1")
    }

    pub fn double_barrel() -> Item {
        ranged("Double-Barreled Musket", "firearm", &["double-barrel"], "1")
    }

    pub fn repeating_crossbow() -> Item {
        ranged("Repeating Crossbow", "crossbow", &["repeating"], "1")
    }

    pub fn longbow() -> Item {
        ranged("Longbow", "bow", &[], "0")
    }

    pub fn bolts(quantity: u32) -> Item {
        Item::ammunition("Bolt", AmmunitionData::new(quantity, "bolts")).with_source(source("bolts"))
    }

    /// Bolts for a different catalog entry
    pub fn barbed_bolts(quantity: u32) -> Item {
        Item::ammunition("Barbed Bolt", AmmunitionData::new(quantity, "bolts"))
            .with_source(source("barbed-bolts"))
    }

    pub fn rounds(quantity: u32) -> Item {
        Item::ammunition("Round", AmmunitionData::new(quantity, "rounds"))
            .with_source(source("rounds"))
    }

    pub fn arrows(quantity: u32) -> Item {
        Item::ammunition("Arrow", AmmunitionData::new(quantity, "arrows"))
            .with_source(source("arrows"))
    }

    pub fn bolt_magazine(quantity: u32, remaining: u32, capacity: u32) -> Item {
        let mut data = AmmunitionData::new(quantity, "bolts");
        data.uses = Some(Uses::new(remaining, capacity));
        Item::ammunition("Bolt Magazine", data).with_source(source("bolt-magazine"))
    }

    pub fn piercing_magazine(quantity: u32, remaining: u32, capacity: u32) -> Item {
        let mut data = AmmunitionData::new(quantity, "bolts");
        data.uses = Some(Uses::new(remaining, capacity));
        Item::ammunition("Piercing Magazine", data).with_source(source("piercing-magazine"))
    }
}

// =============================================================================
// Hooks
// =============================================================================

/// Counts every event it sees and keeps the names of fired ammunition
#[derive(Default)]
pub struct HookRecorder {
    keys: Mutex<Vec<HookKey>>,
    fired: Mutex<Vec<(String, u32)>>,
}

impl HookRecorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register for every key on `bus`
    pub fn attach(self: &Arc<Self>, bus: &mut HookBus) {
        for key in [
            HookKey::WeaponAttack,
            HookKey::WeaponDamage,
            HookKey::Reload,
            HookKey::AmmunitionFire,
            HookKey::AuxiliaryActions,
            HookKey::PostAction,
        ] {
            bus.register(key, self.clone());
        }
    }

    pub fn count(&self, key: HookKey) -> usize {
        self.keys
            .lock()
            .expect("recorder lock")
            .iter()
            .filter(|k| **k == key)
            .count()
    }

    pub fn fired(&self) -> Vec<(String, u32)> {
        self.fired.lock().expect("recorder lock").clone()
    }
}

#[async_trait]
impl HookSubscriber for HookRecorder {
    fn name(&self) -> &'static str {
        "hook-recorder"
    }

    async fn handle(&self, event: &mut HookEvent<'_>) -> Result<(), HookError> {
        self.keys.lock().expect("recorder lock").push(event.key());
        if let HookEvent::AmmunitionFire { ammunition, .. } = event {
            self.fired
                .lock()
                .expect("recorder lock")
                .push((ammunition.name.clone(), ammunition.quantity));
        }
        Ok(())
    }
}

// =============================================================================
// Harness
// =============================================================================

/// An engine wired to an in-memory host with one actor
pub struct Harness {
    pub store: Arc<InMemoryHostStore>,
    pub prompt: Arc<ScriptedPrompt>,
    pub notifier: Arc<RecordingNotifier>,
    pub hooks: Arc<HookRecorder>,
    pub app: App,
    pub actor_id: ActorId,
}

impl Harness {
    pub fn character(items: Vec<Item>) -> Self {
        Self::build(ActorKind::Character, items, EngineSettings::default())
    }

    pub fn npc(items: Vec<Item>) -> Self {
        Self::build(ActorKind::Npc, items, EngineSettings::default())
    }

    pub fn build(kind: ActorKind, items: Vec<Item>, settings: EngineSettings) -> Self {
        init_tracing();
        let actor = items
            .into_iter()
            .fold(Actor::new("Kyra", kind), Actor::with_item);
        let actor_id = actor.id;

        let store = Arc::new(InMemoryHostStore::new());
        store.insert_actor(actor);
        let prompt = ScriptedPrompt::new();
        let notifier = RecordingNotifier::new();
        let hooks = HookRecorder::new();

        let mut bus = HookBus::new();
        feats::register_all(&mut bus);
        hooks.attach(&mut bus);
        let app = App::with_hooks(
            store.clone(),
            prompt.clone(),
            notifier.clone(),
            settings,
            bus,
        );

        Self {
            store,
            prompt,
            notifier,
            hooks,
            app,
            actor_id,
        }
    }

    pub fn actor(&self) -> Actor {
        self.store.actor(self.actor_id).expect("actor exists")
    }

    pub fn item(&self, id: ItemId) -> Option<Item> {
        self.store.item(self.actor_id, id)
    }

    pub fn quantity(&self, id: ItemId) -> Option<u32> {
        self.item(id)
            .and_then(|i| i.as_ammunition().map(|a| a.quantity))
    }

    /// All ammunition stacks of one catalog entry
    pub fn stacks_of(&self, source: &SourceId) -> Vec<Item> {
        self.actor()
            .ammunition()
            .filter(|i| i.source_id.as_ref() == Some(source))
            .cloned()
            .collect()
    }

    pub fn effects_named(&self, prefix: &str) -> Vec<Item> {
        self.actor()
            .effects()
            .filter(|e| e.name.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub async fn weapon(&self, id: ItemId) -> Weapon {
        self.app
            .weapons(self.actor_id)
            .await
            .expect("weapons load")
            .into_iter()
            .find(|w| w.id == id)
            .expect("weapon present")
    }
}
