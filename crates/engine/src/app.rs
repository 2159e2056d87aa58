//! Application composition.

use std::sync::Arc;

use ranged_combat_domain::{ActorId, Weapon};

use crate::entities::WeaponSystems;
use crate::feats;
use crate::hooks::HookBus;
use crate::infrastructure::app_settings::EngineSettings;
use crate::infrastructure::ports::{HostStore, NotificationPort, PromptPort};
use crate::use_cases::actions::{ActionError, ActionPorts, AmmunitionActions};

/// Main application state.
///
/// Holds the ports, the weapon systems and every action, wired once.
pub struct App {
    pub settings: Arc<EngineSettings>,
    pub systems: Arc<WeaponSystems>,
    pub hooks: Arc<HookBus>,
    pub actions: AmmunitionActions,
    ports: ActionPorts,
}

impl App {
    /// Create an App with the built-in feats registered.
    pub fn new(
        store: Arc<dyn HostStore>,
        prompt: Arc<dyn PromptPort>,
        notifier: Arc<dyn NotificationPort>,
        settings: EngineSettings,
    ) -> Self {
        let mut hooks = HookBus::new();
        feats::register_all(&mut hooks);
        Self::with_hooks(store, prompt, notifier, settings, hooks)
    }

    /// Create an App around a bus the caller has already filled.
    pub fn with_hooks(
        store: Arc<dyn HostStore>,
        prompt: Arc<dyn PromptPort>,
        notifier: Arc<dyn NotificationPort>,
        settings: EngineSettings,
        hooks: HookBus,
    ) -> Self {
        let settings = Arc::new(settings);
        let systems = Arc::new(WeaponSystems::new(settings.clone()));
        let hooks = Arc::new(hooks);
        let ports = ActionPorts {
            store,
            prompt,
            notifier,
            hooks: hooks.clone(),
            systems: systems.clone(),
        };
        tracing::debug!(
            host_subitems = settings.host_subitem_ammunition,
            npc_tracking = %settings.npc_ammunition_tracking,
            "Ranged combat engine ready"
        );
        Self {
            settings,
            systems,
            hooks,
            actions: AmmunitionActions::new(ports.clone()),
            ports,
        }
    }

    /// The actor's weapons as they are now.
    pub async fn weapons(&self, actor_id: ActorId) -> Result<Vec<Weapon>, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        Ok(self.systems.get_weapons(&actor))
    }
}
