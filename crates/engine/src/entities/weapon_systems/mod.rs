//! Weapon systems.
//!
//! Each system knows one way the host persists loaded ammunition and turns
//! it into the canonical [`Weapon`] model, and back. Exactly one system
//! claims an actor, based on its [`ActorCapabilities`]. Everything the
//! systems have in common (classification, compatible ammunition, marker
//! effects and derived fields) happens here, outside the systems.

mod advanced;
mod markers;
mod native;
mod simple;

pub use advanced::AdvancedSystem;
pub use native::NativeSystem;
pub use simple::SimpleSystem;

use std::sync::Arc;

use ranged_combat_domain::{
    Actor, ActorId, ActorKind, InventoryAmmunition, Item, StateError, Weapon,
};

use crate::entities::updates::Updates;
use crate::infrastructure::app_settings::{ActorCapabilities, EngineSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmmunitionTracking {
    /// Loaded ammunition is stored as weapon sub-items by the host
    Native,
    /// Loaded ammunition is stored in effect flags
    Advanced,
    /// Only a chamber count is stored; rounds stay in the inventory
    Simple,
}

impl std::fmt::Display for AmmunitionTracking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Advanced => write!(f, "advanced"),
            Self::Simple => write!(f, "simple"),
        }
    }
}

/// Where rounds live between loading and firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundCustody {
    /// Loading moves rounds out of the inventory into the weapon
    Weapon,
    /// Rounds stay in the inventory and are spent from it when fired
    Inventory,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("No weapon system handles {kind} actor {actor_id}")]
    Unclaimed { actor_id: ActorId, kind: ActorKind },

    #[error("Weapon systems {systems:?} all claim {kind} actor {actor_id}")]
    Ambiguous {
        actor_id: ActorId,
        kind: ActorKind,
        systems: Vec<AmmunitionTracking>,
    },
}

pub trait WeaponSystem: Send + Sync {
    fn tracking(&self) -> AmmunitionTracking;

    fn claims(&self, capabilities: &ActorCapabilities) -> bool;

    fn round_custody(&self) -> RoundCustody;

    /// Whether magazines can be swapped as a separate action
    fn supports_magazines(&self) -> bool {
        true
    }

    /// Fill `weapon.loaded_ammunition` from this system's persisted shape.
    fn read_loaded(&self, actor: &Actor, item: &Item, weapon: &mut Weapon);

    /// Queue the persisted form of the weapon's current loaded ammunition,
    /// recording any marker it creates on `weapon`. Conjured rounds and the
    /// cocked and chamber markers are written by the actions themselves.
    fn write_loaded(&self, weapon: &mut Weapon, updates: &mut Updates) -> Result<(), StateError>;
}

pub struct WeaponSystems {
    settings: Arc<EngineSettings>,
    systems: Vec<Arc<dyn WeaponSystem>>,
}

impl WeaponSystems {
    pub fn new(settings: Arc<EngineSettings>) -> Self {
        Self::with_systems(
            settings,
            vec![
                Arc::new(NativeSystem),
                Arc::new(AdvancedSystem),
                Arc::new(SimpleSystem),
            ],
        )
    }

    pub fn with_systems(settings: Arc<EngineSettings>, systems: Vec<Arc<dyn WeaponSystem>>) -> Self {
        Self { settings, systems }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// The one system that owns this actor
    pub fn resolve(&self, actor: &Actor) -> Result<Arc<dyn WeaponSystem>, ConfigurationError> {
        let capabilities = self.settings.capabilities_for(actor);
        let mut claiming = self.systems.iter().filter(|s| s.claims(&capabilities));
        match (claiming.next(), claiming.next()) {
            (Some(system), None) => Ok(system.clone()),
            (None, _) => Err(ConfigurationError::Unclaimed {
                actor_id: actor.id,
                kind: actor.kind,
            }),
            (Some(_), Some(_)) => Err(ConfigurationError::Ambiguous {
                actor_id: actor.id,
                kind: actor.kind,
                systems: self
                    .systems
                    .iter()
                    .filter(|s| s.claims(&capabilities))
                    .map(|s| s.tracking())
                    .collect(),
            }),
        }
    }

    /// Every weapon the actor carries. A configuration error is logged and
    /// yields no weapons.
    pub fn get_weapons(&self, actor: &Actor) -> Vec<Weapon> {
        let system = match self.resolve(actor) {
            Ok(system) => system,
            Err(e) => {
                tracing::error!(actor_id = %actor.id, error = %e, "Cannot list weapons");
                return Vec::new();
            }
        };
        actor
            .weapons()
            .filter_map(|item| build_weapon(system.as_ref(), actor, item))
            .collect()
    }

    pub fn transform_weapon(
        &self,
        actor: &Actor,
        item: &Item,
    ) -> Result<Option<Weapon>, ConfigurationError> {
        let system = self.resolve(actor)?;
        Ok(build_weapon(system.as_ref(), actor, item))
    }
}

fn build_weapon(system: &dyn WeaponSystem, actor: &Actor, item: &Item) -> Option<Weapon> {
    let mut weapon = Weapon::from_item(item)?;
    weapon.compatible_ammunition = compatible_ammunition(actor, &weapon);
    markers::read_markers(actor, &mut weapon);
    system.read_loaded(actor, item, &mut weapon);
    weapon.refresh_derived();
    Some(weapon)
}

/// Carried stacks the weapon can load; stowed stacks are left out.
fn compatible_ammunition(actor: &Actor, weapon: &Weapon) -> Vec<InventoryAmmunition> {
    actor
        .ammunition()
        .filter_map(InventoryAmmunition::from_item)
        .filter(|a| !a.is_stowed && weapon.accepts(&a.ammunition))
        .collect()
}
