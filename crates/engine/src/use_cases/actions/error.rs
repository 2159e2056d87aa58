//! Action errors and rejections.

use ranged_combat_domain::{ActorId, ItemId, StateError};

use crate::entities::ConfigurationError;
use crate::infrastructure::ports::StoreError;

/// Infrastructure failures inside an action. Nothing has been committed
/// when one of these is returned, unless it came from the commit itself.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("State error: {0}")]
    State(#[from] StateError),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

/// Why an action was refused. The message is shown to the user as a warning.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Precondition {
    #[error("You have no equipped weapon that can be reloaded")]
    NoReloadableWeapon,
    #[error("You have no loaded weapon")]
    NoLoadedWeapon,
    #[error("You have no weapon that uses magazines")]
    NoMagazineWeapon,
    #[error("You have no weapon with more than one type of ammunition loaded")]
    NoMixedChambers,
    #[error("You have no weapon that can switch ammunition")]
    NoSwitchableWeapon,
    #[error("That item is not one of your weapons")]
    WeaponNotFound(ItemId),
    #[error("That item no longer exists")]
    ItemNotFound(ItemId),
    #[error("{weapon} is already fully loaded")]
    AlreadyFull { weapon: String },
    #[error("{weapon} is already loaded")]
    AlreadyCocked { weapon: String },
    #[error("You have no ammunition that {weapon} can load")]
    NoCompatibleAmmunition { weapon: String },
    #[error("{weapon} needs {needed} rounds but only {available} are available")]
    InsufficientAmmunition {
        weapon: String,
        needed: u32,
        available: u32,
    },
    #[error("{weapon} has no magazine loaded")]
    NoMagazine { weapon: String },
    #[error("{weapon}'s magazine is empty")]
    MagazineEmpty { weapon: String },
    #[error("{weapon}'s magazine is swapped automatically")]
    MagazinesUntracked { weapon: String },
    #[error("{weapon} already has a magazine with at least as many rounds")]
    NoBetterMagazine { weapon: String },
    #[error("{weapon} has nothing to switch to")]
    NoOtherAmmunition { weapon: String },
    #[error("{weapon} is not loaded")]
    NotLoaded { weapon: String },
    #[error("{weapon} must be readied before it can fire")]
    NotCocked { weapon: String },
    #[error("{weapon} cannot fire both barrels")]
    NotDoubleBarrel { weapon: String },
    #[error("You cannot conjure bullets")]
    CannotConjure,
    #[error("You have no equipped firearm with room for a conjured bullet")]
    NoFirearmWithRoom,
    #[error("{weapon} already has a conjured bullet")]
    AlreadyConjured { weapon: String },
    #[error("{weapon} has no action named {label}")]
    UnknownAuxiliaryAction { weapon: String, label: String },
}
