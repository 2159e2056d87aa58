//! Ranged combat domain.
//!
//! Host documents (actors, items, patches), the canonical loadout model that
//! every weapon system produces, and the versioned records persisted in
//! effect flags. Pure data and rules: no async, no I/O.

extern crate self as ranged_combat_domain;

pub mod entities;
pub mod error;
pub mod ids;
pub mod loadout;
pub mod state;
pub mod templates;
pub mod value_objects;

pub use entities::{
    AbilityData, Actor, ActorKind, ActorProfile, AmmunitionData, AmmunitionSlot, CarryType,
    EffectData, EntityKind, Equipped, Item, ItemChange, ItemData, ItemPatch, Uses, WeaponData,
    DEFAULT_ITEM_IMG,
};
pub use error::DomainError;
pub use ids::{ActorId, ItemId};
pub use loadout::{
    accepts, ammunition_category, inspect_traits, parse_reload, Ammunition, CapacityAmmunition,
    CapacityProfile, InventoryAmmunition, LoadedAmmunition, Magazine, StandardAmmunition, Weapon,
    WeaponMarkers, CONJURED_ROUND_NAME,
};
pub use state::{
    AmmoRef, AmmoRefs, ChamberState, LoadedRoundState, MagazineState, PersistedState, StateError,
    TargetedEffectState, CURRENT_SCHEMA_VERSION, FLAG_NAMESPACE, SCHEMA_VERSION_KEY,
};
pub use templates::{slugs, EffectTemplate};
pub use value_objects::{SourceId, StackChange};
