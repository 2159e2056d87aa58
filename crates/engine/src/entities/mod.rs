//! Entity modules - the engine-side building blocks actions are made of.
//!
//! `weapon_systems` turns host documents into the canonical weapon model,
//! `updates` collects what an action wants to change.

pub mod updates;
pub mod weapon_systems;

pub use updates::{CommitSummary, FloatyText, Updates};
pub use weapon_systems::{
    AmmunitionTracking, ConfigurationError, RoundCustody, WeaponSystem, WeaponSystems,
};
