//! Canonical loadout model shared by every weapon system

mod ammunition;
mod inspection;
mod loaded;
mod weapon;

pub use ammunition::{Ammunition, InventoryAmmunition, CONJURED_ROUND_NAME};
pub use inspection::{accepts, ammunition_category, inspect_traits, parse_reload, CapacityProfile};
pub use loaded::{CapacityAmmunition, LoadedAmmunition, Magazine, StandardAmmunition};
pub use weapon::{Weapon, WeaponMarkers};
