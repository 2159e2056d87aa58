//! Host documents as the rules engine sees them

mod actor;
mod item;
mod patch;

pub use actor::{Actor, ActorKind, ActorProfile};
pub use item::{
    AbilityData, AmmunitionData, AmmunitionSlot, CarryType, EffectData, EntityKind, Equipped,
    Item, ItemData, Uses, WeaponData, DEFAULT_ITEM_IMG,
};
pub use patch::{ItemChange, ItemPatch};
