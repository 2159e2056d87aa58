//! Value objects shared across host documents and the loadout model

mod quantity;
mod source_id;

pub use quantity::StackChange;
pub use source_id::SourceId;
