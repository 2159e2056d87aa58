use serde::{Deserialize, Serialize};

use super::{AmmoRef, PersistedState, StateError};
use ranged_combat_domain::ItemId;

/// Which loaded ammunition type a capacity weapon fires next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChamberState {
    pub target_id: ItemId,
    pub ammunition: AmmoRef,
}

impl PersistedState for ChamberState {
    const RECORD: &'static str = "chamber selection";

    fn validate(&self) -> Result<(), StateError> {
        if self.ammunition.name.trim().is_empty() {
            return Err(StateError::invalid(Self::RECORD, "ammunition has no name"));
        }
        Ok(())
    }
}
