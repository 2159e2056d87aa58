use serde::{Deserialize, Serialize};

use super::{PersistedState, StateError};
use ranged_combat_domain::ItemId;

/// An effect that applies to one weapon (conjured rounds, feat bonuses,
/// projected ammunition rules).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedEffectState {
    pub target_id: ItemId,
}

impl TargetedEffectState {
    pub fn new(target_id: ItemId) -> Self {
        Self { target_id }
    }
}

impl PersistedState for TargetedEffectState {
    const RECORD: &'static str = "targeted effect";

    fn validate(&self) -> Result<(), StateError> {
        Ok(())
    }
}
