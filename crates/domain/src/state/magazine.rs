use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PersistedState, StateError};
use ranged_combat_domain::{ItemId, SourceId};

/// The magazine currently seated in a repeating weapon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MagazineState {
    pub target_id: ItemId,
    pub capacity: u32,
    pub remaining: u32,
    pub ammunition_name: String,
    pub ammunition_img: String,
    pub ammunition_item_id: ItemId,
    pub ammunition_source_id: Option<SourceId>,
    /// Drops out of the weapon once its last charge is spent
    #[serde(default = "default_auto_eject")]
    pub auto_eject: bool,
}

fn default_auto_eject() -> bool {
    true
}

impl PersistedState for MagazineState {
    const RECORD: &'static str = "magazine";

    /// Version 1 called the stack reference `ammunitionId`.
    fn migrate_step(from: u32, payload: &mut Map<String, Value>) -> Result<(), StateError> {
        if from == 1 && !payload.contains_key("ammunitionItemId") {
            if let Some(id) = payload.remove("ammunitionId") {
                payload.insert("ammunitionItemId".to_string(), id);
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), StateError> {
        if self.capacity == 0 {
            return Err(StateError::invalid(Self::RECORD, "capacity must be positive"));
        }
        if self.remaining > self.capacity {
            return Err(StateError::invalid(
                Self::RECORD,
                format!(
                    "{} rounds remaining exceeds capacity {}",
                    self.remaining, self.capacity
                ),
            ));
        }
        Ok(())
    }
}
