use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{PersistedState, StateError};
use ranged_combat_domain::{ItemId, SourceId};

/// Reference to the ammunition a round was loaded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmmoRef {
    pub name: String,
    pub img: String,
    pub id: ItemId,
    pub source_id: Option<SourceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

/// One reference, or one per chamber type for capacity weapons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmmoRefs {
    Many(Vec<AmmoRef>),
    One(AmmoRef),
}

impl AmmoRefs {
    pub fn as_slice(&self) -> &[AmmoRef] {
        match self {
            Self::Many(refs) => refs,
            Self::One(r) => std::slice::from_ref(r),
        }
    }
}

/// The "loaded" marker of a weapon.
///
/// Without `ammunition` it is either the cocked marker of a repeating weapon
/// or, when rounds stay in the inventory, a plain chamber count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadedRoundState {
    pub target_id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ammunition: Option<AmmoRefs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded_chambers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
}

impl LoadedRoundState {
    pub fn cocked(target_id: ItemId) -> Self {
        Self {
            target_id,
            ammunition: None,
            loaded_chambers: None,
            capacity: None,
        }
    }

    pub fn chamber_count(target_id: ItemId, loaded: u32, capacity: u32) -> Self {
        Self {
            target_id,
            ammunition: None,
            loaded_chambers: Some(loaded),
            capacity: Some(capacity),
        }
    }

    /// A single ammunition type; the count is only stored for multi-round weapons
    pub fn single(target_id: ItemId, ammunition: AmmoRef, loaded: u32, capacity: u32) -> Self {
        let (loaded_chambers, capacity) = if capacity > 1 {
            (Some(loaded), Some(capacity))
        } else {
            (None, None)
        };
        Self {
            target_id,
            ammunition: Some(AmmoRefs::One(ammunition)),
            loaded_chambers,
            capacity,
        }
    }

    /// One entry per chamber type, each carrying its round count
    pub fn chambers(target_id: ItemId, chambers: Vec<AmmoRef>, capacity: u32) -> Self {
        let loaded = chambers.iter().filter_map(|c| c.quantity).sum();
        Self {
            target_id,
            ammunition: Some(AmmoRefs::Many(chambers)),
            loaded_chambers: Some(loaded),
            capacity: Some(capacity),
        }
    }

    pub fn refs(&self) -> &[AmmoRef] {
        self.ammunition
            .as_ref()
            .map(AmmoRefs::as_slice)
            .unwrap_or(&[])
    }
}

impl PersistedState for LoadedRoundState {
    const RECORD: &'static str = "loaded round";

    /// Version 1 stored one reference plus `loadedChambers` even for capacity
    /// weapons; version 2 keeps one counted reference per chamber type.
    fn migrate_step(from: u32, payload: &mut Map<String, Value>) -> Result<(), StateError> {
        if from != 1 {
            return Ok(());
        }
        let multi_round = payload
            .get("capacity")
            .and_then(Value::as_u64)
            .is_some_and(|c| c > 1);
        let loaded = payload.get("loadedChambers").and_then(Value::as_u64);

        if let (true, Some(loaded)) = (multi_round, loaded) {
            if let Some(Value::Object(single)) = payload.get("ammunition").cloned() {
                let mut counted = single;
                counted.insert("quantity".to_string(), Value::from(loaded));
                payload.insert(
                    "ammunition".to_string(),
                    Value::Array(vec![Value::Object(counted)]),
                );
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), StateError> {
        if let (Some(loaded), Some(capacity)) = (self.loaded_chambers, self.capacity) {
            if loaded > capacity {
                return Err(StateError::invalid(
                    Self::RECORD,
                    format!("{loaded} chambers loaded but capacity is {capacity}"),
                ));
            }
        }
        if let Some(AmmoRefs::Many(refs)) = &self.ammunition {
            if refs.is_empty() {
                return Err(StateError::invalid(Self::RECORD, "empty chamber list"));
            }
            let mut total = 0;
            for r in refs {
                match r.quantity {
                    Some(q) if q > 0 => total += q,
                    _ => {
                        return Err(StateError::invalid(
                            Self::RECORD,
                            format!("chamber '{}' has no rounds", r.name),
                        ))
                    }
                }
            }
            if self.loaded_chambers.is_some_and(|loaded| loaded != total) {
                return Err(StateError::invalid(
                    Self::RECORD,
                    "chamber counts do not add up to loadedChambers",
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bolt_ref(quantity: Option<u32>) -> AmmoRef {
        AmmoRef {
            name: "Bolt".into(),
            img: "bolt.webp".into(),
            id: ItemId::new(),
            source_id: SourceId::new("Compendium.pf2e.equipment-srd.Item.bolts").ok(),
            quantity,
        }
    }

    #[test]
    fn wire_format_uses_host_field_names() {
        let state = LoadedRoundState::single(ItemId::new(), bolt_ref(None), 1, 1);
        let value = state.to_value().expect("valid");

        assert!(value.get("targetId").is_some());
        assert!(value["ammunition"].get("sourceId").is_some());
        assert!(value.get("loadedChambers").is_none());
        assert_eq!(value["schemaVersion"], json!(2));
    }

    #[test]
    fn version_one_capacity_record_becomes_counted_chambers() {
        let bolt = bolt_ref(None);
        let stored = json!({
            "targetId": ItemId::new(),
            "ammunition": bolt,
            "loadedChambers": 3,
            "capacity": 4
        });

        let state = LoadedRoundState::from_value(&stored).expect("migrates");

        assert_eq!(state.refs().len(), 1);
        assert_eq!(state.refs()[0].quantity, Some(3));
        assert!(matches!(state.ammunition, Some(AmmoRefs::Many(_))));
    }

    #[test]
    fn version_one_single_shot_record_is_unchanged() {
        let stored = json!({ "targetId": ItemId::new(), "ammunition": bolt_ref(None) });
        let state = LoadedRoundState::from_value(&stored).expect("migrates");
        assert!(matches!(state.ammunition, Some(AmmoRefs::One(_))));
    }

    #[test]
    fn mismatched_chamber_counts_fail_validation() {
        let mut state = LoadedRoundState::chambers(
            ItemId::new(),
            vec![bolt_ref(Some(2)), bolt_ref(Some(1))],
            3,
        );
        state.loaded_chambers = Some(2);
        assert!(matches!(
            state.validate(),
            Err(StateError::Invalid { .. })
        ));
    }

    #[test]
    fn overfilled_record_fails_validation() {
        let state = LoadedRoundState::chamber_count(ItemId::new(), 4, 3);
        assert!(state.to_value().is_err());
    }

    #[test]
    fn cocked_marker_has_no_ammunition() {
        let state = LoadedRoundState::cocked(ItemId::new());
        let value = state.to_value().expect("valid");
        let read = LoadedRoundState::from_value(&value).expect("valid");
        assert!(read.refs().is_empty());
    }
}
