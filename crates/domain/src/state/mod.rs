//! Versioned records persisted in effect flags.
//!
//! Each effect created by the engine carries exactly one record under the
//! [`FLAG_NAMESPACE`] flag. Records are stamped with `schemaVersion`; reads
//! run the migration chain from the stored version up to
//! [`CURRENT_SCHEMA_VERSION`] and validate the result before it is used.

mod chamber;
mod loaded_round;
mod magazine;
mod targeted;

pub use chamber::ChamberState;
pub use loaded_round::{AmmoRef, AmmoRefs, LoadedRoundState};
pub use magazine::MagazineState;
pub use targeted::TargetedEffectState;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use ranged_combat_domain::{Item, ItemChange};

pub const FLAG_NAMESPACE: &str = "ranged-combat";
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Records without a stamp predate versioning
const UNVERSIONED: u32 = 1;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("{record} is missing from effect '{effect}'")]
    Missing {
        record: &'static str,
        effect: String,
    },

    #[error("{record} has unsupported schema version {version}")]
    UnsupportedVersion { record: &'static str, version: u64 },

    #[error("{record} is malformed: {message}")]
    Malformed {
        record: &'static str,
        message: String,
    },

    #[error("{record} failed validation: {message}")]
    Invalid {
        record: &'static str,
        message: String,
    },
}

impl StateError {
    pub fn malformed(record: &'static str, message: impl ToString) -> Self {
        Self::Malformed {
            record,
            message: message.to_string(),
        }
    }

    pub fn invalid(record: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            record,
            message: message.to_string(),
        }
    }
}

/// A record stored in an effect's flags.
pub trait PersistedState: Serialize + DeserializeOwned + Sized {
    /// Record name for logs and errors
    const RECORD: &'static str;

    /// Upgrade a payload stored at version `from` to `from + 1`.
    fn migrate_step(_from: u32, _payload: &mut Map<String, Value>) -> Result<(), StateError> {
        Ok(())
    }

    fn validate(&self) -> Result<(), StateError>;

    /// Decode a stored payload, migrating and validating it.
    fn from_value(value: &Value) -> Result<Self, StateError> {
        let mut payload = value
            .as_object()
            .cloned()
            .ok_or_else(|| StateError::malformed(Self::RECORD, "expected an object"))?;

        let version = match payload.remove(SCHEMA_VERSION_KEY) {
            None => u64::from(UNVERSIONED),
            Some(v) => v.as_u64().ok_or_else(|| {
                StateError::malformed(Self::RECORD, "schemaVersion is not a number")
            })?,
        };
        if version < u64::from(UNVERSIONED) || version > u64::from(CURRENT_SCHEMA_VERSION) {
            return Err(StateError::UnsupportedVersion {
                record: Self::RECORD,
                version,
            });
        }

        // Bounded by CURRENT_SCHEMA_VERSION above
        let mut version = version as u32;
        while version < CURRENT_SCHEMA_VERSION {
            Self::migrate_step(version, &mut payload)?;
            version += 1;
        }

        let state: Self = serde_json::from_value(Value::Object(payload))
            .map_err(|e| StateError::malformed(Self::RECORD, e))?;
        state.validate()?;
        Ok(state)
    }

    /// Encode at the current schema version.
    fn to_value(&self) -> Result<Value, StateError> {
        self.validate()?;
        let mut value =
            serde_json::to_value(self).map_err(|e| StateError::malformed(Self::RECORD, e))?;
        match value.as_object_mut() {
            Some(payload) => {
                payload.insert(
                    SCHEMA_VERSION_KEY.to_string(),
                    Value::from(CURRENT_SCHEMA_VERSION),
                );
            }
            None => return Err(StateError::malformed(Self::RECORD, "expected an object")),
        }
        Ok(value)
    }

    /// Read the record from an effect document.
    fn read(item: &Item) -> Result<Self, StateError> {
        let payload = item
            .as_effect()
            .and_then(|effect| effect.flags.get(FLAG_NAMESPACE))
            .ok_or_else(|| StateError::Missing {
                record: Self::RECORD,
                effect: item.name.clone(),
            })?;
        Self::from_value(payload)
    }

    /// The patch change that stores this record on an effect.
    fn to_change(&self) -> Result<ItemChange, StateError> {
        Ok(ItemChange::Flag {
            key: FLAG_NAMESPACE.to_string(),
            value: self.to_value()?,
        })
    }
}
