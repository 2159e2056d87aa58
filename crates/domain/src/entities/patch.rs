//! Explicit document patches.
//!
//! Every mutation the engine asks the host to perform is one of these
//! field-level changes. Patches for the same document merge field by field,
//! the later value winning.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use ranged_combat_domain::{DomainError, Item, ItemData, ItemId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ItemChange {
    Name(String),
    Quantity(u32),
    UsesValue(u32),
    SelectedAmmo(Option<ItemId>),
    Subitems(Vec<Item>),
    Rules(Vec<Value>),
    /// Replace one namespaced flag payload on an effect
    Flag { key: String, value: Value },
}

impl ItemChange {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name(_) => "name",
            Self::Quantity(_) => "quantity",
            Self::UsesValue(_) => "uses",
            Self::SelectedAmmo(_) => "selected ammunition",
            Self::Subitems(_) => "sub-items",
            Self::Rules(_) => "rules",
            Self::Flag { .. } => "flag",
        }
    }

    /// Whether `other` writes the same field, so one replaces the other
    fn same_field(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Flag { key: a, .. }, Self::Flag { key: b, .. }) => a == b,
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPatch {
    pub id: ItemId,
    pub changes: Vec<ItemChange>,
}

impl ItemPatch {
    pub fn new(id: ItemId) -> Self {
        Self {
            id,
            changes: Vec::new(),
        }
    }

    pub fn with(mut self, change: ItemChange) -> Self {
        self.push(change);
        self
    }

    /// Add a change, replacing any earlier change to the same field
    pub fn push(&mut self, change: ItemChange) {
        match self.changes.iter_mut().find(|c| c.same_field(&change)) {
            Some(existing) => *existing = change,
            None => self.changes.push(change),
        }
    }

    pub fn merge(&mut self, other: ItemPatch) {
        for change in other.changes {
            self.push(change);
        }
    }
}

impl Item {
    /// Apply one change in place.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChange` when the change targets a field
    /// this document type does not have.
    pub fn apply(&mut self, change: &ItemChange) -> Result<(), DomainError> {
        let item_type = self.type_name();
        let invalid = |name: &str| DomainError::invalid_change(change.label(), item_type, name);

        match (change, &mut self.data) {
            (ItemChange::Name(name), _) => self.name = name.clone(),
            (ItemChange::Quantity(quantity), ItemData::Ammunition(data)) => {
                data.quantity = *quantity
            }
            (ItemChange::UsesValue(value), ItemData::Ammunition(data)) => match &mut data.uses {
                Some(uses) => uses.value = (*value).min(uses.max),
                None => return Err(invalid(&self.name)),
            },
            (ItemChange::SelectedAmmo(id), ItemData::Weapon(data)) => data.selected_ammo_id = *id,
            (ItemChange::Subitems(items), ItemData::Weapon(data)) => {
                data.subitems = items.clone()
            }
            (ItemChange::Rules(rules), ItemData::Effect(data)) => data.rules = rules.clone(),
            (ItemChange::Flag { key, value }, ItemData::Effect(data)) => {
                data.flags.insert(key.clone(), value.clone());
            }
            _ => return Err(invalid(&self.name)),
        }
        Ok(())
    }

    pub fn apply_all<'a>(
        &mut self,
        changes: impl IntoIterator<Item = &'a ItemChange>,
    ) -> Result<(), DomainError> {
        for change in changes {
            self.apply(change)?;
        }
        Ok(())
    }
}
