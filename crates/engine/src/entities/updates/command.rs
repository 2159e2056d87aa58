//! Queued persistence commands.

use ranged_combat_domain::{EntityKind, Item, ItemChange, ItemId, ItemPatch, SourceId};

use crate::infrastructure::ports::HostStore;

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateCommand {
    Create(Item),
    Update { kind: EntityKind, patch: ItemPatch },
    Delete { kind: EntityKind, id: ItemId },
    /// Create from a catalog template fetched during commit
    Defer(DeferredCreate),
}

impl UpdateCommand {
    pub fn target(&self) -> ItemId {
        match self {
            Self::Create(item) => item.id,
            Self::Update { patch, .. } => patch.id,
            Self::Delete { id, .. } => *id,
            Self::Defer(deferred) => deferred.id(),
        }
    }
}

/// A document to instantiate from the catalog.
///
/// The id is fixed when the command is queued so other records in the same
/// batch can reference it. `fallback` is used when the catalog entry is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredCreate {
    pub template: SourceId,
    pub patch: ItemPatch,
    pub fallback: Item,
}

impl DeferredCreate {
    pub fn new(template: SourceId, changes: Vec<ItemChange>, fallback: Item) -> Self {
        let mut patch = ItemPatch::new(fallback.id);
        for change in changes {
            patch.push(change);
        }
        Self {
            template,
            patch,
            fallback,
        }
    }

    pub fn id(&self) -> ItemId {
        self.fallback.id
    }

    pub fn kind(&self) -> EntityKind {
        self.fallback.kind()
    }

    /// Fetch the template and apply the queued changes to it.
    pub(super) async fn resolve(self, store: &dyn HostStore) -> Item {
        let fetched = match store.fetch_template(self.template.clone()).await {
            Ok(Some(item)) if item.kind() == self.kind() => Some(item),
            Ok(Some(item)) => {
                tracing::warn!(
                    template = %self.template,
                    found = item.type_name(),
                    "Catalog template has the wrong type, using local copy"
                );
                None
            }
            Ok(None) => {
                tracing::warn!(
                    template = %self.template,
                    name = %self.fallback.name,
                    "Catalog template is missing, using local copy"
                );
                None
            }
            Err(e) => {
                tracing::warn!(
                    template = %self.template,
                    error = %e,
                    "Failed to fetch catalog template, using local copy"
                );
                None
            }
        };

        let mut item = match fetched {
            Some(mut item) => {
                item.id = self.fallback.id;
                item.source_id = Some(self.template.clone());
                item
            }
            None => self.fallback,
        };
        for change in &self.patch.changes {
            if let Err(e) = item.apply(change) {
                tracing::warn!(error = %e, "Dropping change to templated document");
            }
        }
        item
    }
}
