//! Update accumulator.
//!
//! An action queues every mutation it needs as data, in order, and commits
//! them in one pass: a resolve phase turns deferred template creates into
//! concrete documents, then an apply phase issues at most one create, one
//! update and one delete call per collection. Nothing reaches the host
//! before [`Updates::commit`].

mod command;

pub use command::{DeferredCreate, UpdateCommand};

use ranged_combat_domain::{
    ActorId, EffectTemplate, EntityKind, Item, ItemChange, ItemId, ItemPatch, SourceId,
};

use crate::infrastructure::ports::{HostStore, NotificationPort, StoreError};

const COLLECTIONS: [EntityKind; 2] = [EntityKind::Item, EntityKind::Effect];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloatyText {
    pub text: String,
    pub positive: bool,
}

/// What a commit sent to the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub created: usize,
    pub updated: usize,
    pub deleted: usize,
}

impl CommitSummary {
    pub fn is_empty(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.deleted == 0
    }
}

#[derive(Debug)]
pub struct Updates {
    actor_id: ActorId,
    commands: Vec<UpdateCommand>,
    floaty: Vec<FloatyText>,
}

impl Updates {
    pub fn new(actor_id: ActorId) -> Self {
        Self {
            actor_id,
            commands: Vec::new(),
            floaty: Vec::new(),
        }
    }

    pub fn actor_id(&self) -> ActorId {
        self.actor_id
    }

    pub fn commands(&self) -> &[UpdateCommand] {
        &self.commands
    }

    pub fn has_changes(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn floaty(&self) -> &[FloatyText] {
        &self.floaty
    }

    pub fn create(&mut self, item: Item) -> ItemId {
        let id = item.id;
        self.commands.push(UpdateCommand::Create(item));
        id
    }

    /// Queue a document created from a catalog template, returning its id.
    pub fn create_from_template(
        &mut self,
        template: SourceId,
        changes: Vec<ItemChange>,
        fallback: Item,
    ) -> ItemId {
        let deferred = DeferredCreate::new(template, changes, fallback);
        let id = deferred.id();
        self.commands.push(UpdateCommand::Defer(deferred));
        id
    }

    /// Queue changes to a document. Changes to a document created in this
    /// batch are folded into its create; changes to a deleted one are dropped.
    pub fn update(&mut self, kind: EntityKind, id: ItemId, changes: Vec<ItemChange>) {
        if self.is_deleted(id) {
            tracing::debug!(%id, "Ignoring update to a document queued for deletion");
            return;
        }
        for command in &mut self.commands {
            match command {
                UpdateCommand::Create(item) if item.id == id => {
                    for change in &changes {
                        if let Err(e) = item.apply(change) {
                            tracing::warn!(error = %e, "Dropping change to queued document");
                        }
                    }
                    return;
                }
                UpdateCommand::Defer(deferred) if deferred.id() == id => {
                    for change in changes {
                        deferred.patch.push(change);
                    }
                    return;
                }
                UpdateCommand::Update { patch, .. } if patch.id == id => {
                    for change in changes {
                        patch.push(change);
                    }
                    return;
                }
                _ => {}
            }
        }
        let mut patch = ItemPatch::new(id);
        for change in changes {
            patch.push(change);
        }
        self.commands.push(UpdateCommand::Update { kind, patch });
    }

    pub fn update_item(&mut self, id: ItemId, changes: Vec<ItemChange>) {
        self.update(EntityKind::Item, id, changes);
    }

    pub fn update_effect(&mut self, id: ItemId, changes: Vec<ItemChange>) {
        self.update(EntityKind::Effect, id, changes);
    }

    /// Update an existing marker effect, or create one from its template.
    pub fn upsert_effect(
        &mut self,
        existing: Option<ItemId>,
        template: EffectTemplate,
        changes: Vec<ItemChange>,
    ) -> ItemId {
        match existing {
            Some(id) => {
                self.update_effect(id, changes);
                id
            }
            None => self.create_from_template(template.source_id(), changes, template.fallback()),
        }
    }

    /// Queue a deletion. Deleting a document created in this batch cancels
    /// the create instead.
    pub fn delete(&mut self, kind: EntityKind, id: ItemId) {
        let before = self.commands.len();
        self.commands.retain(|c| {
            !matches!(c, UpdateCommand::Create(_) | UpdateCommand::Defer(_)) || c.target() != id
        });
        if self.commands.len() != before {
            return;
        }
        if self.is_deleted(id) {
            return;
        }
        self.commands.retain(|c| {
            !matches!(c, UpdateCommand::Update { .. }) || c.target() != id
        });
        self.commands.push(UpdateCommand::Delete { kind, id });
    }

    pub fn is_deleted(&self, id: ItemId) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, UpdateCommand::Delete { .. }) && c.target() == id)
    }

    /// Whether a create from this template is queued
    pub fn is_creating(&self, template: &SourceId) -> bool {
        self.commands.iter().any(|c| match c {
            UpdateCommand::Defer(deferred) => &deferred.template == template,
            UpdateCommand::Create(item) => item.source_id.as_ref() == Some(template),
            _ => false,
        })
    }

    pub fn floaty_text(&mut self, text: impl Into<String>, positive: bool) {
        self.floaty.push(FloatyText {
            text: text.into(),
            positive,
        });
    }

    /// Send everything to the host: resolve templates, then creates,
    /// updates and deletes per collection, then floating text.
    pub async fn commit(
        self,
        store: &dyn HostStore,
        notifier: &dyn NotificationPort,
        floating_text: bool,
    ) -> Result<CommitSummary, StoreError> {
        let Updates {
            actor_id,
            commands,
            floaty,
        } = self;

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        let mut deletes = Vec::new();
        for command in commands {
            match command {
                UpdateCommand::Create(item) => creates.push(item),
                UpdateCommand::Defer(deferred) => creates.push(deferred.resolve(store).await),
                UpdateCommand::Update { kind, patch } => updates.push((kind, patch)),
                UpdateCommand::Delete { kind, id } => deletes.push((kind, id)),
            }
        }

        let mut summary = CommitSummary::default();
        for kind in COLLECTIONS {
            let batch: Vec<Item> = creates.iter().filter(|i| i.kind() == kind).cloned().collect();
            if !batch.is_empty() {
                summary.created += batch.len();
                store.create_entities(actor_id, kind, batch).await?;
            }
        }
        for kind in COLLECTIONS {
            let batch: Vec<ItemPatch> = updates
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, p)| p.clone())
                .collect();
            if !batch.is_empty() {
                summary.updated += batch.len();
                store.update_entities(actor_id, kind, batch).await?;
            }
        }
        for kind in COLLECTIONS {
            let batch: Vec<ItemId> = deletes
                .iter()
                .filter(|(k, _)| *k == kind)
                .map(|(_, id)| *id)
                .collect();
            if !batch.is_empty() {
                summary.deleted += batch.len();
                store.delete_entities(actor_id, kind, batch).await?;
            }
        }

        if floating_text {
            for text in &floaty {
                notifier.floaty_text(actor_id, &text.text, text.positive);
            }
        }

        tracing::debug!(
            actor_id = %actor_id,
            created = summary.created,
            updated = summary.updated,
            deleted = summary.deleted,
            "Committed updates"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockHostStore, MockNotificationPort};
    use ranged_combat_domain::{AmmunitionData, EffectData, EffectTemplate, FLAG_NAMESPACE};
    use serde_json::json;

    fn bolts() -> Item {
        Item::ammunition("Bolt", AmmunitionData::new(3, "bolts"))
    }

    #[test]
    fn updates_to_the_same_document_merge() {
        let mut updates = Updates::new(ActorId::new());
        let id = ItemId::new();
        updates.update_item(id, vec![ItemChange::Quantity(4)]);
        updates.update_item(id, vec![ItemChange::Quantity(3)]);

        assert_eq!(updates.commands().len(), 1);
        assert!(matches!(
            &updates.commands()[0],
            UpdateCommand::Update { patch, .. } if patch.changes == vec![ItemChange::Quantity(3)]
        ));
    }

    #[test]
    fn update_folds_into_a_queued_create() {
        let mut updates = Updates::new(ActorId::new());
        let id = updates.create(bolts());
        updates.update_item(id, vec![ItemChange::Quantity(7)]);

        assert_eq!(updates.commands().len(), 1);
        match &updates.commands()[0] {
            UpdateCommand::Create(item) => {
                assert_eq!(item.as_ammunition().map(|a| a.quantity), Some(7))
            }
            other => panic!("expected create, got {other:?}"),
        }
    }

    #[test]
    fn upsert_updates_existing_markers_and_creates_missing_ones() {
        let mut updates = Updates::new(ActorId::new());
        let existing = ItemId::new();

        let kept = updates.upsert_effect(
            Some(existing),
            EffectTemplate::Loaded,
            vec![ItemChange::Name("Loaded (Bolt)".into())],
        );
        let created = updates.upsert_effect(None, EffectTemplate::ChamberLoaded, Vec::new());

        assert_eq!(kept, existing);
        assert_ne!(created, existing);
        assert!(updates.is_creating(&EffectTemplate::ChamberLoaded.source_id()));
        assert_eq!(updates.commands().len(), 2);
    }

    #[test]
    fn deleting_a_queued_create_cancels_it() {
        let mut updates = Updates::new(ActorId::new());
        let template = EffectTemplate::Loaded;
        let id = updates.create_from_template(template.source_id(), vec![], template.fallback());
        updates.delete(EntityKind::Effect, id);

        assert!(!updates.has_changes());
    }

    #[test]
    fn delete_drops_pending_updates_and_blocks_later_ones() {
        let mut updates = Updates::new(ActorId::new());
        let id = ItemId::new();
        updates.update_item(id, vec![ItemChange::Quantity(1)]);
        updates.delete(EntityKind::Item, id);
        updates.update_item(id, vec![ItemChange::Quantity(2)]);
        updates.delete(EntityKind::Item, id);

        assert_eq!(
            updates.commands(),
            &[UpdateCommand::Delete {
                kind: EntityKind::Item,
                id
            }]
        );
    }

    #[tokio::test]
    async fn commit_resolves_templates_before_applying() {
        let actor_id = ActorId::new();
        let mut updates = Updates::new(actor_id);
        let template = EffectTemplate::ChamberLoaded;
        let effect_id = updates.create_from_template(
            template.source_id(),
            vec![ItemChange::Flag {
                key: FLAG_NAMESPACE.into(),
                value: json!({ "schemaVersion": 2 }),
            }],
            template.fallback(),
        );
        let stale = ItemId::new();
        updates.delete(EntityKind::Item, stale);
        updates.floaty_text("Loaded Bolt", true);

        let mut store = MockHostStore::new();
        store.expect_fetch_template().times(1).returning(|_| {
            Ok(Some(
                Item::effect("Chamber Loaded (catalog)", EffectData::default()),
            ))
        });
        store
            .expect_create_entities()
            .withf(move |actor, kind, items| {
                *actor == actor_id
                    && *kind == EntityKind::Effect
                    && items.len() == 1
                    && items[0].id == effect_id
                    && items[0].name == "Chamber Loaded (catalog)"
                    && items[0]
                        .as_effect()
                        .is_some_and(|e| e.flags.contains_key(FLAG_NAMESPACE))
            })
            .times(1)
            .returning(|_, _, items| Ok(items));
        store
            .expect_delete_entities()
            .withf(move |_, kind, ids| *kind == EntityKind::Item && ids == &vec![stale])
            .times(1)
            .returning(|_, _, _| Ok(()));
        store.expect_update_entities().never();

        let mut notifier = MockNotificationPort::new();
        notifier
            .expect_floaty_text()
            .withf(|_, text, positive| text == "Loaded Bolt" && *positive)
            .times(1)
            .return_const(());

        let summary = updates
            .commit(&store, &notifier, true)
            .await
            .expect("commit succeeds");

        assert_eq!(
            summary,
            CommitSummary {
                created: 1,
                updated: 0,
                deleted: 1
            }
        );
    }

    #[tokio::test]
    async fn missing_template_falls_back_to_local_copy() {
        let actor_id = ActorId::new();
        let mut updates = Updates::new(actor_id);
        let fallback = bolts();
        let source = ranged_combat_domain::SourceId::new("Compendium.pf2e.equipment-srd.Item.bolts")
            .expect("valid");
        updates.create_from_template(source, vec![ItemChange::Quantity(2)], fallback.clone());

        let mut store = MockHostStore::new();
        store.expect_fetch_template().returning(|_| Ok(None));
        store
            .expect_create_entities()
            .withf(move |_, kind, items| {
                *kind == EntityKind::Item
                    && items[0].id == fallback.id
                    && items[0].as_ammunition().map(|a| a.quantity) == Some(2)
            })
            .times(1)
            .returning(|_, _, items| Ok(items));
        let notifier = MockNotificationPort::new();

        updates
            .commit(&store, &notifier, false)
            .await
            .expect("commit succeeds");
    }

    #[tokio::test]
    async fn empty_batch_touches_nothing() {
        let mut store = MockHostStore::new();
        store.expect_create_entities().never();
        store.expect_update_entities().never();
        store.expect_delete_entities().never();
        let notifier = MockNotificationPort::new();

        let summary = Updates::new(ActorId::new())
            .commit(&store, &notifier, true)
            .await
            .expect("nothing to do");
        assert!(summary.is_empty());
    }
}
