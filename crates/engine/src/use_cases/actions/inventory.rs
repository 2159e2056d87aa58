//! Moving rounds between the inventory and a weapon.
//!
//! The pool mirrors the actor's ammunition stacks in memory so several
//! moves inside one action see each other, and queues the matching
//! changes as it goes.

use ranged_combat_domain::{
    Actor, Ammunition, EntityKind, ItemChange, ItemId, Magazine, Uses,
};

use crate::entities::Updates;

pub(super) struct AmmunitionPool {
    stacks: Vec<Ammunition>,
}

impl AmmunitionPool {
    pub(super) fn new(actor: &Actor) -> Self {
        Self {
            stacks: actor.ammunition().filter_map(Ammunition::from_item).collect(),
        }
    }

    pub(super) fn stack(&self, id: ItemId) -> Option<&Ammunition> {
        self.stacks.iter().find(|s| s.id == id)
    }

    /// Take `quantity` whole rounds off a stack
    pub(super) fn take(
        &mut self,
        updates: &mut Updates,
        stack_id: ItemId,
        quantity: u32,
    ) -> Option<Ammunition> {
        let stack = self.stacks.iter_mut().find(|s| s.id == stack_id)?;
        if stack.quantity < quantity {
            return None;
        }
        let taken = stack.with_quantity(quantity);
        stack.quantity -= quantity;
        queue_stack(updates, stack, Vec::new());
        Some(taken)
    }

    /// Take the top unit of a magazine stack; the next unit is a fresh one
    pub(super) fn take_magazine(
        &mut self,
        updates: &mut Updates,
        stack_id: ItemId,
    ) -> Option<Magazine> {
        let stack = self.stacks.iter_mut().find(|s| s.id == stack_id)?;
        if stack.quantity == 0 {
            return None;
        }
        let magazine = Magazine::from_stack(stack);
        stack.quantity -= 1;
        let mut extra = Vec::new();
        if let Some(uses) = stack.uses.as_mut() {
            if uses.value != uses.max {
                uses.value = uses.max;
                extra.push(ItemChange::UsesValue(uses.max));
            }
        }
        queue_stack(updates, stack, extra);
        Some(magazine)
    }

    /// Spend uses straight from a stack, as a bow or an inventory-tracked
    /// weapon does. Returns what was fired.
    pub(super) fn spend(
        &mut self,
        updates: &mut Updates,
        stack_id: ItemId,
        units: u32,
    ) -> Option<Ammunition> {
        let stack = self.stacks.iter_mut().find(|s| s.id == stack_id)?;
        let before = stack.uses.map(|u| u.value);
        let spent = stack.spend(units);
        if spent == 0 {
            return None;
        }
        let mut extra = Vec::new();
        if let Some(uses) = stack.uses {
            if Some(uses.value) != before {
                extra.push(ItemChange::UsesValue(uses.value));
            }
        }
        queue_stack(updates, stack, extra);
        Some(stack.with_quantity(spent))
    }

    /// Put rounds back: into their own stack if it still exists, else into
    /// a stack of the same type, else into a new stack from the catalog.
    pub(super) fn return_rounds(&mut self, updates: &mut Updates, rounds: &Ammunition) {
        if rounds.quantity == 0 {
            return;
        }
        let existing = self
            .stacks
            .iter()
            .position(|s| s.id == rounds.id && !updates.is_deleted(s.id))
            .or_else(|| {
                self.stacks
                    .iter()
                    .position(|s| s.is_same_type(rounds) && !updates.is_deleted(s.id))
            });
        if let Some(index) = existing {
            let stack = &mut self.stacks[index];
            stack.quantity += rounds.quantity;
            queue_stack(updates, stack, Vec::new());
            return;
        }

        tracing::warn!(
            actor_id = %updates.actor_id(),
            ammunition = %rounds.name,
            "Returned ammunition has no inventory stack, creating one"
        );
        let mut restored = rounds.clone();
        restored.id = ItemId::new();
        if let Some(uses) = restored.uses.as_mut() {
            uses.value = uses.max;
        }
        self.create_stack(updates, restored);
    }

    /// Return a magazine: unspent units rejoin their stack, a partial one
    /// becomes a stack of its own, an empty one is thrown away.
    pub(super) fn return_magazine(&mut self, updates: &mut Updates, magazine: &Magazine) {
        let full_units = magazine.reserve + u32::from(magazine.is_full());
        if full_units > 0 {
            let mut unspent = magazine.ammunition.with_quantity(full_units);
            if let Some(uses) = unspent.uses.as_mut() {
                uses.value = uses.max;
            }
            self.return_rounds(updates, &unspent);
        }
        if magazine.is_full() {
            return;
        }
        if magazine.is_empty() {
            tracing::debug!(
                actor_id = %updates.actor_id(),
                magazine = %magazine.ammunition.name,
                "Discarding empty magazine"
            );
            return;
        }
        let mut partial = magazine.ammunition.with_quantity(1);
        partial.id = ItemId::new();
        partial.uses = Some(Uses {
            value: magazine.remaining,
            max: magazine.capacity,
            auto_destroy: magazine.ammunition.allow_destroy,
        });
        self.create_stack(updates, partial);
    }

    fn create_stack(&mut self, updates: &mut Updates, stack: Ammunition) {
        let mut changes = vec![ItemChange::Quantity(stack.quantity)];
        if let Some(uses) = stack.uses {
            changes.push(ItemChange::UsesValue(uses.value));
        }
        match &stack.source_id {
            Some(source) => {
                updates.create_from_template(source.clone(), changes, stack.to_item());
            }
            None => {
                updates.create(stack.to_item());
            }
        }
        self.stacks.push(stack);
    }
}

/// Queue a stack's new quantity, deleting it once empty when allowed
fn queue_stack(updates: &mut Updates, stack: &Ammunition, extra: Vec<ItemChange>) {
    if stack.quantity == 0 && stack.allow_destroy {
        updates.delete(EntityKind::Item, stack.id);
        return;
    }
    let mut changes = vec![ItemChange::Quantity(stack.quantity)];
    changes.extend(extra);
    updates.update_item(stack.id, changes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::updates::UpdateCommand;
    use ranged_combat_domain::{ActorId, ActorKind, AmmunitionData, Item, SourceId};

    fn source() -> SourceId {
        SourceId::new("Compendium.pf2e.equipment-srd.Item.bolts").expect("valid")
    }

    fn actor_with(items: Vec<Item>) -> Actor {
        items
            .into_iter()
            .fold(Actor::new("Archer", ActorKind::Character), Actor::with_item)
    }

    #[test]
    fn taking_the_last_rounds_deletes_the_stack() {
        let stack = Item::ammunition("Bolt", AmmunitionData::new(1, "bolts"));
        let mut pool = AmmunitionPool::new(&actor_with(vec![stack.clone()]));
        let mut updates = Updates::new(ActorId::new());

        let taken = pool.take(&mut updates, stack.id, 1).expect("enough rounds");

        assert_eq!(taken.quantity, 1);
        assert!(updates.is_deleted(stack.id));
    }

    #[test]
    fn taking_more_than_the_stack_holds_queues_nothing() {
        let stack = Item::ammunition("Bolt", AmmunitionData::new(1, "bolts"));
        let mut pool = AmmunitionPool::new(&actor_with(vec![stack.clone()]));
        let mut updates = Updates::new(ActorId::new());

        assert!(pool.take(&mut updates, stack.id, 2).is_none());
        assert!(!updates.has_changes());
    }

    #[test]
    fn returned_rounds_merge_into_a_stack_of_the_same_type() {
        let stack = Item::ammunition("Bolt", AmmunitionData::new(3, "bolts")).with_source(source());
        let mut pool = AmmunitionPool::new(&actor_with(vec![stack.clone()]));
        let mut updates = Updates::new(ActorId::new());
        let mut rounds = Ammunition::from_item(&stack).expect("ammo").with_quantity(2);
        rounds.id = ItemId::new();

        pool.return_rounds(&mut updates, &rounds);

        assert_eq!(pool.stack(stack.id).map(|s| s.quantity), Some(5));
    }

    #[test]
    fn returned_rounds_without_a_stack_are_recreated_from_the_catalog() {
        let stack = Item::ammunition("Bolt", AmmunitionData::new(2, "bolts")).with_source(source());
        let rounds = Ammunition::from_item(&stack).expect("ammo");
        let mut pool = AmmunitionPool::new(&actor_with(Vec::new()));
        let mut updates = Updates::new(ActorId::new());

        pool.return_rounds(&mut updates, &rounds);

        match &updates.commands()[0] {
            UpdateCommand::Defer(deferred) => {
                assert_eq!(deferred.template, source());
                assert!(deferred.patch.changes.contains(&ItemChange::Quantity(2)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn partial_magazines_become_their_own_stack() {
        let mut data = AmmunitionData::new(1, "bolts");
        data.uses = Some(Uses::new(10, 10));
        let stack = Item::ammunition("Magazine", data).with_source(source());
        let mut magazine = Magazine::from_stack(&Ammunition::from_item(&stack).expect("ammo"));
        magazine.spend(3);
        let mut pool = AmmunitionPool::new(&actor_with(vec![stack.clone()]));
        let mut updates = Updates::new(ActorId::new());

        pool.return_magazine(&mut updates, &magazine);

        assert_eq!(pool.stack(stack.id).map(|s| s.quantity), Some(1));
        match &updates.commands()[0] {
            UpdateCommand::Defer(deferred) => {
                assert!(deferred.patch.changes.contains(&ItemChange::UsesValue(7)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn reserve_magazines_return_as_full_units() {
        let mut data = AmmunitionData::new(1, "bolts");
        data.uses = Some(Uses::new(10, 10));
        let stack = Item::ammunition("Magazine", data).with_source(source());
        let mut seated = Ammunition::from_item(&stack).expect("ammo").with_quantity(3);
        seated.id = ItemId::new();
        let mut magazine = Magazine::from_loaded_stack(&seated);
        magazine.spend(4);
        let mut pool = AmmunitionPool::new(&actor_with(vec![stack.clone()]));
        let mut updates = Updates::new(ActorId::new());

        pool.return_magazine(&mut updates, &magazine);

        assert_eq!(pool.stack(stack.id).map(|s| s.quantity), Some(3));
        let partial = updates.commands().iter().any(|c| {
            matches!(c, UpdateCommand::Defer(d) if d.patch.changes.contains(&ItemChange::UsesValue(6)))
        });
        assert!(partial, "the seated magazine keeps its six charges");
    }

    #[test]
    fn empty_magazines_are_discarded() {
        let mut data = AmmunitionData::new(1, "bolts");
        data.uses = Some(Uses::new(1, 10));
        let stack = Item::ammunition("Magazine", data);
        let mut magazine = Magazine::from_stack(&Ammunition::from_item(&stack).expect("ammo"));
        magazine.spend(1);
        let mut pool = AmmunitionPool::new(&actor_with(Vec::new()));
        let mut updates = Updates::new(ActorId::new());

        pool.return_magazine(&mut updates, &magazine);

        assert!(!updates.has_changes());
    }
}
