//! Action used.
//!
//! The host reports that an action or feat item was used; subscribers
//! react through `post-action`.

use ranged_combat_domain::{ActorId, ItemId};

use super::{ActionError, ActionOutcome, ActionPorts, ActionReport, Precondition};
use crate::entities::Updates;
use crate::hooks::{HookEvent, PostActionResult};
use crate::infrastructure::ports::ItemLookup;

pub struct ActionUsed {
    ports: ActionPorts,
}

impl ActionUsed {
    pub fn new(ports: ActionPorts) -> Self {
        Self { ports }
    }

    /// Publish `post-action` for the used item.
    ///
    /// # Returns
    /// * `Ok(ActionOutcome::Rejected)` - The item is not on the actor
    pub async fn execute(
        &self,
        actor_id: ActorId,
        item_id: ItemId,
        result: PostActionResult,
    ) -> Result<ActionOutcome, ActionError> {
        let actor = self.ports.load_actor(actor_id).await?;
        let Some(item) = self
            .ports
            .store
            .find_item(actor_id, ItemLookup::Id(item_id))
            .await?
        else {
            return Ok(self.ports.reject(actor_id, Precondition::ItemNotFound(item_id)));
        };

        let mut updates = Updates::new(actor_id);
        self.ports
            .hooks
            .publish(&mut HookEvent::PostAction {
                actor: &actor,
                item: &item,
                result,
                updates: &mut updates,
            })
            .await;

        let summary = self.ports.commit(updates).await?;
        tracing::debug!(actor_id = %actor_id, item = %item.name, "Processed action use");
        Ok(ActionOutcome::Completed(ActionReport {
            weapon_id: None,
            summary,
            fired: None,
        }))
    }
}
