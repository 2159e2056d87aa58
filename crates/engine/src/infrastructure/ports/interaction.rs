//! Ports to the person at the table: prompts and notifications.

use async_trait::async_trait;

use ranged_combat_domain::{ActorId, ItemId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub id: ItemId,
    pub name: String,
    pub img: String,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoicePrompt {
    pub title: String,
    pub options: Vec<ChoiceOption>,
}

/// Disambiguation dialogs. `None`/`false` means the user declined.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PromptPort: Send + Sync {
    async fn choose(&self, actor: ActorId, prompt: ChoicePrompt) -> Option<ItemId>;

    async fn confirm(&self, actor: ActorId, title: String, message: String) -> bool;
}

/// Fire-and-forget user feedback.
#[cfg_attr(test, mockall::automock)]
pub trait NotificationPort: Send + Sync {
    fn warn(&self, actor: ActorId, message: &str);

    fn floaty_text(&self, actor: ActorId, text: &str, positive: bool);
}
