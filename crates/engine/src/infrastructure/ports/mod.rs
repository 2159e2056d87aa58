//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - The host's document store (actors, items, effects, catalog templates)
//! - Prompts shown to the user (weapon/ammunition choice, confirmations)
//! - Notifications (warnings, floating combat text)

mod error;
mod host;
mod interaction;

pub use error::StoreError;
pub use host::{HostStore, ItemFilter, ItemLookup};
pub use interaction::{ChoiceOption, ChoicePrompt, NotificationPort, PromptPort};

#[cfg(test)]
pub use host::MockHostStore;
#[cfg(test)]
pub use interaction::{MockNotificationPort, MockPromptPort};
