//! Hook bus.
//!
//! A keyed publish/subscribe registry. The engine publishes lifecycle events
//! and independently registered subscribers (feats) react to them, usually
//! by queuing changes on the event's accumulator. The bus is built once at
//! composition and passed explicitly to everything that publishes.

mod events;

pub use events::{AuxiliaryAction, AuxiliaryActionKind, HookEvent, HookKey, PostActionResult};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{subscriber} failed: {message}")]
    Failed {
        subscriber: &'static str,
        message: String,
    },
}

impl HookError {
    pub fn failed(subscriber: &'static str, message: impl ToString) -> Self {
        Self::Failed {
            subscriber,
            message: message.to_string(),
        }
    }
}

#[async_trait]
pub trait HookSubscriber: Send + Sync {
    fn name(&self) -> &'static str;

    async fn handle(&self, event: &mut HookEvent<'_>) -> Result<(), HookError>;
}

#[derive(Default)]
pub struct HookBus {
    subscribers: HashMap<HookKey, Vec<Arc<dyn HookSubscriber>>>,
}

impl HookBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: HookKey, subscriber: Arc<dyn HookSubscriber>) {
        tracing::debug!(hook = %key, subscriber = subscriber.name(), "Registered hook subscriber");
        self.subscribers.entry(key).or_default().push(subscriber);
    }

    pub fn subscriber_count(&self, key: HookKey) -> usize {
        self.subscribers.get(&key).map_or(0, Vec::len)
    }

    /// Call every subscriber of the event's key in registration order,
    /// awaiting each. A failing subscriber is logged and the rest still run.
    pub async fn publish(&self, event: &mut HookEvent<'_>) {
        let key = event.key();
        let Some(subscribers) = self.subscribers.get(&key) else {
            return;
        };
        for subscriber in subscribers {
            if let Err(e) = subscriber.handle(event).await {
                tracing::warn!(
                    hook = %key,
                    subscriber = subscriber.name(),
                    error = %e,
                    "Hook subscriber failed, continuing with remaining subscribers"
                );
            }
        }
    }
}
