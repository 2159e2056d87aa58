//! Error types for port operations.

use ranged_combat_domain::{ActorId, DomainError, EntityKind, ItemId};

/// Host store operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Actor not found: {0}")]
    ActorNotFound(ActorId),

    /// Embedded document not found - includes collection for actionable messages.
    #[error("{kind} not found on actor {actor}: {id}")]
    ItemNotFound {
        actor: ActorId,
        kind: EntityKind,
        id: ItemId,
    },

    /// Host call failed - includes operation name for tracing.
    #[error("Host error in {operation}: {message}")]
    Host {
        operation: &'static str,
        message: String,
    },

    /// A patch could not be applied to the stored document.
    #[error("Invalid change: {0}")]
    InvalidChange(#[from] DomainError),
}

impl StoreError {
    pub fn item_not_found(actor: ActorId, kind: EntityKind, id: ItemId) -> Self {
        Self::ItemNotFound { actor, kind, id }
    }

    /// Create a Host error with operation context.
    pub fn host(operation: &'static str, message: impl ToString) -> Self {
        Self::Host {
            operation,
            message: message.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ActorNotFound(_) | Self::ItemNotFound { .. })
    }
}
