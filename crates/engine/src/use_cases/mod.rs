//! Use cases - user-invoked and host-triggered actions.

pub mod actions;

pub use actions::{
    ActionError, ActionOutcome, ActionPorts, ActionReport, AmmunitionActions, FireMode,
    FireRequest, Precondition,
};
