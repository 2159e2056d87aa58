//! Infrastructure implementations.
//!
//! Contains port traits, settings and the in-memory host store.

pub mod app_settings;
pub mod in_memory;
pub mod ports;
