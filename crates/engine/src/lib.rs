//! Ranged combat engine.
//!
//! Tracks ammunition, loading state and the feats that react to firing,
//! reloading and damage, on top of a host that owns the documents.
//!
//! ## Structure
//!
//! - `entities/` - weapon systems and the update accumulator
//! - `hooks/` - the publish/subscribe bus actions and feats meet on
//! - `use_cases/` - the ammunition actions
//! - `feats/` - hook subscribers for individual feats
//! - `infrastructure/` - ports, settings and the in-memory host
//! - `app` - composition

pub mod app;
pub mod entities;
pub mod feats;
pub mod hooks;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures shared by unit and scenario tests.
#[cfg(test)]
pub mod test_fixtures;

pub use app::App;
