//! Action scenarios against the in-memory host.
//!
//! Each test seeds one actor, runs actions through [`crate::App`] and
//! inspects the documents the host ends up with.

mod feats;
mod magazines;
mod single_shot;
