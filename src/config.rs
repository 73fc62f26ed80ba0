//! Configuration loader, schema types and persisted session state.
//!
//! This module exposes the configuration schema used to drive runtime
//! behavior, helpers to load configuration from disk, key spec parsing and
//! the small state file written on quit.

pub mod keys;
mod load;
mod schema;
mod state;

pub use load::{cache_dir, expand_home, state_dir};
pub use schema::*;
pub use state::{SessionState, StateError, StateStore};
