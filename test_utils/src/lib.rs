//! Utility helpers for tests.
//!
//! Builders for deterministic sessions and helpers that step them while
//! collecting the events they emit.
pub mod builders;
pub mod stepping;

pub use builders::{habitat_with, still_prey, ConfigBuilder};
pub use stepping::{count_events, plugin_app, run_for, run_until_event};
