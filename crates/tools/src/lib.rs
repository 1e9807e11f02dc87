//! Developer tooling: read-only simulation inspection for the CLI and HUD.
//!
//! # Invariants
//! - Tools never mutate the simulation.

mod inspector;

pub use inspector::{SimInspector, SimSummary, describe_event};
