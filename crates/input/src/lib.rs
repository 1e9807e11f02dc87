//! Input tracking: raw keyboard and pointer events folded into a persistent
//! flight intent that the simulation reads once per tick.
//!
//! # Invariants
//! - At most one motion direction is active at a time.
//! - Turn rates are recomputed from the latest pointer offset, never accumulated.

pub mod intent;
pub mod tracker;

pub use intent::{InputIntent, MotionDirection, SteeringConfig, TurnRate, steer};
pub use tracker::{InputTracker, Viewport};
