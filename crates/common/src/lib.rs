//! Shared types for the broom chase workspace.
//!
//! # Invariants
//! - A `Pose` is only ever mutated by the controller that owns it.
//! - Orientations stay unit quaternions after every helper.

mod types;

pub use types::{EntityKind, Pose};
