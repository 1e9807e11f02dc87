//! Simulation kernel: broom motion, chase camera, snitch wander AI, catch
//! detection and the particle trail, stepped at a fixed tick rate.
//!
//! # Invariants
//! - Each pose has exactly one writer: player motion for the broom, the wander
//!   AI for the snitch.
//! - The wander cooldown is never negative.
//! - Particles are only ever removed, never revived.
//! - Rendering reads snapshots and never mutates simulation state.

pub mod camera;
pub mod catch;
pub mod clock;
pub mod config;
pub mod frame;
pub mod particles;
pub mod player;
pub mod sim;
pub mod wander;

pub use camera::{CameraState, ChaseCamera};
pub use clock::FixedTimestep;
pub use config::{ConfigError, SimConfig};
pub use frame::{FrameSnapshot, ParticleView};
pub use particles::{Particle, ParticleEmitter};
pub use sim::{SimEvent, Simulation};
pub use wander::{WanderAi, WanderState};
