//! wgpu render backend for the broom chase.
//!
//! Draws the arena floor with a grid overlay, the broom, the snitch and its
//! particle trail as instanced boxes, viewed through the chase camera.
//!
//! # Invariants
//! - Renderer never mutates simulation state.
//! - Render frame rate is decoupled from the simulation tick.

mod gpu;
mod scene;
mod shaders;

pub use gpu::WgpuRenderer;
pub use scene::{SceneStyle, build_instances};
