//! Rendering adapter: renderer-agnostic view and render-sink interface.
//!
//! # Invariants
//! - Renderers consume `FrameSnapshot`s and cannot mutate the simulation.
//! - The view derives from the chase camera each frame.

mod renderer;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
