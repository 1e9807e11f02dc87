use broomchase_common::Pose;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraState;
use crate::wander::WanderState;

/// A particle as the render sink sees it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParticleView {
    pub position: Vec3,
    /// Seconds until removal.
    pub remaining: f32,
}

/// Everything a renderer needs for one frame. Built from the simulation,
/// never written back into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    /// Simulation time in seconds.
    pub time: f64,
    pub broom: Pose,
    pub snitch: Pose,
    pub camera: CameraState,
    pub particles: Vec<ParticleView>,
    pub wander: WanderState,
    pub cooldown: f32,
    pub catches: u64,
}
