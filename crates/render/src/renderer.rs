use std::fmt::Write;

use broomchase_kernel::{CameraState, FrameSnapshot};
use glam::{Mat4, Vec3};

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 2.0, 5.0),
            target: Vec3::new(0.0, 10.0, 0.0),
            fov_degrees: 75.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl RenderView {
    /// View through the chase camera with the default lens.
    pub fn from_camera(camera: &CameraState, aspect: f32) -> Self {
        Self {
            eye: camera.position,
            target: camera.look_at,
            aspect,
            ..Self::default()
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given snapshot and view.
    fn render(&self, frame: &FrameSnapshot, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Also list every live particle.
    pub list_particles: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

fn fmt_vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameSnapshot, view: &RenderView) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            "=== Frame (tick={}, t={:.2}s) ===",
            frame.tick, frame.time
        );
        let _ = writeln!(
            out,
            "Camera: eye={} target={} fov={:.0}",
            fmt_vec(view.eye),
            fmt_vec(view.target),
            view.fov_degrees
        );
        let _ = writeln!(
            out,
            "Broom:  pos={} heading={}",
            fmt_vec(frame.broom.position),
            fmt_vec(frame.broom.to_world_offset(Vec3::NEG_Z))
        );
        let _ = writeln!(
            out,
            "Snitch: pos={} state={:?} cooldown={:.2}s",
            fmt_vec(frame.snitch.position),
            frame.wander,
            frame.cooldown
        );
        let _ = writeln!(
            out,
            "Separation: {:.2}  Catches: {}",
            frame.broom.distance_to(&frame.snitch),
            frame.catches
        );
        let _ = writeln!(out, "Particles: {}", frame.particles.len());
        if self.list_particles {
            for p in &frame.particles {
                let _ = writeln!(out, "  pos={} ttl={:.3}s", fmt_vec(p.position), p.remaining);
            }
        }
        out
    }
}
