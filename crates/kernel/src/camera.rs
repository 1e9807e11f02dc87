use broomchase_common::Pose;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;

/// Derived camera placement handed to the render sink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraState {
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, Vec3::Y)
    }
}

/// Trailing camera that closes on a point behind the broom with a lag-based
/// step length instead of rigid attachment.
///
/// The step is `min(gap_saturation, gap) / gap_divisor + min_speed`, clamped
/// to the gap itself. A far camera catches up faster until the gap passes
/// `gap_saturation`; `min_speed` keeps it from stalling.
#[derive(Debug, Clone)]
pub struct ChaseCamera {
    config: CameraConfig,
    state: CameraState,
}

impl ChaseCamera {
    pub fn new(config: CameraConfig, looking_at: Vec3) -> Self {
        Self {
            config,
            state: CameraState {
                position: config.start_position,
                look_at: looking_at,
            },
        }
    }

    pub fn state(&self) -> CameraState {
        self.state
    }

    pub fn position(&self) -> Vec3 {
        self.state.position
    }

    /// Where the camera would rest for the given broom pose.
    pub fn desired_position(&self, player: &Pose) -> Vec3 {
        player.position + player.to_world_offset(self.config.offset)
    }

    /// Step length for a given remaining gap.
    pub fn step_length(&self, gap: f32) -> f32 {
        let speed = gap.min(self.config.gap_saturation) / self.config.gap_divisor
            + self.config.min_speed;
        speed.min(gap)
    }

    /// Move one tick toward the resting point and re-aim at the broom.
    /// Returns the applied step.
    pub fn update(&mut self, player: &Pose) -> Vec3 {
        let gap = self.desired_position(player) - self.state.position;
        let step = gap.clamp_length_max(self.step_length(gap.length()));
        self.state.position += step;
        self.state.look_at = player.position;
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Pose {
        Pose::at(Vec3::new(0.0, 10.0, 0.0))
    }

    #[test]
    fn desired_position_uses_rotated_offset() {
        let cam = ChaseCamera::new(CameraConfig::default(), Vec3::ZERO);
        let mut p = player();
        assert!(cam.desired_position(&p).abs_diff_eq(Vec3::new(0.0, 12.0, 5.0), 1e-5));
        p.yaw_world(std::f32::consts::PI);
        assert!(cam.desired_position(&p).abs_diff_eq(Vec3::new(0.0, 12.0, -5.0), 1e-4));
    }

    #[test]
    fn step_length_saturates_and_has_floor() {
        let cam = ChaseCamera::new(CameraConfig::default(), Vec3::ZERO);
        assert!((cam.step_length(10.0) - 0.3).abs() < 1e-6);
        assert!((cam.step_length(2.0) - 0.3).abs() < 1e-6);
        assert!((cam.step_length(1.0) - 0.2).abs() < 1e-6);
        assert!((cam.step_length(0.05) - 0.05).abs() < 1e-6);
        assert_eq!(cam.step_length(0.0), 0.0);
    }

    #[test]
    fn converges_on_stationary_player_without_overshoot() {
        let p = player();
        let mut cam = ChaseCamera::new(CameraConfig::default(), p.position);
        let target = cam.desired_position(&p);
        let mut gap = target.distance(cam.position());
        assert!(gap > 2.0);

        for _ in 0..200 {
            let step = cam.update(&p);
            let next_gap = target.distance(cam.position());
            assert!(step.length() <= gap + 1e-5, "overshot");
            if gap >= 0.1 {
                assert!(next_gap <= gap - 0.1 + 1e-4, "stalled at gap {gap}");
            }
            gap = next_gap;
        }
        assert!(gap < 1e-4);
    }

    #[test]
    fn update_aims_at_player() {
        let p = Pose::at(Vec3::new(3.0, 4.0, 5.0));
        let mut cam = ChaseCamera::new(CameraConfig::default(), Vec3::ZERO);
        cam.update(&p);
        assert_eq!(cam.state().look_at, p.position);
        assert!(!cam.state().view_matrix().is_nan());
    }
}
