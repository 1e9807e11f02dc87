//! Broom motion: turn from pointer intent, then slide along the heading.

use broomchase_common::Pose;
use broomchase_input::InputIntent;
use glam::Vec3;

use crate::config::BroomConfig;

/// The broom's nose points down its local -Z axis.
pub const LOCAL_FORWARD: Vec3 = Vec3::NEG_Z;

/// Apply one tick of player intent to the broom pose.
///
/// Pitch is applied about the broom's own lateral axis and yaw about the world
/// vertical axis. While a motion direction is active the broom moves a fixed
/// `max_speed` along its current heading; there is no acceleration.
/// Returns the displacement applied this tick.
pub fn step(pose: &mut Pose, intent: &InputIntent, config: &BroomConfig) -> Vec3 {
    if intent.turn.pitch != 0.0 {
        pose.pitch_local(intent.turn.pitch);
    }
    if intent.turn.yaw != 0.0 {
        pose.yaw_world(intent.turn.yaw);
    }

    let Some(dir) = intent.motion else {
        return Vec3::ZERO;
    };
    let displacement = pose.to_world_offset(LOCAL_FORWARD * config.max_speed * dir.sign());
    pose.position += displacement;
    displacement
}

#[cfg(test)]
mod tests {
    use super::*;
    use broomchase_input::{InputTracker, MotionDirection, SteeringConfig, TurnRate, Viewport};
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn idle_intent_leaves_pose_alone() {
        let mut pose = Pose::at(Vec3::new(0.0, 10.0, 0.0));
        let before = pose;
        let moved = step(&mut pose, &InputIntent::default(), &BroomConfig::default());
        assert_eq!(moved, Vec3::ZERO);
        assert_eq!(pose, before);
    }

    #[test]
    fn forward_moves_along_negative_z() {
        let mut pose = Pose::default();
        let intent = InputIntent {
            motion: Some(MotionDirection::Forward),
            ..Default::default()
        };
        step(&mut pose, &intent, &BroomConfig::default());
        assert!(approx(pose.position, Vec3::new(0.0, 0.0, -0.15)));
    }

    #[test]
    fn backward_reverses_step() {
        let mut pose = Pose::default();
        let intent = InputIntent {
            motion: Some(MotionDirection::Backward),
            ..Default::default()
        };
        step(&mut pose, &intent, &BroomConfig::default());
        assert!(approx(pose.position, Vec3::new(0.0, 0.0, 0.15)));
    }

    #[test]
    fn motion_follows_current_heading() {
        let mut pose = Pose::default();
        pose.yaw_world(FRAC_PI_2);
        let intent = InputIntent {
            motion: Some(MotionDirection::Forward),
            ..Default::default()
        };
        step(&mut pose, &intent, &BroomConfig::default());
        // -Z yawed a quarter turn left faces -X.
        assert!(approx(pose.position, Vec3::new(-0.15, 0.0, 0.0)));
    }

    #[test]
    fn turn_rates_rotate_before_translation() {
        let mut pose = Pose::default();
        let intent = InputIntent {
            motion: Some(MotionDirection::Forward),
            turn: TurnRate {
                pitch: 0.0,
                yaw: FRAC_PI_2,
            },
            ..Default::default()
        };
        let moved = step(&mut pose, &intent, &BroomConfig::default());
        assert!(approx(moved, Vec3::new(-0.15, 0.0, 0.0)));
    }

    #[test]
    fn double_press_moves_same_as_single_press() {
        let cfg = BroomConfig::default();
        let vp = Viewport::new(640, 480);

        let mut once = InputTracker::new(vp, SteeringConfig::default());
        once.press(MotionDirection::Forward);
        let mut twice = InputTracker::new(vp, SteeringConfig::default());
        twice.press(MotionDirection::Forward);
        twice.press(MotionDirection::Forward);

        let mut a = Pose::default();
        let mut b = Pose::default();
        for _ in 0..10 {
            let da = step(&mut a, once.intent(), &cfg);
            let db = step(&mut b, twice.intent(), &cfg);
            assert_eq!(da, db);
        }
        assert_eq!(a, b);
    }
}
