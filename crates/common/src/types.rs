use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// The kinds of simulated objects the render sink draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The player-controlled broom.
    Broom,
    /// The wandering target.
    Snitch,
    /// A short-lived dust particle trailing the snitch.
    Particle,
}

/// Position plus orientation of a simulated object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    /// Unrotated pose at the given position.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Rotate a vector expressed in this pose's local frame into world space.
    pub fn to_world_offset(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Pitch about the pose's own lateral (local X) axis.
    pub fn pitch_local(&mut self, angle: f32) {
        self.rotation = (self.rotation * Quat::from_rotation_x(angle)).normalize();
    }

    /// Yaw about the world vertical axis. Repeated yaw never introduces roll.
    pub fn yaw_world(&mut self, angle: f32) {
        self.rotation = (Quat::from_rotation_y(angle) * self.rotation).normalize();
    }

    pub fn distance_to(&self, other: &Pose) -> f32 {
        self.position.distance(other.position)
    }

    /// Orient so the local +Z axis points at `point`, keeping world up as the
    /// reference. A point coinciding with the current position is ignored.
    pub fn face_towards(&mut self, point: Vec3) {
        let Some(z) = (point - self.position).try_normalize() else {
            return;
        };
        self.rotation = match Vec3::Y.cross(z).try_normalize() {
            Some(x) => {
                let y = z.cross(x);
                Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
            }
            // Looking straight up or down: no unique up reference.
            None => Quat::from_rotation_arc(Vec3::Z, z),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        a.abs_diff_eq(b, 1e-5)
    }

    #[test]
    fn pose_default_is_identity() {
        let p = Pose::default();
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.rotation, Quat::IDENTITY);
    }

    #[test]
    fn world_offset_follows_rotation() {
        let mut p = Pose::at(Vec3::new(0.0, 10.0, 0.0));
        assert!(approx(p.to_world_offset(Vec3::new(0.0, 2.0, 5.0)), Vec3::new(0.0, 2.0, 5.0)));
        p.yaw_world(FRAC_PI_2);
        // +Z rotated a quarter turn about +Y lands on +X.
        assert!(approx(p.to_world_offset(Vec3::Z), Vec3::X));
    }

    #[test]
    fn repeated_yaw_after_pitch_keeps_lateral_axis_level() {
        let mut p = Pose::default();
        p.pitch_local(0.3);
        for _ in 0..50 {
            p.yaw_world(0.1);
        }
        let lateral = p.to_world_offset(Vec3::X);
        assert!(lateral.y.abs() < 1e-4, "roll crept in: {lateral:?}");
    }

    #[test]
    fn face_towards_points_local_z_at_target() {
        let mut p = Pose::at(Vec3::new(1.0, 2.0, 3.0));
        let target = Vec3::new(4.0, -2.0, 3.0);
        p.face_towards(target);
        let expected = (target - p.position).normalize();
        assert!(approx(p.to_world_offset(Vec3::Z), expected));
    }

    #[test]
    fn face_towards_vertical_target() {
        let mut p = Pose::default();
        p.face_towards(Vec3::new(0.0, 5.0, 0.0));
        assert!(approx(p.to_world_offset(Vec3::Z), Vec3::Y));
    }

    #[test]
    fn face_towards_own_position_is_ignored() {
        let mut p = Pose::at(Vec3::ONE);
        p.yaw_world(0.5);
        let before = p.rotation;
        p.face_towards(Vec3::ONE);
        assert_eq!(p.rotation, before);
    }
}
