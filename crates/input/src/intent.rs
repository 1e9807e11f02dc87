use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction of travel along the broom's local forward axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionDirection {
    Forward,
    Backward,
}

impl MotionDirection {
    /// Multiplier applied to the per-tick step.
    pub fn sign(self) -> f32 {
        match self {
            Self::Forward => 1.0,
            Self::Backward => -1.0,
        }
    }
}

/// Angular speeds in radians per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TurnRate {
    /// Rotation about the broom's local lateral axis.
    pub pitch: f32,
    /// Rotation about the world vertical axis.
    pub yaw: f32,
}

impl TurnRate {
    pub const ZERO: Self = Self {
        pitch: 0.0,
        yaw: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        self.pitch == 0.0 && self.yaw == 0.0
    }
}

/// Pointer steering parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringConfig {
    /// Normalized offset below which both axes count as "no input".
    pub deadzone: f32,
    /// Angular speed at full pointer deflection, radians per tick.
    pub max_turn_rate: f32,
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            deadzone: 0.1,
            max_turn_rate: std::f32::consts::PI / 60.0,
        }
    }
}

/// Persistent intent state: what the player is asking the broom to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputIntent {
    /// The motion direction whose key is currently driving the broom.
    pub motion: Option<MotionDirection>,
    /// Last pointer offset from the viewport center, each axis in `[-1, 1]`.
    pub pointer: Vec2,
    pub turn: TurnRate,
}

impl InputIntent {
    pub fn forward(&self) -> bool {
        self.motion == Some(MotionDirection::Forward)
    }

    pub fn backward(&self) -> bool {
        self.motion == Some(MotionDirection::Backward)
    }
}

/// Map a normalized pointer offset to turn rates.
///
/// When both axes sit inside the deadzone the result is exactly zero.
/// Otherwise each axis has the signed deadzone subtracted, is rescaled by
/// `1 - deadzone`, and is negated so pushing the pointer right yaws left
/// (look-behind convention). An axis inside the deadzone is still rescaled
/// when the other axis is outside it.
pub fn steer(offset: Vec2, config: &SteeringConfig) -> TurnRate {
    let dz = config.deadzone;
    if offset.x.abs() < dz && offset.y.abs() < dz {
        return TurnRate::ZERO;
    }
    let rescale = |d: f32| -(d - sign(d) * dz) / (1.0 - dz) * config.max_turn_rate;
    TurnRate {
        pitch: rescale(offset.y),
        yaw: rescale(offset.x),
    }
}

/// Sign with zero mapping to zero (`f32::signum` maps +0.0 to 1.0).
fn sign(v: f32) -> f32 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}
