use std::path::Path;

use broomchase_input::SteeringConfig;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Broom motion parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BroomConfig {
    /// Distance travelled per tick while a motion key is held.
    pub max_speed: f32,
    pub start_position: Vec3,
}

impl Default for BroomConfig {
    fn default() -> Self {
        Self {
            max_speed: 0.15,
            start_position: Vec3::new(0.0, 10.0, 0.0),
        }
    }
}

/// Chase camera parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Resting offset in the broom's local frame.
    pub offset: Vec3,
    pub start_position: Vec3,
    /// Gap length beyond which the catch-up term stops growing.
    pub gap_saturation: f32,
    pub gap_divisor: f32,
    /// Step length floor, so the camera never stalls.
    pub min_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, 2.0, 5.0),
            start_position: Vec3::new(0.0, 2.0, 5.0),
            gap_saturation: 2.0,
            gap_divisor: 10.0,
            min_speed: 0.1,
        }
    }
}

/// Snitch wander parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnitchConfig {
    pub start_position: Vec3,
    /// Maximum distance covered per tick while seeking.
    pub speed: f32,
    /// Destinations closer than this count as reached.
    pub arrival_radius: f32,
    /// Seconds idled before the next destination is picked.
    pub idle_cooldown: f32,
    pub arena_min: Vec3,
    pub arena_max: Vec3,
    /// Visual radius; also sizes the particle cloud.
    pub radius: f32,
}

impl Default for SnitchConfig {
    fn default() -> Self {
        Self {
            start_position: Vec3::new(0.0, 10.0, -2.0),
            speed: 0.1,
            arrival_radius: 0.1,
            idle_cooldown: 1.0,
            arena_min: Vec3::new(-50.0, 1.0, -50.0),
            arena_max: Vec3::new(50.0, 21.0, 50.0),
            radius: 0.2,
        }
    }
}

/// Catch detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchConfig {
    pub distance: f32,
    /// Seconds the snitch rests after being caught.
    pub cooldown: f32,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            distance: 0.5,
            cooldown: 10.0,
        }
    }
}

/// Particle trail parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub batch_size: usize,
    /// Jitter cube half-width as a fraction of the snitch radius.
    pub jitter_scale: f32,
    /// Upper (exclusive) bound on a particle's lifetime in seconds.
    pub max_lifetime: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            jitter_scale: 0.75,
            max_lifetime: 1.0,
        }
    }
}

/// Every tunable of the simulation. Missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub tick_rate_hz: f32,
    pub seed: u64,
    pub steering: SteeringConfig,
    pub broom: BroomConfig,
    pub camera: CameraConfig,
    pub snitch: SnitchConfig,
    pub catch: CatchConfig,
    pub particles: ParticleConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            seed: 42,
            steering: SteeringConfig::default(),
            broom: BroomConfig::default(),
            camera: CameraConfig::default(),
            snitch: SnitchConfig::default(),
            catch: CatchConfig::default(),
            particles: ParticleConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded sim config");
        Ok(config)
    }

    /// Seconds covered by one simulation tick.
    pub fn tick_seconds(&self) -> f32 {
        1.0 / self.tick_rate_hz
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn check(ok: bool, what: &str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid(what.to_string()))
            }
        }
        check(self.tick_rate_hz > 0.0, "tick_rate_hz must be positive")?;
        check(
            (0.0..1.0).contains(&self.steering.deadzone),
            "steering.deadzone must be in [0, 1)",
        )?;
        check(self.steering.max_turn_rate >= 0.0, "steering.max_turn_rate must be non-negative")?;
        check(self.broom.max_speed > 0.0, "broom.max_speed must be positive")?;
        check(self.camera.gap_divisor > 0.0, "camera.gap_divisor must be positive")?;
        check(self.camera.min_speed > 0.0, "camera.min_speed must be positive")?;
        check(self.camera.gap_saturation >= 0.0, "camera.gap_saturation must be non-negative")?;
        check(self.snitch.speed > 0.0, "snitch.speed must be positive")?;
        check(self.snitch.arrival_radius > 0.0, "snitch.arrival_radius must be positive")?;
        check(self.snitch.idle_cooldown >= 0.0, "snitch.idle_cooldown must be non-negative")?;
        check(
            self.snitch.arena_min.cmple(self.snitch.arena_max).all(),
            "snitch.arena_min must not exceed snitch.arena_max",
        )?;
        check(self.snitch.radius > 0.0, "snitch.radius must be positive")?;
        check(self.catch.distance >= 0.0, "catch.distance must be non-negative")?;
        check(self.catch.cooldown >= 0.0, "catch.cooldown must be non-negative")?;
        check(self.particles.batch_size > 0, "particles.batch_size must be positive")?;
        check(self.particles.max_lifetime > 0.0, "particles.max_lifetime must be positive")?;
        Ok(())
    }
}
