//! Dust trail behind the snitch: a pool of short-lived particles with
//! per-particle expiry times, swept once per tick.

use broomchase_common::Pose;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ParticleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    /// Simulation time in seconds.
    pub spawned_at: f64,
    pub expires_at: f64,
}

impl Particle {
    pub fn remaining(&self, now: f64) -> f64 {
        (self.expires_at - now).max(0.0)
    }

    pub fn is_live(&self, now: f64) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct ParticleEmitter {
    config: ParticleConfig,
    /// Half-width of the jitter cube.
    half_extent: f32,
    pool: Vec<Particle>,
    spawned_total: u64,
}

impl ParticleEmitter {
    pub fn new(config: ParticleConfig, snitch_radius: f32) -> Self {
        Self {
            config,
            half_extent: config.jitter_scale * snitch_radius,
            pool: Vec::new(),
            spawned_total: 0,
        }
    }

    /// Live particles, oldest first.
    pub fn particles(&self) -> &[Particle] {
        &self.pool
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// Spawn one batch around `snitch` and drop everything expired by `now`.
    /// Returns the number spawned.
    pub fn tick(&mut self, snitch: &Pose, now: f64, rng: &mut impl Rng) -> usize {
        let corner = snitch.position - Vec3::splat(self.half_extent);
        let span = 2.0 * self.half_extent;
        for _ in 0..self.config.batch_size {
            let jitter = Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>());
            let lifetime = rng.random::<f64>() * self.config.max_lifetime as f64;
            self.pool.push(Particle {
                position: corner + jitter * span,
                spawned_at: now,
                expires_at: now + lifetime,
            });
        }
        self.spawned_total += self.config.batch_size as u64;
        let removed = self.sweep(now);
        tracing::trace!(
            spawned = self.config.batch_size,
            removed,
            live = self.pool.len(),
            "particle tick"
        );
        self.config.batch_size
    }

    /// Remove every particle whose expiry is at or before `now`.
    pub fn sweep(&mut self, now: f64) -> usize {
        let before = self.pool.len();
        self.pool.retain(|p| p.is_live(now));
        before - self.pool.len()
    }
}
