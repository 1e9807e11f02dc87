//! Snitch wander AI: idle for a cooldown, pick a random point in the arena,
//! fly to it, repeat.

use broomchase_common::Pose;
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SnitchConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WanderState {
    /// No destination; counting the cooldown down.
    Idle,
    /// Flying toward a destination.
    Seeking,
}

/// What happened during one AI tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WanderReport {
    /// Destination arrived at (and cleared) this tick.
    pub reached: Option<Vec3>,
    /// Destination picked this tick.
    pub picked: Option<Vec3>,
    /// Displacement applied to the snitch.
    pub moved: Vec3,
}

#[derive(Debug, Clone)]
pub struct WanderAi {
    config: SnitchConfig,
    destination: Option<Vec3>,
    /// Seconds left before the next pick. Never negative.
    cooldown: f32,
}

impl WanderAi {
    /// Starts idle with a full cooldown.
    pub fn new(config: SnitchConfig) -> Self {
        Self {
            config,
            destination: None,
            cooldown: config.idle_cooldown,
        }
    }

    pub fn state(&self) -> WanderState {
        if self.destination.is_some() {
            WanderState::Seeking
        } else {
            WanderState::Idle
        }
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.destination
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Drop the destination and rest for `seconds` before wandering again.
    pub fn rest(&mut self, seconds: f32) {
        self.destination = None;
        self.cooldown = seconds.max(0.0);
    }

    /// Advance the state machine by one tick of `dt` seconds.
    ///
    /// On arrival the destination is cleared and the idle branch runs in the
    /// same tick with whatever cooldown is left. A cooldown that already ran
    /// out therefore picks the next destination immediately.
    pub fn tick(&mut self, snitch: &mut Pose, dt: f32, rng: &mut impl Rng) -> WanderReport {
        let mut report = WanderReport::default();

        if let Some(dest) = self.destination {
            if snitch.position.distance(dest) >= self.config.arrival_radius {
                snitch.face_towards(dest);
                let step = (dest - snitch.position).clamp_length_max(self.config.speed);
                snitch.position += step;
                report.moved = step;
                return report;
            }
            self.destination = None;
            report.reached = Some(dest);
            tracing::debug!(?dest, cooldown = self.cooldown, "snitch reached destination");
        }

        if self.cooldown > 0.0 {
            self.cooldown = (self.cooldown - dt).max(0.0);
            return report;
        }

        let dest = self.sample_destination(rng);
        self.destination = Some(dest);
        self.cooldown = self.config.idle_cooldown;
        report.picked = Some(dest);
        tracing::debug!(?dest, "snitch picked destination");
        report
    }

    /// Uniform point inside the arena box.
    pub fn sample_destination(&self, rng: &mut impl Rng) -> Vec3 {
        let min = self.config.arena_min;
        let extent = self.config.arena_max - min;
        min + Vec3::new(rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>()) * extent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f32 = 1.0 / 60.0;

    fn snitch() -> Pose {
        Pose::at(Vec3::new(0.0, 10.0, -2.0))
    }

    #[test]
    fn starts_idle_with_full_cooldown() {
        let ai = WanderAi::new(SnitchConfig::default());
        assert_eq!(ai.state(), WanderState::Idle);
        assert_eq!(ai.cooldown(), 1.0);
        assert_eq!(ai.destination(), None);
    }

    #[test]
    fn idles_about_one_second_before_first_pick() {
        let mut ai = WanderAi::new(SnitchConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut pose = snitch();
        let mut ticks = 0;
        while ai.state() == WanderState::Idle {
            let report = ai.tick(&mut pose, DT, &mut rng);
            assert!(ai.cooldown() >= 0.0);
            ticks += 1;
            if report.picked.is_some() {
                break;
            }
            assert!(ticks < 100);
        }
        assert!((60..=62).contains(&ticks), "picked after {ticks} ticks");
        assert_eq!(ai.cooldown(), 1.0);
        assert_eq!(pose.position, snitch().position);
    }

    #[test]
    fn samples_stay_in_arena() {
        let cfg = SnitchConfig::default();
        let ai = WanderAi::new(cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..1000 {
            let d = ai.sample_destination(&mut rng);
            assert!(d.cmpge(cfg.arena_min).all() && d.cmple(cfg.arena_max).all());
        }
    }

    #[test]
    fn seeking_faces_and_steps_toward_destination() {
        let mut ai = WanderAi::new(SnitchConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pose = snitch();
        ai.destination = Some(Vec3::new(10.0, 10.0, -2.0));

        let report = ai.tick(&mut pose, DT, &mut rng);
        assert!((report.moved.length() - 0.1).abs() < 1e-6);
        assert!(pose.position.abs_diff_eq(Vec3::new(0.1, 10.0, -2.0), 1e-5));
        assert!(pose.to_world_offset(Vec3::Z).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn arrival_clears_destination() {
        let mut ai = WanderAi::new(SnitchConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut pose = snitch();
        let dest = pose.position + Vec3::new(0.05, 0.0, 0.0);
        ai.destination = Some(dest);

        let report = ai.tick(&mut pose, DT, &mut rng);
        assert_eq!(report.reached, Some(dest));
        assert_eq!(ai.state(), WanderState::Idle);
        assert!(ai.cooldown() < 1.0);
    }

    #[test]
    fn arrival_with_spent_cooldown_repicks_same_tick() {
        let mut ai = WanderAi::new(SnitchConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut pose = snitch();
        ai.destination = Some(pose.position);
        ai.cooldown = 0.0;

        let report = ai.tick(&mut pose, DT, &mut rng);
        assert!(report.reached.is_some());
        assert!(report.picked.is_some());
        assert_eq!(ai.state(), WanderState::Seeking);
        assert_eq!(ai.cooldown(), 1.0);
    }

    #[test]
    fn seeking_always_terminates() {
        let cfg = SnitchConfig::default();
        for seed in 0..20 {
            let mut ai = WanderAi::new(cfg);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut pose = snitch();
            ai.cooldown = 0.0;
            let picked = ai.tick(&mut pose, DT, &mut rng).picked.unwrap();

            let bound = (pose.position.distance(picked) / cfg.speed).ceil() as usize + 2;
            let mut last = pose.position.distance(picked);
            let mut ticks = 0;
            while ai.state() == WanderState::Seeking {
                ai.tick(&mut pose, DT, &mut rng);
                ticks += 1;
                let d = pose.position.distance(picked);
                assert!(d < last || ai.state() == WanderState::Idle);
                last = d;
                assert!(ticks <= bound, "seed {seed} did not arrive in {bound} ticks");
            }
        }
    }

    #[test]
    fn rest_forces_idle() {
        let mut ai = WanderAi::new(SnitchConfig::default());
        ai.destination = Some(Vec3::ONE);
        ai.rest(10.0);
        assert_eq!(ai.state(), WanderState::Idle);
        assert_eq!(ai.cooldown(), 10.0);
    }
}
