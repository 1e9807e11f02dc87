use broomchase_common::Pose;
use broomchase_input::{InputIntent, InputTracker, MotionDirection, Viewport};
use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::camera::ChaseCamera;
use crate::config::SimConfig;
use crate::frame::{FrameSnapshot, ParticleView};
use crate::particles::{Particle, ParticleEmitter};
use crate::wander::WanderAi;
use crate::{catch, player};

/// An event record produced by notable state changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    MotionStarted { tick: u64, direction: MotionDirection },
    MotionStopped { tick: u64, direction: MotionDirection },
    DestinationPicked { tick: u64, destination: Vec3 },
    DestinationReached { tick: u64, destination: Vec3 },
    Caught { tick: u64, distance: f32 },
}

/// The authoritative simulation state.
///
/// Owns both poses, the input intent, every controller and the RNG streams.
/// Each controller is handed exactly the state it reads and the single pose it
/// owns: the broom is written only by player motion, the snitch only by the
/// wander AI. Given the same seed and input sequence, two simulations stay
/// bit-identical.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    tick: u64,
    input: InputTracker,
    broom: Pose,
    snitch: Pose,
    camera: ChaseCamera,
    wander: WanderAi,
    emitter: ParticleEmitter,
    wander_rng: ChaCha8Rng,
    particle_rng: ChaCha8Rng,
    catches: u64,
    /// Bounded log, drained by the embedding application.
    events: Vec<SimEvent>,
}

impl Simulation {
    /// Most events kept between drains. When full, the oldest half is dropped.
    pub const EVENT_LOG_CAPACITY: usize = 1024;

    /// `config` is assumed validated; `viewport` must be nonzero.
    pub fn new(config: SimConfig, viewport: Viewport) -> Self {
        let broom = Pose::at(config.broom.start_position);
        let snitch = Pose::at(config.snitch.start_position);
        Self {
            config,
            tick: 0,
            input: InputTracker::new(viewport, config.steering),
            broom,
            snitch,
            camera: ChaseCamera::new(config.camera, broom.position),
            wander: WanderAi::new(config.snitch),
            emitter: ParticleEmitter::new(config.particles, config.snitch.radius),
            wander_rng: ChaCha8Rng::seed_from_u64(config.seed),
            particle_rng: ChaCha8Rng::seed_from_u64(splitmix64(config.seed)),
            catches: 0,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Ticks stepped so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulation time in seconds.
    pub fn time(&self) -> f64 {
        self.tick as f64 / self.config.tick_rate_hz as f64
    }

    pub fn intent(&self) -> &InputIntent {
        self.input.intent()
    }

    pub fn broom(&self) -> &Pose {
        &self.broom
    }

    pub fn snitch(&self) -> &Pose {
        &self.snitch
    }

    pub fn camera(&self) -> &ChaseCamera {
        &self.camera
    }

    pub fn wander(&self) -> &WanderAi {
        &self.wander
    }

    pub fn particles(&self) -> &[Particle] {
        self.emitter.particles()
    }

    pub fn emitter(&self) -> &ParticleEmitter {
        &self.emitter
    }

    pub fn catches(&self) -> u64 {
        self.catches
    }

    /// Events since the last [`Simulation::drain_events`], oldest first.
    ///
    /// Embedders should drain regularly. Undrained, the log holds at most
    /// [`Simulation::EVENT_LOG_CAPACITY`] entries and older ones are lost.
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Motion key pressed. Ignored while any motion is already active.
    pub fn press_motion(&mut self, direction: MotionDirection) {
        if self.input.press(direction) {
            self.record(SimEvent::MotionStarted {
                tick: self.tick,
                direction,
            });
        }
    }

    /// Motion key released. Stops motion only if `direction` is the active one.
    pub fn release_motion(&mut self, direction: MotionDirection) {
        if self.input.release(direction) {
            self.record(SimEvent::MotionStopped {
                tick: self.tick,
                direction,
            });
        }
    }

    fn record(&mut self, event: SimEvent) {
        if self.events.len() >= Self::EVENT_LOG_CAPACITY {
            let dropped = Self::EVENT_LOG_CAPACITY / 2;
            self.events.drain(..dropped);
            tracing::debug!(dropped, "event log full; dropping oldest events");
        }
        self.events.push(event);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.input.pointer_moved(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.input.pointer_left();
    }

    /// Advance one fixed tick: broom motion, camera, wander AI, catch test,
    /// particle trail.
    pub fn step(&mut self) {
        let _span = tracing::info_span!("sim_step", tick = self.tick + 1).entered();
        self.tick += 1;
        let dt = self.config.tick_seconds();
        let now = self.time();
        tracing::trace!(now, motion = ?self.input.intent().motion, "stepping");

        player::step(&mut self.broom, self.input.intent(), &self.config.broom);
        self.camera.update(&self.broom);

        let report = self.wander.tick(&mut self.snitch, dt, &mut self.wander_rng);
        tracing::trace!(moved = ?report.moved, state = ?self.wander.state(), "snitch stepped");
        if let Some(destination) = report.reached {
            self.record(SimEvent::DestinationReached {
                tick: self.tick,
                destination,
            });
        }
        if let Some(destination) = report.picked {
            self.record(SimEvent::DestinationPicked {
                tick: self.tick,
                destination,
            });
        }

        if let Some(distance) =
            catch::detect(&self.broom, &self.snitch, &mut self.wander, &self.config.catch)
        {
            self.catches += 1;
            self.record(SimEvent::Caught {
                tick: self.tick,
                distance,
            });
        }

        self.emitter.tick(&self.snitch, now, &mut self.particle_rng);
    }

    /// Step `n` ticks.
    pub fn run(&mut self, n: u64) {
        for _ in 0..n {
            self.step();
        }
    }

    /// Render-sink view of the current state.
    pub fn snapshot(&self) -> FrameSnapshot {
        let now = self.time();
        FrameSnapshot {
            tick: self.tick,
            time: now,
            broom: self.broom,
            snitch: self.snitch,
            camera: self.camera.state(),
            particles: self
                .emitter
                .particles()
                .iter()
                .map(|p| ParticleView {
                    position: p.position,
                    remaining: p.remaining(now) as f32,
                })
                .collect(),
            wander: self.wander.state(),
            cooldown: self.wander.cooldown(),
            catches: self.catches,
        }
    }

    /// Deterministic hash of the simulation state for replay comparison.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        let mix_floats = |h: &mut u64, floats: &[f32]| {
            for f in floats {
                mix(h, &f.to_le_bytes());
            }
        };
        mix(&mut h, &self.tick.to_le_bytes());
        mix(&mut h, &self.catches.to_le_bytes());
        for pose in [&self.broom, &self.snitch] {
            mix_floats(&mut h, &pose.position.to_array());
            mix_floats(&mut h, &pose.rotation.to_array());
        }
        mix_floats(&mut h, &self.camera.position().to_array());
        mix_floats(&mut h, &[self.wander.cooldown()]);
        if let Some(dest) = self.wander.destination() {
            mix_floats(&mut h, &dest.to_array());
        }
        for p in self.emitter.particles() {
            mix_floats(&mut h, &p.position.to_array());
            mix(&mut h, &p.expires_at.to_le_bytes());
        }
        h
    }
}

/// Splitmix64 step, used to derive independent RNG seeds from the config seed.
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BroomConfig, SnitchConfig};
    use crate::wander::WanderState;

    fn viewport() -> Viewport {
        Viewport::new(1280, 720)
    }

    fn sim() -> Simulation {
        Simulation::new(SimConfig::default(), viewport())
    }

    #[test]
    fn starts_at_configured_poses() {
        let s = sim();
        assert_eq!(s.tick(), 0);
        assert_eq!(s.broom().position, Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(s.snitch().position, Vec3::new(0.0, 10.0, -2.0));
        assert_eq!(s.wander().state(), WanderState::Idle);
        assert_eq!(s.wander().cooldown(), 1.0);
        assert!(s.particles().is_empty());
    }

    #[test]
    fn step_advances_time() {
        let mut s = sim();
        s.run(60);
        assert_eq!(s.tick(), 60);
        assert!((s.time() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn snitch_holds_still_during_first_cooldown() {
        let mut s = sim();
        s.run(30);
        assert_eq!(s.snitch().position, Vec3::new(0.0, 10.0, -2.0));
        assert!(!s
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::DestinationPicked { .. })));
    }

    #[test]
    fn snitch_wanders_after_cooldown() {
        let mut s = sim();
        s.run(120);
        assert!(s
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::DestinationPicked { .. })));
        assert_ne!(s.snitch().position, Vec3::new(0.0, 10.0, -2.0));
    }

    #[test]
    fn flying_forward_catches_resting_snitch() {
        // Broom at (0,10,0) flying along -Z toward the snitch at (0,10,-2).
        let mut s = sim();
        s.press_motion(MotionDirection::Forward);
        let mut caught_at = None;
        for _ in 0..30 {
            s.step();
            if s.catches() > 0 {
                caught_at = Some(s.tick());
                break;
            }
        }
        let tick = caught_at.expect("broom should reach the snitch");
        assert!(s.broom().distance_to(s.snitch()) <= 0.5);
        assert_eq!(s.wander().state(), WanderState::Idle);
        assert_eq!(s.wander().destination(), None);
        assert_eq!(s.wander().cooldown(), 10.0);
        assert!(s
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::Caught { tick: t, .. } if *t == tick)));
    }

    #[test]
    fn catch_interrupts_seeking() {
        let config = SimConfig {
            broom: BroomConfig {
                start_position: Vec3::new(0.0, 10.0, -1.8),
                ..BroomConfig::default()
            },
            snitch: SnitchConfig {
                idle_cooldown: 0.0,
                ..SnitchConfig::default()
            },
            ..SimConfig::default()
        };
        let mut s = Simulation::new(config, viewport());
        s.step();
        // The AI picked a destination this tick, then the catch cancelled it.
        assert_eq!(s.catches(), 1);
        assert_eq!(s.wander().state(), WanderState::Idle);
        assert!(s.wander().cooldown() >= 10.0);
    }

    #[test]
    fn motion_events_are_logged_once() {
        let mut s = sim();
        s.press_motion(MotionDirection::Forward);
        s.press_motion(MotionDirection::Forward);
        s.press_motion(MotionDirection::Backward);
        s.release_motion(MotionDirection::Backward);
        s.release_motion(MotionDirection::Forward);
        let events = s.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], SimEvent::MotionStarted { direction: MotionDirection::Forward, .. }));
        assert!(matches!(events[1], SimEvent::MotionStopped { direction: MotionDirection::Forward, .. }));
        assert!(s.events().is_empty());
    }

    #[test]
    fn undrained_event_log_stays_bounded() {
        let mut s = sim();
        for _ in 0..Simulation::EVENT_LOG_CAPACITY {
            s.press_motion(MotionDirection::Forward);
            s.release_motion(MotionDirection::Forward);
        }
        assert!(s.events().len() <= Simulation::EVENT_LOG_CAPACITY);
        assert!(s.events().len() > Simulation::EVENT_LOG_CAPACITY / 2);
        assert!(matches!(
            s.events().last(),
            Some(SimEvent::MotionStopped { direction: MotionDirection::Forward, .. })
        ));

        s.run(600);
        assert!(s.events().len() <= Simulation::EVENT_LOG_CAPACITY);
        assert!(s.drain_events().len() <= Simulation::EVENT_LOG_CAPACITY);
        assert!(s.events().is_empty());
    }

    #[test]
    fn camera_trails_broom() {
        let mut s = sim();
        s.run(120);
        let desired = s.camera().desired_position(s.broom());
        assert!(s.camera().position().distance(desired) < 1e-3);
        assert_eq!(s.camera().state().look_at, s.broom().position);
    }

    #[test]
    fn pointer_steering_turns_broom() {
        let mut s = sim();
        s.pointer_moved(1280.0, 360.0);
        s.step();
        assert_ne!(s.broom().rotation, glam::Quat::IDENTITY);
        s.pointer_left();
        let r = s.broom().rotation;
        s.step();
        assert_eq!(s.broom().rotation, r);
    }

    #[test]
    fn particles_trail_snitch() {
        let mut s = sim();
        s.run(90);
        let snap = s.snapshot();
        assert!(!snap.particles.is_empty());
        assert_eq!(s.emitter().spawned_total(), 90 * 20);
        for p in &snap.particles {
            assert!(p.remaining > 0.0 && p.remaining < 1.0);
        }
    }

    #[test]
    fn same_seed_same_state() {
        let mut a = sim();
        let mut b = sim();
        for s in [&mut a, &mut b] {
            s.press_motion(MotionDirection::Forward);
            s.pointer_moved(100.0, 200.0);
            s.run(200);
        }
        assert_eq!(a.state_hash(), b.state_hash());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = sim();
        let mut b = Simulation::new(
            SimConfig {
                seed: 7,
                ..SimConfig::default()
            },
            viewport(),
        );
        a.run(120);
        b.run(120);
        assert_ne!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn snapshot_mirrors_state() {
        let mut s = sim();
        s.run(10);
        let snap = s.snapshot();
        assert_eq!(snap.tick, 10);
        assert_eq!(snap.broom, *s.broom());
        assert_eq!(snap.snitch, *s.snitch());
        assert_eq!(snap.camera, s.camera().state());
        assert_eq!(snap.particles.len(), s.particles().len());
    }
}
