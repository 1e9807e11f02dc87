use broomchase_kernel::{SimEvent, Simulation, WanderState};
use glam::Vec3;
use serde::Serialize;

/// Read-only queries against the simulation for debugging and the HUD.
pub struct SimInspector;

impl SimInspector {
    /// Produce a summary of the simulation state.
    pub fn summary(sim: &Simulation) -> SimSummary {
        SimSummary {
            tick: sim.tick(),
            time: sim.time(),
            seed: sim.config().seed,
            broom: sim.broom().position,
            snitch: sim.snitch().position,
            separation: sim.broom().distance_to(sim.snitch()),
            turning: !sim.intent().turn.is_zero(),
            wander: sim.wander().state(),
            destination: sim.wander().destination(),
            cooldown: sim.wander().cooldown(),
            catches: sim.catches(),
            live_particles: sim.particles().len(),
            pending_events: sim.events().len(),
        }
    }
}

/// Summary of simulation state for the inspector.
#[derive(Debug, Clone, Serialize)]
pub struct SimSummary {
    pub tick: u64,
    pub time: f64,
    pub seed: u64,
    pub broom: Vec3,
    pub snitch: Vec3,
    pub separation: f32,
    /// Pointer steering is outside the deadzone.
    pub turning: bool,
    pub wander: WanderState,
    pub destination: Option<Vec3>,
    pub cooldown: f32,
    pub catches: u64,
    pub live_particles: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for SimSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Sim: tick={} t={:.2}s seed={} separation={:.2} snitch={:?} cooldown={:.2}s catches={} particles={}",
            self.tick,
            self.time,
            self.seed,
            self.separation,
            self.wander,
            self.cooldown,
            self.catches,
            self.live_particles,
        )
    }
}

/// One-line human description of an event.
pub fn describe_event(event: &SimEvent) -> String {
    match event {
        SimEvent::MotionStarted { tick, direction } => format!("[{tick}] broom {direction:?} on"),
        SimEvent::MotionStopped { tick, direction } => format!("[{tick}] broom {direction:?} off"),
        SimEvent::DestinationPicked { tick, destination: d } => {
            format!("[{tick}] snitch heading to ({:.1}, {:.1}, {:.1})", d.x, d.y, d.z)
        }
        SimEvent::DestinationReached { tick, .. } => format!("[{tick}] snitch arrived"),
        SimEvent::Caught { tick, distance } => format!("[{tick}] caught at {distance:.2}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broomchase_input::{MotionDirection, Viewport};
    use broomchase_kernel::SimConfig;

    fn sim() -> Simulation {
        Simulation::new(SimConfig::default(), Viewport::new(800, 600))
    }

    #[test]
    fn summary_initial_state() {
        let s = sim();
        let summary = SimInspector::summary(&s);
        assert_eq!(summary.tick, 0);
        assert_eq!(summary.catches, 0);
        assert_eq!(summary.wander, WanderState::Idle);
        assert!((summary.separation - 2.0).abs() < 1e-6);
    }

    #[test]
    fn summary_counts_events_and_particles() {
        let mut s = sim();
        s.press_motion(MotionDirection::Forward);
        s.run(3);
        let summary = SimInspector::summary(&s);
        assert_eq!(summary.tick, 3);
        assert_eq!(summary.pending_events, 1);
        assert_eq!(summary.live_particles, s.particles().len());
    }

    #[test]
    fn summary_reports_steering() {
        let mut s = sim();
        s.pointer_moved(400.0, 300.0);
        assert!(!SimInspector::summary(&s).turning);
        s.pointer_moved(800.0, 300.0);
        assert!(SimInspector::summary(&s).turning);
        s.pointer_left();
        assert!(!SimInspector::summary(&s).turning);
    }

    #[test]
    fn summary_display() {
        let summary = SimInspector::summary(&sim());
        let text = format!("{summary}");
        assert!(text.contains("tick=0"));
        assert!(text.contains("catches=0"));
    }

    #[test]
    fn summary_serializes() {
        let json = serde_json::to_string(&SimInspector::summary(&sim())).unwrap();
        assert!(json.contains("\"wander\":\"Idle\""));
    }

    #[test]
    fn describes_catch() {
        let text = describe_event(&SimEvent::Caught {
            tick: 12,
            distance: 0.4,
        });
        assert_eq!(text, "[12] caught at 0.40");
    }
}
