/// Fixed-rate tick scheduler fed by variable render-frame deltas.
///
/// Render frames call [`FixedTimestep::advance`] with the elapsed wall time and
/// run the returned number of simulation ticks. Leftover time carries over to
/// the next frame.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    tick_seconds: f64,
    accumulator: f64,
    max_steps_per_frame: u32,
}

impl FixedTimestep {
    pub const DEFAULT_MAX_STEPS: u32 = 8;

    pub fn new(tick_rate_hz: f32) -> Self {
        Self {
            tick_seconds: 1.0 / tick_rate_hz as f64,
            accumulator: 0.0,
            max_steps_per_frame: Self::DEFAULT_MAX_STEPS,
        }
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps_per_frame = max_steps.max(1);
        self
    }

    pub fn tick_seconds(&self) -> f64 {
        self.tick_seconds
    }

    /// Time banked toward the next tick.
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Bank `dt` seconds and return how many whole ticks are due.
    ///
    /// At most `max_steps_per_frame` ticks are returned; time beyond that is
    /// dropped so a long stall does not trigger a burst of catch-up ticks.
    pub fn advance(&mut self, dt: f64) -> u32 {
        self.accumulator += dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= self.tick_seconds {
            self.accumulator -= self.tick_seconds;
            steps += 1;
            if steps == self.max_steps_per_frame {
                if self.accumulator >= self.tick_seconds {
                    tracing::debug!(
                        dropped = self.accumulator,
                        "fixed timestep fell behind; dropping backlog"
                    );
                    self.accumulator %= self.tick_seconds;
                }
                break;
            }
        }
        steps
    }
}
