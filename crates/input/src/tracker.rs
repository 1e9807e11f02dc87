use glam::Vec2;

use crate::intent::{InputIntent, MotionDirection, SteeringConfig, TurnRate, steer};

/// Render surface size in pixels, captured once at start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// Both dimensions must be nonzero; pointer normalization divides by them.
    pub fn new(width: u32, height: u32) -> Self {
        debug_assert!(width > 0 && height > 0, "viewport must be nonzero");
        Self {
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width, self.height) * 0.5
    }

    /// Offset of a pixel coordinate from the center, each axis in `[-1, 1]`.
    pub fn normalize(&self, x: f32, y: f32) -> Vec2 {
        let c = self.center();
        ((Vec2::new(x, y) - c) / c).clamp(Vec2::NEG_ONE, Vec2::ONE)
    }
}

/// Folds key and pointer events into an [`InputIntent`].
#[derive(Debug, Clone)]
pub struct InputTracker {
    viewport: Viewport,
    steering: SteeringConfig,
    intent: InputIntent,
}

impl InputTracker {
    pub fn new(viewport: Viewport, steering: SteeringConfig) -> Self {
        Self {
            viewport,
            steering,
            intent: InputIntent::default(),
        }
    }

    pub fn intent(&self) -> &InputIntent {
        &self.intent
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// A motion key went down. Starts motion in `dir` unless some motion is
    /// already active, in which case the press is ignored. Returns whether
    /// motion started.
    pub fn press(&mut self, dir: MotionDirection) -> bool {
        if self.intent.motion.is_some() {
            return false;
        }
        self.intent.motion = Some(dir);
        tracing::debug!(?dir, "motion started");
        true
    }

    /// A motion key went up. Stops motion only if `dir` is the active one.
    /// Returns whether motion stopped.
    pub fn release(&mut self, dir: MotionDirection) -> bool {
        if self.intent.motion != Some(dir) {
            return false;
        }
        self.intent.motion = None;
        tracing::debug!(?dir, "motion stopped");
        true
    }

    /// Pointer moved to pixel coordinates `(x, y)` within the viewport.
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        let offset = self.viewport.normalize(x, y);
        self.intent.pointer = offset;
        self.intent.turn = steer(offset, &self.steering);
        tracing::trace!(?offset, turn = ?self.intent.turn, "pointer moved");
    }

    /// Pointer left the viewport; turning stops immediately.
    pub fn pointer_left(&mut self) {
        self.intent.pointer = Vec2::ZERO;
        self.intent.turn = TurnRate::ZERO;
    }
}
