//! Scroll Accumulator
//!
//! Integrates continuous wheel intents until their net magnitude crosses a
//! threshold, then emits exactly one discrete step and starts over.

use crate::events::Direction;
use crate::input::Intent;

/// Net wheel travel needed for one slide step
pub const DEFAULT_SCROLL_THRESHOLD: f32 = 50.0;

/// Running total of unconsumed wheel input
#[derive(Clone, Copy, Debug)]
pub struct ScrollAccumulator {
    pending: f32,
    threshold: f32,
}

impl Default for ScrollAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_SCROLL_THRESHOLD)
    }
}

impl ScrollAccumulator {
    /// Create an accumulator with the given threshold
    #[must_use]
    pub fn new(threshold: f32) -> Self {
        Self {
            pending: 0.0,
            threshold: threshold.abs(),
        }
    }

    /// Add an intent; emit a direction once the threshold is reached
    ///
    /// The total resets to zero whenever a direction is emitted.
    pub fn accumulate(&mut self, intent: Intent) -> Option<Direction> {
        self.pending += intent.signed();

        if self.pending.abs() >= self.threshold {
            let direction = Direction::of(self.pending);
            self.pending = 0.0;
            return Some(direction);
        }

        None
    }

    /// Drop any partial total
    pub fn reset(&mut self) {
        self.pending = 0.0;
    }

    /// Partial total not yet consumed
    #[must_use]
    pub fn pending(&self) -> f32 {
        self.pending
    }

    /// Threshold for one step
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}
