//! Pointer/touch smoothing
//!
//! Turns absolute normalized samples into a smoothed motion intent. The
//! latest intent is parked until the player step picks it up; later samples
//! in the same frame overwrite it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputMapper {
    /// Previous sample, `None` while no pointer is down
    last_sample: Option<Vec2>,
    /// Exponentially averaged delta
    smoothed: Vec2,
    /// Intent waiting for the next player step
    pending: Option<Vec2>,
}

impl InputMapper {
    /// Pointer went down: remember where, emit nothing
    pub fn press(&mut self, sample: Vec2) {
        self.last_sample = Some(sample);
    }

    /// New absolute sample while the pointer is down.
    ///
    /// Returns the intent published for this sample (zero for the first
    /// sample after a press-less move, which only seeds the history).
    pub fn sample(&mut self, sample: Vec2) -> Vec2 {
        let Some(last) = self.last_sample.replace(sample) else {
            return Vec2::ZERO;
        };
        self.feed_delta(sample - last)
    }

    /// Feed a raw delta directly (hosts that track pointer motion themselves)
    pub fn feed_delta(&mut self, raw: Vec2) -> Vec2 {
        // Non-finite deltas are dropped
        let raw = if raw.is_finite() {
            raw.clamp(Vec2::splat(-INPUT_MAX_DELTA), Vec2::splat(INPUT_MAX_DELTA))
        } else {
            Vec2::ZERO
        };
        self.smoothed = self.smoothed * INPUT_SMOOTHING + raw * (1.0 - INPUT_SMOOTHING);

        let intent = if self.smoothed.abs().max_element() > INPUT_DEADZONE {
            self.smoothed
        } else {
            Vec2::ZERO
        };
        self.pending = Some(intent);
        intent
    }

    /// Pointer released or cancelled: forget history and stop moving
    pub fn release(&mut self) {
        self.last_sample = None;
        self.smoothed = Vec2::ZERO;
        self.pending = Some(Vec2::ZERO);
    }

    /// Hand the parked intent to the player step (at most once)
    pub fn take_intent(&mut self) -> Option<Vec2> {
        self.pending.take()
    }

    pub fn smoothed(&self) -> Vec2 {
        self.smoothed
    }

    pub fn is_pressed(&self) -> bool {
        self.last_sample.is_some()
    }
}
