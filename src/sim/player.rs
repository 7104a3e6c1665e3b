//! Player motion
//!
//! Input moves a target point; the rendered position eases toward it every
//! tick. Both are confined to the same square.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::clamp_to_square;
use crate::consts::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerMotion {
    /// Where input wants the player to be
    target: Vec2,
    /// Published position (collision + rendering)
    position: Vec2,
}

impl PlayerMotion {
    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    /// Snap both target and position back to the centre
    pub fn recenter(&mut self) {
        self.target = Vec2::ZERO;
        self.position = Vec2::ZERO;
    }

    /// Shift the target by a smoothed input intent. Zero-ish intents are ignored.
    pub fn apply_intent(&mut self, intent: Vec2) {
        if intent.abs().max_element() <= INPUT_DEADZONE {
            return;
        }
        let magnitude = intent.length();
        let direction = intent / magnitude;
        let distance = magnitude * PLAYER_MOVE_SPEED;

        self.target.x += direction.x * distance;
        self.target.y += direction.y * distance * PLAYER_VERTICAL_GAIN;
        self.target = clamp_to_square(self.target, PLAYER_MAX_POS);
    }

    /// Ease the published position toward the target
    pub fn ease(&mut self, dt: f32) {
        // Factor capped at 1 so a long frame lands on the target instead of past it
        let t = (PLAYER_EASE_RATE * dt).min(1.0);
        self.position += (self.target - self.position) * t;
        self.position = clamp_to_square(self.position, PLAYER_MAX_POS);
    }

    /// One tick: consume the intent (if any), then ease
    pub fn step(&mut self, intent: Option<Vec2>, dt: f32) {
        if let Some(intent) = intent {
            self.apply_intent(intent);
        }
        self.ease(dt);
    }
}
