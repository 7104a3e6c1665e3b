//! Data-driven game balance
//!
//! Loaded once at startup from JSON. Missing fields fall back to the shipped
//! defaults so a tuning file only needs to list what it changes.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Error, Debug)]
pub enum TuningError {
    /// Tuning file could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    /// Tuning file is not valid JSON for [`Tuning`]
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is outside its allowed range
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Balance values for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Base speed at score 0
    pub start_speed: f32,
    /// Base speed gained per score step
    pub speed_step: f32,
    /// Score needed per speed step
    pub score_per_step: u64,
    /// Points awarded when an obstacle passes the player
    pub score_per_pass: u64,

    /// Speed buff multiplier and duration
    pub bonus_speed_factor: f32,
    pub bonus_duration_ms: u64,

    /// Depth speed multipliers
    pub obstacle_speed_multiplier: f32,
    pub bonus_speed_multiplier: f32,

    /// Obstacle spawning
    pub obstacle_check_ms: u64,
    pub obstacle_interval_ms: u64,
    pub large_chance: f32,
    pub targeting_chance: f32,

    /// Bonus spawning, delay drawn from [min, max)
    pub bonus_check_ms: u64,
    pub bonus_delay_min_ms: u64,
    pub bonus_delay_max_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_speed: 0.39,
            speed_step: 0.04,
            score_per_step: 100,
            score_per_pass: 10,

            bonus_speed_factor: 2.0,
            bonus_duration_ms: 5_000,

            obstacle_speed_multiplier: 1.5,
            bonus_speed_multiplier: 1.5,

            obstacle_check_ms: 100,
            obstacle_interval_ms: 640,
            large_chance: 0.08,
            targeting_chance: 0.08,

            bonus_check_ms: 1_000,
            bonus_delay_min_ms: 10_000,
            bonus_delay_max_ms: 20_000,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    /// Check ranges that would otherwise break session invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        if !(self.start_speed.is_finite() && self.start_speed > 0.0) {
            return invalid("start_speed", "must be positive");
        }
        if !(self.speed_step.is_finite() && self.speed_step >= 0.0) {
            return invalid("speed_step", "must not be negative");
        }
        if self.score_per_step == 0 {
            return invalid("score_per_step", "must be at least 1");
        }
        if !(self.bonus_speed_factor.is_finite() && self.bonus_speed_factor >= 1.0) {
            return invalid("bonus_speed_factor", "must be at least 1");
        }
        if self.bonus_duration_ms == 0 {
            return invalid("bonus_duration_ms", "must be at least 1");
        }
        if self.obstacle_check_ms == 0 || self.bonus_check_ms == 0 {
            return invalid("check_ms", "poll periods must be at least 1");
        }
        for (field, chance) in [
            ("large_chance", self.large_chance),
            ("targeting_chance", self.targeting_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return invalid(field, "must be within [0, 1]");
            }
        }
        if self.bonus_delay_min_ms >= self.bonus_delay_max_ms {
            return invalid("bonus_delay_min_ms", "must be below bonus_delay_max_ms");
        }
        Ok(())
    }

    /// Score-derived base speed: `start + floor(score / step) * speed_step`
    #[inline]
    pub fn base_speed(&self, score: u64) -> f32 {
        self.start_speed + (score / self.score_per_step) as f32 * self.speed_step
    }

    pub fn bonus_duration(&self) -> Duration {
        Duration::from_millis(self.bonus_duration_ms)
    }

    pub fn obstacle_check(&self) -> Duration {
        Duration::from_millis(self.obstacle_check_ms)
    }

    pub fn obstacle_interval(&self) -> Duration {
        Duration::from_millis(self.obstacle_interval_ms)
    }

    pub fn bonus_check(&self) -> Duration {
        Duration::from_millis(self.bonus_check_ms)
    }
}
