//! Astro Dash - an asteroid-dodging arcade runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, motion, collisions, session state)
//! - `game`: Frame-driven facade a host calls once per rendered frame
//! - `clock`: Injectable monotonic time sources
//! - `record`: Best-score persistence sinks (fire-and-forget)
//! - `tuning`: Data-driven game balance

pub mod clock;
pub mod game;
pub mod record;
pub mod sim;
pub mod tuning;

pub use clock::{Clock, FrameClock, ManualClock, MonotonicClock};
pub use game::{Game, Snapshot};
pub use record::{BestScoreFile, LogSink, RecordError, RecordSink, RecordSubmission};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Tuning constants are expressed per frame at this rate
    pub const BASELINE_FPS: f32 = 60.0;

    /// Player geometry
    pub const PLAYER_BOUND_RADIUS: f32 = 0.35;
    pub const PLAYER_SAFE_MARGIN: f32 = 0.4;
    pub const PLAYFIELD_HALF_EXTENT: f32 = 2.4;
    /// Half-extent of the square the player is confined to
    pub const PLAYER_MAX_POS: f32 = PLAYFIELD_HALF_EXTENT - PLAYER_BOUND_RADIUS - PLAYER_SAFE_MARGIN;
    /// Player movement per unit of input intent
    pub const PLAYER_MOVE_SPEED: f32 = 1.61;
    /// Extra gain on the vertical axis only
    pub const PLAYER_VERTICAL_GAIN: f32 = 1.55;
    /// Exponential easing rate of rendered position toward target (per second)
    pub const PLAYER_EASE_RATE: f32 = 8.0;

    /// Input smoothing
    pub const INPUT_MAX_DELTA: f32 = 0.1;
    pub const INPUT_SMOOTHING: f32 = 0.7;
    pub const INPUT_DEADZONE: f32 = 1e-4;

    /// Collision radii
    pub const PLAYER_HIT_RADIUS: f32 = 0.32;
    pub const PLAYER_PICKUP_RADIUS: f32 = 0.5;
    pub const BONUS_RADIUS: f32 = 1.2;
    /// Depth windows (strict)
    pub const OBSTACLE_HIT_DEPTH: f32 = 0.6;
    pub const BONUS_PICKUP_DEPTH: f32 = 1.5;

    /// Spawn / despawn depths
    pub const OBSTACLE_SPAWN_Z: f32 = -100.0;
    pub const LARGE_OBSTACLE_EXTRA_DISTANCE: f32 = 30.0;
    pub const BONUS_SPAWN_Z: f32 = -70.0;
    pub const DESPAWN_Z: f32 = 5.0;
    /// Spawn positions are uniform in [-SPAWN_HALF_EXTENT, SPAWN_HALF_EXTENT]
    pub const SPAWN_HALF_EXTENT: f32 = 3.5;

    /// Obstacle size classes (min, span)
    pub const NORMAL_RADIUS_MIN: f32 = 0.2;
    pub const NORMAL_RADIUS_SPAN: f32 = 0.8;
    pub const LARGE_RADIUS_MIN: f32 = 0.8;
    pub const LARGE_RADIUS_SPAN: f32 = 0.4;

    /// Targeting obstacles close this fraction of the gap per baseline frame
    pub const TARGETING_PULL: f32 = 0.02;

    /// Starfield
    pub const STAR_COUNT: usize = 800;
    pub const STAR_SPEED_MULTIPLIER: f32 = 1.6;
    pub const STAR_HALF_SPREAD: f32 = 75.0;
    pub const STAR_NEAR_Z: f32 = -100.0;
    pub const STAR_DEPTH_SPAN: f32 = 200.0;
}

/// Clamp both components of a planar position to a centred square
#[inline]
pub fn clamp_to_square(pos: Vec2, half_extent: f32) -> Vec2 {
    pos.clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent))
}

/// Convert a pixel position inside a `width` x `height` surface to normalized
/// [-1, 1] coordinates (y up)
#[inline]
pub fn normalize_pointer(px: f32, py: f32, width: f32, height: f32) -> Vec2 {
    let x = (px / width.max(1.0)) * 2.0 - 1.0;
    let y = -((py / height.max(1.0)) * 2.0 - 1.0);
    Vec2::new(x, y)
}

/// Sanitize a frame delta: negative or non-finite values become zero
#[inline]
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_pointer_corners() {
        assert_eq!(normalize_pointer(0.0, 0.0, 800.0, 600.0), Vec2::new(-1.0, 1.0));
        assert_eq!(normalize_pointer(800.0, 600.0, 800.0, 600.0), Vec2::new(1.0, -1.0));
        assert_eq!(normalize_pointer(400.0, 300.0, 800.0, 600.0), Vec2::ZERO);
    }

    #[test]
    fn test_sanitize_dt() {
        assert_eq!(sanitize_dt(0.016), 0.016);
        assert_eq!(sanitize_dt(-1.0), 0.0);
        assert_eq!(sanitize_dt(f32::NAN), 0.0);
        assert_eq!(sanitize_dt(f32::INFINITY), 0.0);
    }
}
