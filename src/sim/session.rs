//! Score, speed and buff state machine
//!
//! `Idle -> Playing -> GameOver`, with `stop` back to Idle and `restart`
//! back to Playing. Score-driving inputs that arrive outside `Playing` are
//! dropped.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::state::GamePhase;
use crate::tuning::Tuning;

/// Timed speed buff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedBonus {
    pub active: bool,
    /// Expiry instant on the session clock; meaningful only while active
    pub expires_at: Duration,
}

impl SpeedBonus {
    /// Open a fresh window of `duration` from `now`, replacing any open one
    pub fn activate(&mut self, now: Duration, duration: Duration) {
        self.active = true;
        self.expires_at = now + duration;
    }

    /// Deactivate once `now` reaches the expiry instant (inclusive).
    /// Returns true on the call that closes the window.
    pub fn expire_if_due(&mut self, now: Duration) -> bool {
        if self.active && now >= self.expires_at {
            self.active = false;
            return true;
        }
        false
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Whole seconds left, rounded up; 0 when inactive or already due
    pub fn seconds_remaining(&self, now: Duration) -> u64 {
        if !self.active {
            return 0;
        }
        let left = self.expires_at.saturating_sub(now);
        left.as_nanos().div_ceil(1_000_000_000) as u64
    }
}

/// Summary emitted on the single Playing -> GameOver transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOverSummary {
    pub score: u64,
    pub best_score: u64,
    /// Score beat the previous best
    pub new_record: bool,
}

/// Session scalars: phase, score, best score, base speed, buff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    /// Score-derived speed, independent of the buff
    pub base_speed: f32,
    pub bonus: SpeedBonus,
}

impl Session {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            best_score: 0,
            base_speed: tuning.base_speed(0),
            bonus: SpeedBonus::default(),
        }
    }

    /// Speed actually applied to obstacles this tick
    pub fn effective_speed(&self, tuning: &Tuning) -> f32 {
        if self.bonus.active {
            self.base_speed * tuning.bonus_speed_factor
        } else {
            self.base_speed
        }
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    fn reset_run(&mut self, tuning: &Tuning) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.base_speed = tuning.base_speed(0);
        self.bonus = SpeedBonus::default();
    }

    /// Idle -> Playing. Returns false (no change) from any other phase.
    pub fn start(&mut self, tuning: &Tuning) -> bool {
        if self.phase != GamePhase::Idle {
            return false;
        }
        self.reset_run(tuning);
        true
    }

    /// Back to a fresh Playing run from any phase
    pub fn restart(&mut self, tuning: &Tuning) {
        self.reset_run(tuning);
    }

    /// Playing/GameOver -> Idle. Score and best score are kept as they are.
    pub fn stop(&mut self) -> bool {
        if self.phase == GamePhase::Idle {
            return false;
        }
        self.phase = GamePhase::Idle;
        self.bonus.deactivate();
        true
    }

    /// An obstacle got past the player. Returns the new score.
    pub fn obstacle_passed(&mut self, tuning: &Tuning) -> Option<u64> {
        if !self.is_playing() {
            return None;
        }
        self.score += tuning.score_per_pass;
        self.base_speed = tuning.base_speed(self.score);
        Some(self.score)
    }

    /// A bonus was picked up. Returns the new expiry instant.
    pub fn bonus_collected(&mut self, now: Duration, tuning: &Tuning) -> Option<Duration> {
        if !self.is_playing() {
            return None;
        }
        self.bonus.activate(now, tuning.bonus_duration());
        Some(self.bonus.expires_at)
    }

    /// Periodic expiry check. Returns true when the buff just ended.
    pub fn expire_bonus(&mut self, now: Duration) -> bool {
        self.is_playing() && self.bonus.expire_if_due(now)
    }

    /// Collision: Playing -> GameOver. Only the first call per run does
    /// anything; later calls return None.
    pub fn collide(&mut self) -> Option<GameOverSummary> {
        if !self.is_playing() {
            return None;
        }
        let new_record = self.score > self.best_score;
        if new_record {
            self.best_score = self.score;
        }
        self.bonus.deactivate();
        self.phase = GamePhase::GameOver;
        Some(GameOverSummary {
            score: self.score,
            best_score: self.best_score,
            new_record,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing() -> (Session, Tuning) {
        let tuning = Tuning::default();
        let mut session = Session::new(&tuning);
        assert!(session.start(&tuning));
        (session, tuning)
    }

    #[test]
    fn test_ten_passes_then_collision() {
        let (mut session, tuning) = playing();
        for _ in 0..10 {
            session.obstacle_passed(&tuning);
        }
        assert_eq!(session.score, 100);
        assert!((session.base_speed - 0.43).abs() < 1e-6);

        let summary = session.collide().unwrap();
        assert_eq!(session.phase, GamePhase::GameOver);
        assert_eq!(session.best_score, 100);
        assert!(summary.new_record);
    }

    #[test]
    fn test_collision_is_idempotent() {
        let (mut session, tuning) = playing();
        session.obstacle_passed(&tuning);
        assert!(session.collide().is_some());
        assert!(session.collide().is_none());
        assert_eq!(session.best_score, 10);
    }

    #[test]
    fn test_lower_score_keeps_best() {
        let (mut session, tuning) = playing();
        session.best_score = 500;
        session.obstacle_passed(&tuning);
        let summary = session.collide().unwrap();
        assert!(!summary.new_record);
        assert_eq!(session.best_score, 500);
    }

    #[test]
    fn test_pickup_resets_window_without_stacking() {
        let (mut session, tuning) = playing();
        let t0 = Duration::from_millis(1_000);
        session.bonus_collected(t0, &tuning);
        assert_eq!(session.bonus.expires_at, Duration::from_millis(6_000));

        let t1 = Duration::from_millis(4_000);
        session.bonus_collected(t1, &tuning);
        assert_eq!(session.bonus.expires_at, Duration::from_millis(9_000));
    }

    #[test]
    fn test_effective_speed_tracks_buff() {
        let (mut session, tuning) = playing();
        let base = session.base_speed;
        assert_eq!(session.effective_speed(&tuning), base);

        session.bonus_collected(Duration::ZERO, &tuning);
        assert_eq!(session.effective_speed(&tuning), base * 2.0);

        // Score changes while buffed keep the doubling on the new base
        for _ in 0..10 {
            session.obstacle_passed(&tuning);
        }
        assert_eq!(session.effective_speed(&tuning), session.base_speed * 2.0);
    }

    #[test]
    fn test_expiry_boundary_is_inclusive() {
        let (mut session, tuning) = playing();
        session.bonus_collected(Duration::ZERO, &tuning);

        assert!(!session.expire_bonus(Duration::from_millis(4_999)));
        assert!(session.bonus.active);

        assert!(session.expire_bonus(Duration::from_millis(5_000)));
        assert!(!session.bonus.active);
        assert_eq!(session.effective_speed(&tuning), session.base_speed);
        assert!(!session.expire_bonus(Duration::from_millis(5_001)));
    }

    #[test]
    fn test_seconds_remaining_rounds_up() {
        let mut bonus = SpeedBonus::default();
        assert_eq!(bonus.seconds_remaining(Duration::ZERO), 0);

        bonus.activate(Duration::ZERO, Duration::from_millis(5_000));
        assert_eq!(bonus.seconds_remaining(Duration::ZERO), 5);
        assert_eq!(bonus.seconds_remaining(Duration::from_millis(1)), 5);
        assert_eq!(bonus.seconds_remaining(Duration::from_millis(4_001)), 1);
        assert_eq!(bonus.seconds_remaining(Duration::from_millis(5_000)), 0);
        assert_eq!(bonus.seconds_remaining(Duration::from_millis(9_000)), 0);
    }

    #[test]
    fn test_seconds_remaining_counts_partial_milliseconds() {
        let mut bonus = SpeedBonus::default();
        bonus.activate(Duration::ZERO, Duration::from_millis(5_000));
        // 1.0005s left still shows as 2
        assert_eq!(bonus.seconds_remaining(Duration::from_micros(3_999_500)), 2);
        assert_eq!(bonus.seconds_remaining(Duration::from_nanos(4_999_999_999)), 1);
    }

    #[test]
    fn test_events_outside_playing_are_dropped() {
        let tuning = Tuning::default();
        let mut session = Session::new(&tuning);
        assert!(session.obstacle_passed(&tuning).is_none());
        assert!(session.bonus_collected(Duration::ZERO, &tuning).is_none());
        assert!(session.collide().is_none());
        assert_eq!(session.phase, GamePhase::Idle);

        let (mut session, tuning) = playing();
        session.collide();
        assert!(session.bonus_collected(Duration::ZERO, &tuning).is_none());
        assert!(!session.bonus.active);
        assert!(session.obstacle_passed(&tuning).is_none());
        assert_eq!(session.score, 0);
    }

    #[test]
    fn test_stop_mid_run_keeps_best() {
        let (mut session, tuning) = playing();
        session.best_score = 40;
        for _ in 0..8 {
            session.obstacle_passed(&tuning);
        }
        assert!(session.stop());
        assert_eq!(session.phase, GamePhase::Idle);
        assert_eq!(session.best_score, 40);
        assert!(!session.stop());
    }

    #[test]
    fn test_restart_reinitializes() {
        let (mut session, tuning) = playing();
        for _ in 0..25 {
            session.obstacle_passed(&tuning);
        }
        session.bonus_collected(Duration::ZERO, &tuning);
        session.collide();

        session.restart(&tuning);
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.score, 0);
        assert!((session.base_speed - 0.39).abs() < 1e-6);
        assert!(!session.bonus.active);
        assert_eq!(session.best_score, 250);
    }
}
