//! Frame-driven facade over the simulation
//!
//! A host owns one [`Game`], forwards pointer input as it arrives and calls
//! [`Game::tick`] once per rendered frame. Everything it needs to draw is
//! available through the read-only observables or a [`Snapshot`].

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, FrameClock};
use crate::record::{RecordSink, RecordSubmission};
use crate::sanitize_dt;
use crate::sim::{GameEvent, GamePhase, GameState, RenderEntity, autopilot, tick};
use crate::tuning::{Tuning, TuningError};

/// Serializable view of everything a HUD or renderer reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub best_score: u64,
    pub base_speed: f32,
    pub effective_speed: f32,
    pub bonus_active: bool,
    pub bonus_seconds_remaining: u64,
    pub player: Vec3,
    pub entities: Vec<RenderEntity>,
    /// Session clock at the time of the snapshot
    pub time_ms: u64,
}

pub struct Game<C: Clock = FrameClock> {
    state: GameState,
    clock: C,
    sink: Option<Box<dyn RecordSink>>,
    autopilot: bool,
    /// Events from the most recent tick or transition
    events: Vec<GameEvent>,
}

impl Game<FrameClock> {
    /// Default tuning, time driven by the frame deltas
    pub fn new(seed: u64) -> Self {
        Self::assemble(GameState::new(seed), FrameClock::new())
    }
}

impl<C: Clock> Game<C> {
    /// Custom tuning and time source. Tuning is validated first.
    pub fn with_clock(seed: u64, tuning: Tuning, clock: C) -> Result<Self, TuningError> {
        Ok(Self::assemble(GameState::with_tuning(seed, tuning)?, clock))
    }

    fn assemble(state: GameState, clock: C) -> Self {
        Self {
            state,
            clock,
            sink: None,
            autopilot: false,
            events: Vec::new(),
        }
    }

    /// Attach the sink that receives new best scores
    pub fn with_sink(mut self, sink: impl RecordSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Seed the best score from a previous session
    pub fn set_best_score(&mut self, best: u64) {
        self.state.session.best_score = best;
    }

    /// Let the built-in steering drive the player
    pub fn set_autopilot(&mut self, enabled: bool) {
        if self.autopilot != enabled {
            log::info!("Autopilot {}", if enabled { "on" } else { "off" });
        }
        self.autopilot = enabled;
    }

    pub fn autopilot(&self) -> bool {
        self.autopilot
    }

    // === Transitions ===

    /// Idle -> Playing. Returns false when ignored.
    pub fn start(&mut self) -> bool {
        let now = self.clock.now();
        self.transition(|state| state.start(now))
    }

    /// Playing/GameOver -> Idle. Returns false when ignored.
    pub fn stop(&mut self) -> bool {
        self.transition(GameState::stop)
    }

    /// Fresh run from any phase
    pub fn restart(&mut self) {
        let now = self.clock.now();
        self.transition(|state| Some(state.restart(now)));
    }

    fn transition(&mut self, apply: impl FnOnce(&mut GameState) -> Option<GameEvent>) -> bool {
        self.events.clear();
        match apply(&mut self.state) {
            Some(event) => {
                self.events.push(event);
                true
            }
            None => false,
        }
    }

    // === Input ===

    /// Raw per-frame pointer delta from a host that tracks motion itself
    pub fn submit_input_delta(&mut self, dx: f32, dy: f32) {
        self.state.input.feed_delta(Vec2::new(dx, dy));
    }

    /// Pointer went down at normalized `[-1, 1]` coordinates (y up)
    pub fn pointer_pressed(&mut self, x: f32, y: f32) {
        self.state.input.press(Vec2::new(x, y));
    }

    /// Pointer moved to normalized `[-1, 1]` coordinates (y up)
    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.state.input.sample(Vec2::new(x, y));
    }

    pub fn pointer_released(&mut self) {
        self.state.input.release();
    }

    // === Frame ===

    /// Advance one rendered frame of `dt` seconds. Returns this frame's events.
    pub fn tick(&mut self, dt: f32) -> &[GameEvent] {
        let dt = sanitize_dt(dt);
        self.clock.advance(dt);

        if self.autopilot {
            let delta = autopilot::steer(&self.state);
            self.state.input.feed_delta(delta);
        }

        let previous_best = self.state.session.best_score;
        self.events = tick(&mut self.state, self.clock.now(), dt);

        for event in &self.events {
            if let GameEvent::GameOver {
                score,
                new_record: true,
                ..
            } = *event
            {
                let record = RecordSubmission {
                    score,
                    previous_best,
                };
                log::info!("New record {score} (previous {previous_best})");
                if let Some(sink) = self.sink.as_mut() {
                    sink.submit(&record);
                }
            }
        }
        &self.events
    }

    // === Observables ===

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn score(&self) -> u64 {
        self.state.session.score
    }

    pub fn best_score(&self) -> u64 {
        self.state.session.best_score
    }

    pub fn base_speed(&self) -> f32 {
        self.state.session.base_speed
    }

    pub fn effective_speed(&self) -> f32 {
        self.state.effective_speed()
    }

    pub fn is_bonus_active(&self) -> bool {
        self.state.session.bonus.active
    }

    /// Whole seconds of buff left, rounded up (0 when inactive)
    pub fn bonus_seconds_remaining(&self) -> u64 {
        self.state.session.bonus.seconds_remaining(self.clock.now())
    }

    pub fn player_position(&self) -> Vec3 {
        self.state.player_pos()
    }

    pub fn entities(&self) -> impl Iterator<Item = RenderEntity> + '_ {
        self.state.render_entities()
    }

    pub fn stars(&self) -> &[Vec3] {
        self.state.starfield.stars()
    }

    /// Events from the most recent tick or transition
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        Snapshot {
            phase: self.phase(),
            score: self.score(),
            best_score: self.best_score(),
            base_speed: self.base_speed(),
            effective_speed: self.effective_speed(),
            bonus_active: self.is_bonus_active(),
            bonus_seconds_remaining: self.state.session.bonus.seconds_remaining(now),
            player: self.player_position(),
            entities: self.entities().collect(),
            time_ms: now.as_millis() as u64,
        }
    }
}
