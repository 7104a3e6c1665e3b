//! Game state and core simulation types
//!
//! Everything one run needs lives in [`GameState`]; there is no ambient
//! global state, so independent instances can run side by side.

use glam::{Vec2, Vec3};
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, EntityId, Keyed};
use super::input::InputMapper;
use super::player::PlayerMotion;
use super::session::Session;
use super::spawn::{BonusSpawner, ObstacleSpawner};
use super::starfield::Starfield;
use crate::consts::*;
use crate::tuning::{Tuning, TuningError};

/// Top-level session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Run ended by a collision; waits for restart or stop
    GameOver,
}

/// Which asteroid model the renderer should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleVariant {
    Rocky,
    Cratered,
}

/// An asteroid flying toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    pub pos: Vec3,
    /// Collision radius
    pub radius: f32,
    pub is_large: bool,
    pub variant: ObstacleVariant,
    /// Player position captured at spawn; set once, never resampled
    pub target: Option<Vec2>,
}

impl Obstacle {
    pub fn is_targeting(&self) -> bool {
        self.target.is_some()
    }

    /// Move along the depth axis and, for targeting obstacles, pull the
    /// planar position toward the locked target by `pull` (0..=1) of the gap
    pub fn advance(&mut self, depth_step: f32, pull: f32) {
        self.pos.z += depth_step;
        if let Some(target) = self.target {
            let planar = self.pos.truncate();
            let next = planar + (target - planar) * pull;
            self.pos.x = next.x;
            self.pos.y = next.y;
        }
    }
}

impl Keyed for Obstacle {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// A speed-buff pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub id: EntityId,
    pub pos: Vec3,
    pub collected: bool,
}

impl Keyed for Bonus {
    fn id(&self) -> EntityId {
        self.id
    }
}

/// Kind tag for the render list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Obstacle {
        large: bool,
        targeting: bool,
        variant: ObstacleVariant,
    },
    Bonus,
}

/// What a rendering collaborator needs to draw one live entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderEntity {
    pub id: EntityId,
    pub kind: EntityKind,
    pub pos: Vec3,
    pub radius: f32,
}

/// Observable outcomes of phase transitions and ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Stopped,
    ObstacleSpawned { id: EntityId, large: bool, targeting: bool },
    BonusSpawned { id: EntityId },
    ObstaclePassed { id: EntityId, score: u64 },
    BonusCollected { id: EntityId, expires_at_ms: u64 },
    BonusMissed { id: EntityId },
    BonusExpired,
    GameOver { score: u64, best_score: u64, new_record: bool },
}

/// Complete simulation state for one player
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    /// Score, speed, buff and phase
    pub session: Session,
    pub input: InputMapper,
    pub player: PlayerMotion,
    /// Live obstacles (dense, swap-remove)
    pub obstacles: Arena<Obstacle>,
    /// Live bonuses (dense, swap-remove)
    pub bonuses: Arena<Bonus>,
    pub obstacle_spawner: ObstacleSpawner,
    pub bonus_spawner: BonusSpawner,
    /// Background points (not gameplay-affecting)
    pub starfield: Starfield,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl GameState {
    /// Create an idle game state with the default tuning
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Tuning::default())
    }

    /// Create an idle game state with custom tuning, rejecting values that
    /// would break the spawn or speed rules
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(seed, tuning))
    }

    fn build(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bonus_spawner = BonusSpawner::new(&tuning, &mut rng);
        Self {
            seed,
            session: Session::new(&tuning),
            input: InputMapper::default(),
            player: PlayerMotion::default(),
            obstacles: Arena::new(),
            bonuses: Arena::new(),
            obstacle_spawner: ObstacleSpawner::new(&tuning),
            bonus_spawner,
            starfield: Starfield::new(seed),
            time_ticks: 0,
            tuning,
            rng,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.session.phase
    }

    pub fn effective_speed(&self) -> f32 {
        self.session.effective_speed(&self.tuning)
    }

    /// Player position in world space (depth is always 0)
    pub fn player_pos(&self) -> Vec3 {
        self.player.position().extend(0.0)
    }

    /// Idle -> Playing. Ignored in any other phase.
    pub fn start(&mut self, now: std::time::Duration) -> Option<GameEvent> {
        if !self.session.start(&self.tuning) {
            log::debug!("start ignored in {:?}", self.session.phase);
            return None;
        }
        self.begin_run(now);
        Some(GameEvent::Started)
    }

    /// Any phase -> Playing, re-initialized as on start
    pub fn restart(&mut self, now: std::time::Duration) -> GameEvent {
        self.session.restart(&self.tuning);
        self.begin_run(now);
        GameEvent::Started
    }

    /// Playing/GameOver -> Idle. Best score is left untouched.
    pub fn stop(&mut self) -> Option<GameEvent> {
        if !self.session.stop() {
            return None;
        }
        self.clear_run();
        log::info!("Session stopped (score {})", self.session.score);
        Some(GameEvent::Stopped)
    }

    /// Reset everything a fresh run depends on
    fn begin_run(&mut self, now: std::time::Duration) {
        self.clear_run();
        self.player.recenter();
        self.input.release();
        self.obstacle_spawner.arm(now);
        self.bonus_spawner.arm(now);
        log::info!("Run started (seed {}, tick {})", self.seed, self.time_ticks);
    }

    /// Drop all live entities and disarm every timer in one step
    pub(crate) fn clear_run(&mut self) {
        self.obstacles.clear();
        self.bonuses.clear();
        self.obstacle_spawner.reset();
        let Self {
            bonus_spawner,
            tuning,
            rng,
            ..
        } = self;
        bonus_spawner.reset(tuning, rng);
    }

    /// Live entities for a rendering collaborator, obstacles first
    pub fn render_entities(&self) -> impl Iterator<Item = RenderEntity> + '_ {
        let obstacles = self.obstacles.iter().map(|o| RenderEntity {
            id: o.id,
            kind: EntityKind::Obstacle {
                large: o.is_large,
                targeting: o.is_targeting(),
                variant: o.variant,
            },
            pos: o.pos,
            radius: o.radius,
        });
        let bonuses = self.bonuses.iter().map(|b| RenderEntity {
            id: b.id,
            kind: EntityKind::Bonus,
            pos: b.pos,
            radius: BONUS_RADIUS,
        });
        obstacles.chain(bonuses)
    }
}
