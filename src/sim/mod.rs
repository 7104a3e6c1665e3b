//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in from the caller, never from the wall clock
//! - Seeded RNG only
//! - Stable iteration order (spawn order, swap-remove on despawn)
//! - No rendering or platform dependencies

pub mod advance;
pub mod arena;
pub mod autopilot;
pub mod collision;
pub mod input;
pub mod player;
pub mod session;
pub mod spawn;
pub mod starfield;
pub mod state;
pub mod tick;

pub use arena::{Arena, EntityId, Keyed};
pub use collision::{Contact, bonus_reaches_player, detect_contacts, obstacle_hits_player};
pub use input::InputMapper;
pub use player::PlayerMotion;
pub use session::{GameOverSummary, Session, SpeedBonus};
pub use spawn::{BonusSpawner, IntervalPoll, ObstacleSpawner};
pub use starfield::Starfield;
pub use state::{
    Bonus, EntityKind, GameEvent, GamePhase, GameState, Obstacle, ObstacleVariant, RenderEntity,
};
pub use tick::tick;
