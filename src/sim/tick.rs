//! Per-frame simulation tick
//!
//! Order within one tick:
//! 1. Player consumes the parked input intent and eases (every phase)
//! 2. Buff expiry check
//! 3. Spawn polls (obstacles, then bonuses)
//! 4. Advance entities
//! 5. Contact detection, fed into the session state machine
//! 6. Starfield

use std::time::Duration;

use super::advance::{advance_bonuses, advance_obstacles};
use super::collision::{Contact, detect_contacts};
use super::state::{GameEvent, GamePhase, GameState};
use crate::sanitize_dt;

/// Advance the game state by one frame of `dt` seconds at session time `now`.
///
/// Returns the events produced this tick, in the order they happened.
pub fn tick(state: &mut GameState, now: Duration, dt: f32) -> Vec<GameEvent> {
    let raw_dt = dt;
    let dt = sanitize_dt(dt);
    if dt != raw_dt {
        log::debug!("Ignoring invalid frame delta {raw_dt}");
    }

    state.time_ticks += 1;
    let intent = state.input.take_intent();
    state.player.step(intent, dt);

    let mut events = Vec::new();
    if state.phase() != GamePhase::Playing {
        return events;
    }

    if state.session.expire_bonus(now) {
        log::debug!("Speed bonus expired");
        events.push(GameEvent::BonusExpired);
    }

    let GameState {
        tuning,
        session,
        player,
        obstacles,
        bonuses,
        obstacle_spawner,
        bonus_spawner,
        starfield,
        rng,
        ..
    } = &mut *state;

    if let Some(id) = obstacle_spawner.poll(now, player.position(), tuning, rng, obstacles) {
        let (large, targeting) = obstacles
            .get(id)
            .map(|o| (o.is_large, o.is_targeting()))
            .unwrap_or_default();
        events.push(GameEvent::ObstacleSpawned {
            id,
            large,
            targeting,
        });
    }
    if let Some(id) = bonus_spawner.poll(now, tuning, rng, bonuses) {
        events.push(GameEvent::BonusSpawned { id });
    }

    advance_obstacles(obstacles, session.effective_speed(tuning), tuning, dt);
    advance_bonuses(bonuses, session.base_speed, tuning, dt);

    let mut contacts = Vec::new();
    detect_contacts(obstacles, bonuses, player.position().extend(0.0), &mut contacts);

    for contact in contacts {
        match contact {
            Contact::Hit(id) => {
                if let Some(summary) = session.collide() {
                    log::info!(
                        "Hit obstacle {id}: game over at {} (best {})",
                        summary.score,
                        summary.best_score
                    );
                    events.push(GameEvent::GameOver {
                        score: summary.score,
                        best_score: summary.best_score,
                        new_record: summary.new_record,
                    });
                }
            }
            Contact::Passed(id) => {
                if let Some(score) = session.obstacle_passed(tuning) {
                    log::debug!("Obstacle {id} passed, score {score}");
                    events.push(GameEvent::ObstaclePassed { id, score });
                }
            }
            Contact::Pickup(id) => {
                if let Some(expires_at) = session.bonus_collected(now, tuning) {
                    log::debug!("Bonus {id} collected, buff until {expires_at:?}");
                    events.push(GameEvent::BonusCollected {
                        id,
                        expires_at_ms: expires_at.as_millis() as u64,
                    });
                }
            }
            Contact::BonusMissed(id) => {
                if session.is_playing() {
                    events.push(GameEvent::BonusMissed { id });
                }
            }
        }
    }

    if session.is_playing() {
        starfield.advance(session.effective_speed(tuning), dt);
    } else {
        // The run ended this tick: nothing from it may leak into the next one
        state.clear_run();
    }

    events
}
