//! Demo/idle steering
//!
//! Produces raw input deltas the same way a finger would, so the autopilot
//! goes through the normal smoothing and motion path.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use crate::consts::*;

/// Obstacles between these depths are considered for evasion
const THREAT_FAR_Z: f32 = -35.0;
const THREAT_NEAR_Z: f32 = 1.0;
/// Extra planar clearance the autopilot tries to keep
const THREAT_MARGIN: f32 = 0.6;
/// Raw delta magnitude per frame (the input clamp)
const STEER_GAIN: f32 = INPUT_MAX_DELTA;
/// Distance from the wall at which the autopilot stops pushing outward
const WALL_SLACK: f32 = 0.05;

/// Raw input delta for this frame
pub fn steer(state: &GameState) -> Vec2 {
    if state.phase() != GamePhase::Playing {
        return Vec2::ZERO;
    }
    let player = state.player.target();

    // Most urgent threat: nearest in depth among those on a collision line
    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.pos.z > THREAT_FAR_Z && o.pos.z < THREAT_NEAR_Z)
        .filter_map(|o| {
            // Targeting obstacles end up at their lock point
            let aim = o.target.unwrap_or_else(|| o.pos.truncate());
            let clearance = o.radius + PLAYER_HIT_RADIUS + THREAT_MARGIN;
            (aim.distance(player) < clearance).then_some((o.pos.z, aim))
        })
        .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    if let Some((_, aim)) = threat {
        return evade(player, aim) * STEER_GAIN;
    }

    // Safe: go grab the nearest bonus that is still ahead
    let bonus = state
        .bonuses
        .iter()
        .filter(|b| b.pos.z < 0.0)
        .map(|b| b.pos.truncate())
        .min_by(|a, b| {
            a.distance_squared(player)
                .partial_cmp(&b.distance_squared(player))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(bonus) = bonus {
        let to_bonus = bonus - player;
        if to_bonus.length() > WALL_SLACK {
            return to_bonus.clamp_length_max(STEER_GAIN);
        }
        return Vec2::ZERO;
    }

    // Nothing to do: drift back toward the centre
    if player.length() > 0.2 {
        return -player.normalize() * STEER_GAIN * 0.5;
    }
    Vec2::ZERO
}

/// Unit direction away from `aim`, never pushing into a wall we are pinned to
fn evade(player: Vec2, aim: Vec2) -> Vec2 {
    let mut away = player - aim;
    if away.length_squared() < 1e-6 {
        // Dead centre hit: break toward open space
        away = if player.x > 0.0 { Vec2::NEG_X } else { Vec2::X };
    }
    let mut dir = away.normalize();
    for axis in 0..2 {
        let pinned = player[axis].abs() >= PLAYER_MAX_POS - WALL_SLACK;
        if pinned && dir[axis] * player[axis] > 0.0 {
            dir[axis] = 0.0;
        }
    }
    if dir.length_squared() < 1e-6 {
        let side = away.perp();
        dir = if side.dot(-player) >= 0.0 { side } else { -side };
    }
    dir.normalize_or_zero()
}
