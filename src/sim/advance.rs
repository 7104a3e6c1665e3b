//! Per-tick entity advancement along the depth axis
//!
//! Speeds are tuned per frame at 60 fps, so every step is scaled by
//! `dt * BASELINE_FPS` to stay frame-rate independent.

use super::arena::Arena;
use super::state::{Bonus, Obstacle};
use crate::consts::*;
use crate::tuning::Tuning;

/// Move obstacles at the effective (buffed) speed; targeting ones also
/// drift toward their locked point
pub fn advance_obstacles(obstacles: &mut Arena<Obstacle>, effective_speed: f32, tuning: &Tuning, dt: f32) {
    let frames = dt * BASELINE_FPS;
    let depth_step = effective_speed * tuning.obstacle_speed_multiplier * frames;
    let pull = (TARGETING_PULL * frames).min(1.0);
    for obstacle in obstacles.iter_mut() {
        obstacle.advance(depth_step, pull);
    }
}

/// Move bonuses at the base speed; the buff never speeds them up
pub fn advance_bonuses(bonuses: &mut Arena<Bonus>, base_speed: f32, tuning: &Tuning, dt: f32) {
    let depth_step = base_speed * tuning.bonus_speed_multiplier * dt * BASELINE_FPS;
    for bonus in bonuses.iter_mut() {
        bonus.pos.z += depth_step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleVariant;
    use glam::{Vec2, Vec3};

    fn obstacle_at(arena: &mut Arena<Obstacle>, pos: Vec3, target: Option<Vec2>) {
        arena.spawn(|id| Obstacle {
            id,
            pos,
            radius: 0.5,
            is_large: false,
            variant: ObstacleVariant::Rocky,
            target,
        });
    }

    #[test]
    fn test_obstacle_depth_step_at_baseline() {
        let tuning = Tuning::default();
        let mut arena = Arena::new();
        obstacle_at(&mut arena, Vec3::new(0.0, 0.0, -100.0), None);

        advance_obstacles(&mut arena, 0.39, &tuning, 1.0 / 60.0);
        let z = arena.iter().next().unwrap().pos.z;
        assert!((z - (-100.0 + 0.39 * 1.5)).abs() < 1e-4);
    }

    #[test]
    fn test_distance_is_frame_rate_independent() {
        let tuning = Tuning::default();
        let mut fast = Arena::new();
        let mut slow = Arena::new();
        obstacle_at(&mut fast, Vec3::new(0.0, 0.0, -100.0), None);
        obstacle_at(&mut slow, Vec3::new(0.0, 0.0, -100.0), None);

        for _ in 0..120 {
            advance_obstacles(&mut fast, 0.5, &tuning, 1.0 / 120.0);
        }
        for _ in 0..30 {
            advance_obstacles(&mut slow, 0.5, &tuning, 1.0 / 30.0);
        }
        let a = fast.iter().next().unwrap().pos.z;
        let b = slow.iter().next().unwrap().pos.z;
        assert!((a - b).abs() < 1e-2);
    }

    #[test]
    fn test_targeting_drift_never_overshoots() {
        let tuning = Tuning::default();
        let mut arena = Arena::new();
        obstacle_at(&mut arena, Vec3::new(3.0, 3.0, -100.0), Some(Vec2::new(-1.0, 0.5)));

        // One absurdly long frame closes the gap exactly
        advance_obstacles(&mut arena, 0.39, &tuning, 5.0);
        let o = arena.iter().next().unwrap();
        assert!((o.pos.x + 1.0).abs() < 1e-6);
        assert!((o.pos.y - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_bonuses_ignore_buff() {
        let tuning = Tuning::default();
        let mut bonuses = Arena::new();
        bonuses.spawn(|id| Bonus {
            id,
            pos: Vec3::new(0.0, 0.0, -70.0),
            collected: false,
        });
        advance_bonuses(&mut bonuses, 0.39, &tuning, 1.0 / 60.0);
        let z = bonuses.iter().next().unwrap().pos.z;
        assert!((z - (-70.0 + 0.39 * 1.5)).abs() < 1e-4);
    }

    #[test]
    fn test_zero_dt_moves_nothing() {
        let tuning = Tuning::default();
        let mut arena = Arena::new();
        obstacle_at(&mut arena, Vec3::new(1.0, 1.0, -50.0), Some(Vec2::ZERO));
        advance_obstacles(&mut arena, 0.78, &tuning, 0.0);
        assert_eq!(arena.iter().next().unwrap().pos, Vec3::new(1.0, 1.0, -50.0));
    }
}
