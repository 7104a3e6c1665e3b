//! Collision, pickup and pass-through detection
//!
//! Tests are split into a planar (x, y) distance check and a separate depth
//! window, both strict.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, EntityId};
use super::state::{Bonus, Obstacle};
use crate::consts::*;

/// Outcome of one entity's contact test this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Contact {
    /// Obstacle touched the player (ends the run)
    Hit(EntityId),
    /// Obstacle crossed the despawn depth (scores)
    Passed(EntityId),
    /// Bonus reached the player (starts the buff)
    Pickup(EntityId),
    /// Bonus crossed the despawn depth uncollected
    BonusMissed(EntityId),
}

/// Euclidean distance in the plane perpendicular to travel
#[inline]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.truncate().distance(b.truncate())
}

/// Obstacle-vs-player test: `planar < 0.32 + radius` and `|dz| < 0.6`
#[inline]
pub fn obstacle_hits_player(obstacle_pos: Vec3, obstacle_radius: f32, player: Vec3) -> bool {
    planar_distance(obstacle_pos, player) < PLAYER_HIT_RADIUS + obstacle_radius
        && (obstacle_pos.z - player.z).abs() < OBSTACLE_HIT_DEPTH
}

/// Bonus-vs-player test: `planar < 0.5 + 1.2` and `|dz| < 1.5`
#[inline]
pub fn bonus_reaches_player(bonus_pos: Vec3, player: Vec3) -> bool {
    planar_distance(bonus_pos, player) < PLAYER_PICKUP_RADIUS + BONUS_RADIUS
        && (bonus_pos.z - player.z).abs() < BONUS_PICKUP_DEPTH
}

/// Entities past this depth are gone
#[inline]
pub fn past_despawn(pos: Vec3) -> bool {
    pos.z > DESPAWN_Z
}

/// Test every live entity against the player, removing the ones that hit,
/// got picked up or flew past, and report what happened to each.
///
/// Obstacles are tested before bonuses. A colliding obstacle never also
/// counts as passed.
pub fn detect_contacts(
    obstacles: &mut Arena<Obstacle>,
    bonuses: &mut Arena<Bonus>,
    player: Vec3,
    contacts: &mut Vec<Contact>,
) {
    obstacles.sweep(
        |o| obstacle_hits_player(o.pos, o.radius, player) || past_despawn(o.pos),
        |o| {
            if obstacle_hits_player(o.pos, o.radius, player) {
                contacts.push(Contact::Hit(o.id));
            } else {
                contacts.push(Contact::Passed(o.id));
            }
        },
    );

    bonuses.sweep(
        |b| {
            if bonus_reaches_player(b.pos, player) {
                b.collected = true;
                return true;
            }
            past_despawn(b.pos)
        },
        |b| {
            if b.collected {
                contacts.push(Contact::Pickup(b.id));
            } else {
                contacts.push(Contact::BonusMissed(b.id));
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::ObstacleVariant;

    fn obstacle(arena: &mut Arena<Obstacle>, pos: Vec3, radius: f32) -> EntityId {
        arena.spawn(|id| Obstacle {
            id,
            pos,
            radius,
            is_large: false,
            variant: ObstacleVariant::Rocky,
            target: None,
        })
    }

    fn bonus(arena: &mut Arena<Bonus>, pos: Vec3) -> EntityId {
        arena.spawn(|id| Bonus {
            id,
            pos,
            collected: false,
        })
    }

    #[test]
    fn test_collision_boundary_is_strict() {
        let player = Vec3::ZERO;
        // 0.32 + 0.3 = 0.62 exactly: no collision
        assert!(!obstacle_hits_player(Vec3::new(0.62, 0.0, 0.5), 0.3, player));
        assert!(obstacle_hits_player(Vec3::new(0.619, 0.0, 0.5), 0.3, player));
    }

    #[test]
    fn test_collision_needs_depth_overlap() {
        let player = Vec3::ZERO;
        assert!(!obstacle_hits_player(Vec3::new(0.0, 0.0, -0.6), 0.3, player));
        assert!(obstacle_hits_player(Vec3::new(0.0, 0.0, -0.59), 0.3, player));
        assert!(!obstacle_hits_player(Vec3::new(0.0, 0.0, 2.0), 1.0, player));
    }

    #[test]
    fn test_pickup_window() {
        let player = Vec3::new(1.0, 1.0, 0.0);
        assert!(bonus_reaches_player(Vec3::new(2.6, 1.0, 1.4), player));
        assert!(!bonus_reaches_player(Vec3::new(2.8, 1.0, 0.0), player));
        assert!(!bonus_reaches_player(Vec3::new(1.0, 1.0, -1.5), player));
    }

    #[test]
    fn test_pickup_boundary_is_strict() {
        let player = Vec3::ZERO;
        // 0.5 + 1.2 = 1.7 exactly: no pickup
        assert!(!bonus_reaches_player(Vec3::new(1.7, 0.0, 0.0), player));
        assert!(bonus_reaches_player(Vec3::new(1.699, 0.0, 0.0), player));
        assert!(!bonus_reaches_player(Vec3::new(0.0, -1.7, 1.0), player));
    }

    #[test]
    fn test_detect_removes_and_reports() {
        let mut obstacles = Arena::new();
        let mut bonuses = Arena::new();
        let hit = obstacle(&mut obstacles, Vec3::new(0.1, 0.0, 0.2), 0.5);
        let passed = obstacle(&mut obstacles, Vec3::new(3.0, 3.0, 5.5), 0.5);
        let alive = obstacle(&mut obstacles, Vec3::new(0.0, 0.0, -40.0), 0.5);
        let picked = bonus(&mut bonuses, Vec3::new(0.5, 0.5, 0.0));
        let missed = bonus(&mut bonuses, Vec3::new(3.0, -3.0, 6.0));

        let mut contacts = Vec::new();
        detect_contacts(&mut obstacles, &mut bonuses, Vec3::ZERO, &mut contacts);

        assert!(contacts.contains(&Contact::Hit(hit)));
        assert!(contacts.contains(&Contact::Passed(passed)));
        assert!(contacts.contains(&Contact::Pickup(picked)));
        assert!(contacts.contains(&Contact::BonusMissed(missed)));
        assert_eq!(contacts.len(), 4);

        assert_eq!(obstacles.len(), 1);
        assert_eq!(obstacles.iter().next().unwrap().id, alive);
        assert!(bonuses.is_empty());
    }

    #[test]
    fn test_despawn_threshold_is_exclusive() {
        let mut obstacles = Arena::new();
        let mut bonuses = Arena::new();
        obstacle(&mut obstacles, Vec3::new(3.0, 3.0, 5.0), 0.2);
        let mut contacts = Vec::new();
        detect_contacts(&mut obstacles, &mut bonuses, Vec3::ZERO, &mut contacts);
        assert!(contacts.is_empty());
        assert_eq!(obstacles.len(), 1);
    }

    #[test]
    fn test_simultaneous_hits_all_reported() {
        let mut obstacles = Arena::new();
        let mut bonuses = Arena::new();
        obstacle(&mut obstacles, Vec3::new(0.0, 0.1, 0.0), 0.4);
        obstacle(&mut obstacles, Vec3::new(0.1, 0.0, 0.1), 0.4);
        let mut contacts = Vec::new();
        detect_contacts(&mut obstacles, &mut bonuses, Vec3::ZERO, &mut contacts);
        assert_eq!(
            contacts.iter().filter(|c| matches!(c, Contact::Hit(_))).count(),
            2
        );
    }
}
