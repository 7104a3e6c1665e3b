//! Randomized spawn timers for obstacles and bonuses
//!
//! Both schedulers are polled from inside the tick at a fixed check cadence,
//! mirroring an interval timer, and compare against the session clock.

use std::time::Duration;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::{Arena, EntityId};
use super::state::{Bonus, Obstacle, ObstacleVariant};
use crate::consts::*;
use crate::tuning::Tuning;

/// Fires at most once per call when a fixed period has elapsed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalPoll {
    period: Duration,
    next_check: Option<Duration>,
}

impl IntervalPoll {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            next_check: None,
        }
    }

    /// First check happens one period after `now`
    pub fn arm(&mut self, now: Duration) {
        self.next_check = Some(now + self.period);
    }

    pub fn reset(&mut self) {
        self.next_check = None;
    }

    /// True when a check is due. Missed checks after a long frame collapse
    /// into one, like a throttled interval timer.
    pub fn due(&mut self, now: Duration) -> bool {
        let Some(next) = self.next_check else {
            self.arm(now);
            return false;
        };
        if now < next {
            return false;
        }
        let following = next + self.period;
        self.next_check = Some(if following > now {
            following
        } else {
            now + self.period
        });
        true
    }
}

/// Uniform planar spawn position in the spawn square
fn spawn_planar(rng: &mut Pcg32) -> Vec2 {
    let x = (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_HALF_EXTENT;
    let y = (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_HALF_EXTENT;
    Vec2::new(x, y)
}

/// Roll a fresh obstacle: size class, model, targeting, position
pub fn roll_obstacle(id: EntityId, rng: &mut Pcg32, player: Vec2, tuning: &Tuning) -> Obstacle {
    let is_large = rng.random::<f32>() < tuning.large_chance;
    let is_targeting = rng.random::<f32>() < tuning.targeting_chance;
    let radius = if is_large {
        LARGE_RADIUS_MIN + rng.random::<f32>() * LARGE_RADIUS_SPAN
    } else {
        NORMAL_RADIUS_MIN + rng.random::<f32>() * NORMAL_RADIUS_SPAN
    };
    let variant = if rng.random::<f32>() < 0.5 {
        ObstacleVariant::Rocky
    } else {
        ObstacleVariant::Cratered
    };
    let planar = spawn_planar(rng);
    let z = if is_large {
        OBSTACLE_SPAWN_Z - LARGE_OBSTACLE_EXTRA_DISTANCE
    } else {
        OBSTACLE_SPAWN_Z
    };

    Obstacle {
        id,
        pos: planar.extend(z),
        radius,
        is_large,
        variant,
        target: is_targeting.then_some(player),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObstacleSpawner {
    poll: IntervalPoll,
    interval: Duration,
    last_spawn: Option<Duration>,
}

impl ObstacleSpawner {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            poll: IntervalPoll::new(tuning.obstacle_check()),
            interval: tuning.obstacle_interval(),
            last_spawn: None,
        }
    }

    /// Anchor the cadence at the start of a run
    pub fn arm(&mut self, now: Duration) {
        self.poll.arm(now);
        self.last_spawn = Some(now);
    }

    pub fn reset(&mut self) {
        self.poll.reset();
        self.last_spawn = None;
    }

    /// Spawn one obstacle if a check is due and the spawn interval has
    /// elapsed. `player` is captured by targeting obstacles.
    pub fn poll(
        &mut self,
        now: Duration,
        player: Vec2,
        tuning: &Tuning,
        rng: &mut Pcg32,
        obstacles: &mut Arena<Obstacle>,
    ) -> Option<EntityId> {
        if !self.poll.due(now) {
            return None;
        }
        let last = *self.last_spawn.get_or_insert(now);
        if now.saturating_sub(last) < self.interval {
            return None;
        }
        self.last_spawn = Some(now);
        let id = obstacles.spawn(|id| roll_obstacle(id, rng, player, tuning));
        log::debug!("Spawned obstacle {id} at {:?}", obstacles.get(id).map(|o| o.pos));
        Some(id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BonusSpawner {
    poll: IntervalPoll,
    last_spawn: Option<Duration>,
    /// Current wait, redrawn after every spawn and every reset
    delay: Duration,
}

impl BonusSpawner {
    pub fn new(tuning: &Tuning, rng: &mut Pcg32) -> Self {
        Self {
            poll: IntervalPoll::new(tuning.bonus_check()),
            last_spawn: None,
            delay: Self::draw_delay(tuning, rng),
        }
    }

    fn draw_delay(tuning: &Tuning, rng: &mut Pcg32) -> Duration {
        Duration::from_millis(rng.random_range(tuning.bonus_delay_min_ms..tuning.bonus_delay_max_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn arm(&mut self, now: Duration) {
        self.poll.arm(now);
        self.last_spawn = Some(now);
    }

    pub fn reset(&mut self, tuning: &Tuning, rng: &mut Pcg32) {
        self.poll.reset();
        self.last_spawn = None;
        self.delay = Self::draw_delay(tuning, rng);
    }

    pub fn poll(
        &mut self,
        now: Duration,
        tuning: &Tuning,
        rng: &mut Pcg32,
        bonuses: &mut Arena<Bonus>,
    ) -> Option<EntityId> {
        if !self.poll.due(now) {
            return None;
        }
        let last = *self.last_spawn.get_or_insert(now);
        if now.saturating_sub(last) < self.delay {
            return None;
        }
        self.last_spawn = Some(now);
        self.delay = Self::draw_delay(tuning, rng);
        let id = bonuses.spawn(|id| Bonus {
            id,
            pos: spawn_planar(rng).extend(BONUS_SPAWN_Z),
            collected: false,
        });
        log::debug!("Spawned bonus {id}, next in {:?}", self.delay);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_interval_poll_cadence() {
        let mut poll = IntervalPoll::new(ms(100));
        poll.arm(ms(0));
        assert!(!poll.due(ms(99)));
        assert!(poll.due(ms(100)));
        assert!(!poll.due(ms(150)));
        assert!(poll.due(ms(205)));
        // Next check stays on the 100ms grid
        assert!(poll.due(ms(300)));
    }

    #[test]
    fn test_interval_poll_collapses_missed_checks() {
        let mut poll = IntervalPoll::new(ms(100));
        poll.arm(ms(0));
        assert!(poll.due(ms(5_000)));
        assert!(!poll.due(ms(5_050)));
        assert!(poll.due(ms(5_100)));
    }

    #[test]
    fn test_unarmed_poll_arms_lazily() {
        let mut poll = IntervalPoll::new(ms(100));
        assert!(!poll.due(ms(1_000)));
        assert!(poll.due(ms(1_100)));
    }

    #[test]
    fn test_obstacle_spawner_respects_interval() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut arena = Arena::new();
        let mut spawner = ObstacleSpawner::new(&tuning);
        spawner.arm(ms(0));

        let mut spawn_times = Vec::new();
        for t in (0..=2_000).step_by(16) {
            if spawner
                .poll(ms(t), Vec2::ZERO, &tuning, &mut rng, &mut arena)
                .is_some()
            {
                spawn_times.push(t);
            }
        }
        assert!(!spawn_times.is_empty());
        assert!(spawn_times[0] >= 640);
        for pair in spawn_times.windows(2) {
            assert!(pair[1] - pair[0] >= 640);
        }
        assert_eq!(arena.len(), spawn_times.len());
    }

    #[test]
    fn test_rolled_obstacles_respect_size_classes() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(42);
        let player = Vec2::new(1.0, -0.5);
        let mut saw_large = false;
        let mut saw_targeting = false;

        for id in 0..2_000 {
            let o = roll_obstacle(id, &mut rng, player, &tuning);
            if o.is_large {
                saw_large = true;
                assert!((0.8..1.2).contains(&o.radius));
                assert_eq!(o.pos.z, -130.0);
            } else {
                assert!((0.2..1.0).contains(&o.radius));
                assert_eq!(o.pos.z, -100.0);
            }
            if let Some(target) = o.target {
                saw_targeting = true;
                assert_eq!(target, player);
            }
            assert!(o.pos.x.abs() <= 3.5 && o.pos.y.abs() <= 3.5);
        }
        assert!(saw_large);
        assert!(saw_targeting);
    }

    #[test]
    fn test_zero_chances_give_plain_obstacles() {
        let tuning = Tuning {
            large_chance: 0.0,
            targeting_chance: 0.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        for id in 0..200 {
            let o = roll_obstacle(id, &mut rng, Vec2::ZERO, &tuning);
            assert!(!o.is_large);
            assert!(!o.is_targeting());
        }
    }

    #[test]
    fn test_bonus_spawner_waits_for_drawn_delay() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut arena = Arena::new();
        let mut spawner = BonusSpawner::new(&tuning, &mut rng);
        let delay = spawner.delay();
        assert!(delay >= ms(10_000) && delay < ms(20_000));

        spawner.arm(ms(0));
        let mut first = None;
        for t in (0..=25_000).step_by(50) {
            if spawner.poll(ms(t), &tuning, &mut rng, &mut arena).is_some() {
                first = Some(t);
                break;
            }
        }
        let first = ms(first.expect("bonus should spawn within 25s"));
        assert!(first >= delay);
        assert!(first < delay + ms(1_050));

        let bonus = arena.iter().next().unwrap();
        assert_eq!(bonus.pos.z, BONUS_SPAWN_Z);
        assert!(!bonus.collected);
    }

    #[test]
    fn test_bonus_reset_redraws_delay() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let mut spawner = BonusSpawner::new(&tuning, &mut rng);
        let mut delays = vec![spawner.delay()];
        for _ in 0..8 {
            spawner.reset(&tuning, &mut rng);
            delays.push(spawner.delay());
        }
        delays.dedup();
        assert!(delays.len() > 1);
    }
}
