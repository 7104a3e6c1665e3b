//! Background starfield
//!
//! Purely visual: stars stream toward the camera at a multiple of the
//! effective speed and are recycled to the far field once behind it. Uses its
//! own RNG stream so it never perturbs gameplay rolls.

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Stream selector mixed into the seed for star placement
const STAR_STREAM: u64 = 0x5747_4152;

#[derive(Debug, Clone)]
pub struct Starfield {
    stars: Vec<Vec3>,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::new(seed, STAR_STREAM);
        let stars = (0..STAR_COUNT).map(|_| far_star(&mut rng)).collect();
        Self { stars, rng }
    }

    pub fn stars(&self) -> &[Vec3] {
        &self.stars
    }

    /// Stream stars forward; returns how many were recycled
    pub fn advance(&mut self, effective_speed: f32, dt: f32) -> usize {
        let step = effective_speed * STAR_SPEED_MULTIPLIER * dt * BASELINE_FPS;
        let mut recycled = 0;
        for star in &mut self.stars {
            star.z += step;
            if star.z > DESPAWN_Z {
                *star = far_star(&mut self.rng);
                recycled += 1;
            }
        }
        recycled
    }
}

fn far_star(rng: &mut Pcg32) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() - 0.5) * 2.0 * STAR_HALF_SPREAD,
        (rng.random::<f32>() - 0.5) * 2.0 * STAR_HALF_SPREAD,
        STAR_NEAR_Z - rng.random::<f32>() * STAR_DEPTH_SPAN,
    )
}
