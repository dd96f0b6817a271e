use macroquad::prelude::*;
use ::rand::Rng;

use crate::config::FieldConfig;
use crate::particle::Particle;

/// Drawing surface size. Both sides are at least one unit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: clamp_side(width),
            height: clamp_side(height),
        }
    }

    pub fn center(&self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }

    pub fn max_side(&self) -> f32 {
        self.width.max(self.height)
    }
}

fn clamp_side(v: f32) -> f32 {
    if v.is_finite() {
        v.max(1.0)
    } else {
        1.0
    }
}

/// Randomized parameters for fresh and respawned particles.
pub struct ParticleFactory;

impl ParticleFactory {
    /// Farthest spawn distance: the half diagonal of a square of the longer side.
    pub fn max_spawn_distance(bounds: Bounds) -> f32 {
        std::f32::consts::SQRT_2 * bounds.max_side() * 0.5
    }

    /// Spawn distance range, collapsed to `min..=min` when the field is too
    /// small for the configured margin.
    pub fn spawn_distance_range(bounds: Bounds, cfg: &FieldConfig) -> (f32, f32) {
        let min = cfg.min_spawn_distance();
        let max = Self::max_spawn_distance(bounds);
        (min, max.max(min))
    }

    pub fn spawn<R: Rng>(bounds: Bounds, cfg: &FieldConfig, rng: &mut R) -> Particle {
        let (min_distance, max_distance) = Self::spawn_distance_range(bounds, cfg);
        let distance = sample(rng, min_distance, max_distance);
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        let velocity = sample(rng, cfg.min_velocity, cfg.max_velocity).max(f32::EPSILON);
        let radius = sample(rng, cfg.min_radius, cfg.max_radius);
        let alpha = sample(rng, cfg.min_alpha, cfg.max_alpha);

        Particle {
            angle,
            distance,
            base_distance: distance,
            velocity,
            radius,
            alpha,
            base_alpha: alpha,
        }
    }

    /// Reassign every parameter of an existing slot.
    pub fn respawn<R: Rng>(
        particle: &mut Particle,
        bounds: Bounds,
        cfg: &FieldConfig,
        rng: &mut R,
    ) {
        *particle = Self::spawn(bounds, cfg, rng);
    }
}

/// Uniform draw from `[min, max)`, or `min` when the range is empty.
fn sample<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}
