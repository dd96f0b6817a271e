// All tunable field constants in one place.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Pool
pub const PARTICLE_COUNT: usize = 30;
pub const MAX_PARTICLE_COUNT: usize = 10_000;

// Motion (units per tick)
pub const MIN_VELOCITY: f32 = 1.0;
pub const MAX_VELOCITY: f32 = 2.0;

// Appearance
pub const MIN_RADIUS: f32 = 2.0;
pub const MAX_RADIUS: f32 = 8.0;
pub const MIN_ALPHA: f32 = 100.0;
pub const MAX_ALPHA: f32 = 255.0;
pub const FILL_COLOR: [u8; 4] = [255, 255, 255, 255];

// Geometry
pub const INNER_RADIUS: f32 = 200.0;
pub const BORN_MARGIN: f32 = 30.0;
/// Particles at or inside this distance from the center are respawned.
pub const RESPAWN_RADIUS: f32 = 100.0;

// Clock
pub const CYCLE_DURATION: u32 = 1000;
pub const FRAME_DT: f32 = 1.0 / 60.0;
pub const MIN_FRAME_DT: f32 = 1.0 / 1000.0;
pub const MAX_FRAME_TIME: f32 = 0.1;
/// Upper bound on ticks produced by a single clock advance.
pub const MAX_TICKS_PER_ADVANCE: u32 = 120;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Runtime configuration of a particle field and its clock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    pub min_velocity: f32,
    pub max_velocity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_alpha: f32,
    pub max_alpha: f32,
    pub inner_radius: f32,
    pub born_margin: f32,
    pub respawn_radius: f32,
    pub fill_color: [u8; 4],
    pub cycle_duration: u32,
    pub frame_dt: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            min_velocity: MIN_VELOCITY,
            max_velocity: MAX_VELOCITY,
            min_radius: MIN_RADIUS,
            max_radius: MAX_RADIUS,
            min_alpha: MIN_ALPHA,
            max_alpha: MAX_ALPHA,
            inner_radius: INNER_RADIUS,
            born_margin: BORN_MARGIN,
            respawn_radius: RESPAWN_RADIUS,
            fill_color: FILL_COLOR,
            cycle_duration: CYCLE_DURATION,
            frame_dt: FRAME_DT,
        }
    }
}

impl FieldConfig {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let cfg: Self = serde_json::from_str(text)?;
        Ok(cfg.sanitized())
    }

    /// Clamp every range into something the factory can sample from.
    /// Invalid values are corrected, never rejected.
    pub fn sanitized(mut self) -> Self {
        self.particle_count = self.particle_count.min(MAX_PARTICLE_COUNT);
        (self.min_velocity, self.max_velocity) =
            velocity_range(self.min_velocity, self.max_velocity);
        (self.min_radius, self.max_radius) = ordered(self.min_radius.max(0.0), self.max_radius);
        (self.min_alpha, self.max_alpha) =
            ordered(self.min_alpha.clamp(0.0, 255.0), self.max_alpha.clamp(0.0, 255.0));
        self.inner_radius = finite_or(self.inner_radius, INNER_RADIUS).max(0.0);
        self.born_margin = finite_or(self.born_margin, BORN_MARGIN).max(0.0);
        // A respawned particle must land outside the respawn radius.
        self.respawn_radius = finite_or(self.respawn_radius, RESPAWN_RADIUS)
            .clamp(0.0, self.min_spawn_distance());
        self.cycle_duration = self.cycle_duration.max(1);
        self.frame_dt = frame_dt(self.frame_dt);
        self
    }

    /// Closest distance to the center a particle can be spawned at.
    pub fn min_spawn_distance(&self) -> f32 {
        self.inner_radius + self.born_margin
    }
}

/// Tick interval in seconds, never below `MIN_FRAME_DT`.
pub fn frame_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > 0.0 {
        dt.max(MIN_FRAME_DT)
    } else {
        FRAME_DT
    }
}

/// Velocity bounds with `min >= 1` and `max >= min`.
pub fn velocity_range(min: f32, max: f32) -> (f32, f32) {
    let min = if min.is_finite() { min.max(1.0) } else { MIN_VELOCITY };
    let max = if max.is_finite() { max.max(min) } else { min };
    (min, max)
}

fn ordered(min: f32, max: f32) -> (f32, f32) {
    let min = finite_or(min, 0.0);
    (min, finite_or(max, min).max(min))
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
