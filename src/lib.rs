//! Radial particle field: dots drift toward the center, fade out and respawn
//! on an outer ring.

pub mod clock;
pub mod config;
pub mod factory;
pub mod field;
pub mod particle;
pub mod renderer;

pub use clock::AnimationClock;
pub use config::{ConfigError, FieldConfig};
pub use factory::{Bounds, ParticleFactory};
pub use field::{FieldCommand, FieldControls, ParticleField};
pub use particle::{Particle, ParticleView};
