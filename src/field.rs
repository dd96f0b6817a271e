use crossbeam_channel::{unbounded, Receiver, Sender};
use macroquad::prelude::*;
use ::rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace, warn};

use crate::config::{self, FieldConfig};
use crate::factory::{Bounds, ParticleFactory};
use crate::particle::{Particle, ParticleView};

/// Reconfiguration requested from outside the tick cadence.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldCommand {
    SetParticleCount(usize),
    SetVelocityRange { min: f32, max: f32 },
    SetFillColor(Color),
}

/// Cloneable handle for reconfiguring a field from any thread.
/// Commands are applied at the start of the field's next tick.
#[derive(Clone, Debug)]
pub struct FieldControls {
    tx: Sender<FieldCommand>,
}

impl FieldControls {
    pub fn set_particle_count(&self, count: usize) {
        self.send(FieldCommand::SetParticleCount(count));
    }

    pub fn set_velocity_range(&self, min: f32, max: f32) {
        self.send(FieldCommand::SetVelocityRange { min, max });
    }

    pub fn set_fill_color(&self, color: Color) {
        self.send(FieldCommand::SetFillColor(color));
    }

    fn send(&self, cmd: FieldCommand) {
        if let Err(e) = self.tx.send(cmd) {
            warn!(command = ?e.into_inner(), "particle field is gone, command dropped");
        }
    }
}

/// Pool of dots drifting toward the center of the drawing surface.
pub struct ParticleField<R: Rng = ChaCha8Rng> {
    particles: Vec<Particle>,
    views: Vec<ParticleView>,
    bounds: Option<Bounds>,
    cfg: FieldConfig,
    fill_color: Color,
    rng: R,
    commands_tx: Sender<FieldCommand>,
    commands_rx: Receiver<FieldCommand>,
    tick_count: u64,
}

impl ParticleField<ChaCha8Rng> {
    pub fn with_seed(cfg: FieldConfig, seed: u64) -> Self {
        Self::with_rng(cfg, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn with_rng(cfg: FieldConfig, rng: R) -> Self {
        let cfg = cfg.sanitized();
        let [r, g, b, a] = cfg.fill_color;
        let (commands_tx, commands_rx) = unbounded();
        Self {
            particles: Vec::with_capacity(cfg.particle_count),
            views: Vec::with_capacity(cfg.particle_count),
            bounds: None,
            fill_color: Color::from_rgba(r, g, b, a),
            cfg,
            rng,
            commands_tx,
            commands_rx,
            tick_count: 0,
        }
    }

    /// Recenter on a new surface size and respawn the whole pool.
    pub fn resize(&mut self, width: f32, height: f32) {
        let bounds = Bounds::new(width, height);
        self.bounds = Some(bounds);

        self.particles.clear();
        for _ in 0..self.cfg.particle_count {
            self.particles
                .push(ParticleFactory::spawn(bounds, &self.cfg, &mut self.rng));
        }
        self.rebuild_views();

        let (min_distance, max_distance) = ParticleFactory::spawn_distance_range(bounds, &self.cfg);
        debug!(
            width = bounds.width,
            height = bounds.height,
            count = self.particles.len(),
            min_distance,
            max_distance,
            "particle field resized"
        );
        if max_distance <= min_distance {
            debug!("field smaller than spawn margin, spawning on the inner ring");
        }
    }

    /// Advance every particle one step and respawn those past the respawn radius.
    pub fn tick(&mut self) {
        self.apply_pending();

        if let Some(bounds) = self.bounds {
            let threshold = self.cfg.respawn_radius;
            let mut respawned = 0usize;
            for p in &mut self.particles {
                p.advance();
                if p.distance <= threshold {
                    ParticleFactory::respawn(p, bounds, &self.cfg, &mut self.rng);
                    respawned += 1;
                }
            }
            trace!(tick = self.tick_count, respawned, "particle field ticked");
        }

        self.rebuild_views();
        self.tick_count += 1;
    }

    /// Grow or shrink the pool, keeping the state of every surviving particle.
    pub fn set_particle_count(&mut self, count: usize) {
        let count = count.min(config::MAX_PARTICLE_COUNT);
        let old = self.particles.len();
        self.cfg.particle_count = count;

        if let Some(bounds) = self.bounds {
            if count < old {
                self.particles.truncate(count);
            } else {
                for _ in old..count {
                    self.particles
                        .push(ParticleFactory::spawn(bounds, &self.cfg, &mut self.rng));
                }
            }
            self.rebuild_views();
        }
        debug!(from = old, to = count, "particle count changed");
    }

    /// Velocity bounds for future spawns. In-flight particles keep their speed.
    pub fn set_velocity_range(&mut self, min: f32, max: f32) {
        let (min, max) = config::velocity_range(min, max);
        self.cfg.min_velocity = min;
        self.cfg.max_velocity = max;
        debug!(min, max, "velocity range changed");
    }

    pub fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    pub fn fill_color(&self) -> Color {
        self.fill_color
    }

    /// Render-ready views as of the last completed tick or resize.
    pub fn snapshot(&self) -> &[ParticleView] {
        &self.views
    }

    pub fn controls(&self) -> FieldControls {
        FieldControls {
            tx: self.commands_tx.clone(),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn center(&self) -> Vec2 {
        self.bounds.map(|b| b.center()).unwrap_or(Vec2::ZERO)
    }

    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    fn apply_pending(&mut self) {
        while let Ok(cmd) = self.commands_rx.try_recv() {
            match cmd {
                FieldCommand::SetParticleCount(n) => self.set_particle_count(n),
                FieldCommand::SetVelocityRange { min, max } => self.set_velocity_range(min, max),
                FieldCommand::SetFillColor(c) => self.set_fill_color(c),
            }
        }
    }

    fn rebuild_views(&mut self) {
        let center = self.center();
        self.views.clear();
        self.views.extend(self.particles.iter().map(|p| p.view(center)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(seed: u64) -> ParticleField {
        ParticleField::with_seed(FieldConfig::default(), seed)
    }

    #[test]
    fn resize_fills_pool_within_spawn_range() {
        let mut f = field(11);
        f.resize(1000.0, 1000.0);
        assert_eq!(f.len(), 30);
        assert_eq!(f.snapshot().len(), 30);
        assert_eq!(f.center(), vec2(500.0, 500.0));

        let (lo, hi) = ParticleFactory::spawn_distance_range(f.bounds().unwrap(), f.config());
        assert_eq!(lo, 230.0);
        assert!((hi - 707.1068).abs() < 1e-3);
        for p in f.particles() {
            assert!(p.distance >= lo && p.distance < hi);
        }
    }

    #[test]
    fn small_field_spawns_on_inner_ring() {
        let mut f = field(12);
        f.resize(300.0, 300.0);
        assert_eq!(f.len(), 30);
        for p in f.particles() {
            assert_eq!(p.distance, 230.0);
        }
    }

    #[test]
    fn resize_twice_keeps_configured_count() {
        let mut f = field(13);
        f.resize(800.0, 600.0);
        f.resize(0.0, -20.0);
        assert_eq!(f.len(), 30);
        assert_eq!(f.bounds().unwrap(), Bounds::new(1.0, 1.0));
    }

    #[test]
    fn tick_before_resize_is_a_no_op() {
        let mut f = field(14);
        f.tick();
        assert!(f.is_empty());
        assert!(f.snapshot().is_empty());
        assert_eq!(f.tick_count(), 1);
    }

    #[test]
    fn particles_stay_outside_respawn_radius_after_tick() {
        let mut f = field(15);
        f.resize(1200.0, 900.0);
        let threshold = f.config().respawn_radius;
        for _ in 0..2000 {
            f.tick();
            for p in f.particles() {
                assert!(p.distance > threshold);
            }
            for v in f.snapshot() {
                assert!(v.radius >= 2.0 && v.radius < 8.0);
            }
        }
    }

    #[test]
    fn fixed_velocity_never_goes_negative() {
        let mut f = field(16);
        f.set_velocity_range(2.0, 2.0);
        f.resize(300.0, 300.0);
        for _ in 0..1000 {
            f.tick();
            for p in f.particles() {
                assert!(p.distance >= 0.0);
                assert_eq!(p.velocity, 2.0);
            }
        }
    }

    #[test]
    fn snapshot_matches_particles() {
        let mut f = field(17);
        f.resize(640.0, 480.0);
        f.tick();
        let center = f.center();
        for (p, v) in f.particles().iter().zip(f.snapshot()) {
            let pos = p.position(center);
            assert_eq!((v.x, v.y, v.radius), (pos.x, pos.y, p.radius));
            assert_eq!(v.alpha, p.alpha.clamp(0.0, 255.0) as u8);
        }
    }

    #[test]
    fn growing_keeps_existing_particles() {
        let mut f = field(18);
        f.resize(1000.0, 1000.0);
        for _ in 0..25 {
            f.tick();
        }
        let before = f.particles().to_vec();

        f.set_particle_count(45);
        assert_eq!(f.len(), 45);
        assert_eq!(f.snapshot().len(), 45);
        assert_eq!(&f.particles()[..30], &before[..]);
        for p in &f.particles()[30..] {
            assert_eq!(p.distance, p.base_distance);
        }
    }

    #[test]
    fn shrinking_keeps_leading_particles() {
        let mut f = field(19);
        f.resize(1000.0, 1000.0);
        f.tick();
        let before = f.particles().to_vec();

        f.set_particle_count(12);
        assert_eq!(f.len(), 12);
        assert_eq!(f.particles(), &before[..12]);

        f.resize(500.0, 500.0);
        assert_eq!(f.len(), 12);
    }

    #[test]
    fn particle_count_is_capped() {
        let cfg = FieldConfig {
            particle_count: usize::MAX,
            ..FieldConfig::default()
        };
        let mut f = ParticleField::with_seed(cfg, 24);
        assert_eq!(f.config().particle_count, config::MAX_PARTICLE_COUNT);

        f.resize(400.0, 400.0);
        f.set_particle_count(usize::MAX);
        assert_eq!(f.len(), config::MAX_PARTICLE_COUNT);

        f.controls().set_particle_count(config::MAX_PARTICLE_COUNT + 1);
        f.tick();
        assert_eq!(f.len(), config::MAX_PARTICLE_COUNT);
        assert_eq!(f.config().particle_count, config::MAX_PARTICLE_COUNT);
    }

    #[test]
    fn velocity_range_only_affects_future_spawns() {
        let mut f = field(20);
        f.resize(1000.0, 1000.0);
        let before: Vec<f32> = f.particles().iter().map(|p| p.velocity).collect();

        f.set_velocity_range(0.0, -4.0);
        assert_eq!((f.config().min_velocity, f.config().max_velocity), (1.0, 1.0));

        f.set_velocity_range(6.0, 9.0);
        let after: Vec<f32> = f.particles().iter().map(|p| p.velocity).collect();
        assert_eq!(before, after);

        f.set_particle_count(40);
        for p in &f.particles()[30..] {
            assert!(p.velocity >= 6.0 && p.velocity < 9.0);
        }
    }

    #[test]
    fn seeded_fields_are_deterministic() {
        let mut a = field(21);
        let mut b = field(21);
        a.resize(900.0, 700.0);
        b.resize(900.0, 700.0);
        for i in 0..500 {
            if i == 100 {
                a.set_particle_count(50);
                b.set_particle_count(50);
            }
            a.tick();
            b.tick();
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn queued_commands_apply_at_next_tick() {
        let mut f = field(22);
        f.resize(1000.0, 1000.0);
        let controls = f.controls();

        let handle = std::thread::spawn(move || {
            controls.set_particle_count(10);
            controls.set_velocity_range(3.0, 1.0);
            controls.set_fill_color(RED);
        });
        handle.join().unwrap();

        assert_eq!(f.len(), 30);
        assert_eq!(f.snapshot().len(), 30);

        f.tick();
        assert_eq!(f.len(), 10);
        assert_eq!(f.snapshot().len(), 10);
        assert_eq!((f.config().min_velocity, f.config().max_velocity), (3.0, 3.0));
        assert_eq!(f.fill_color(), RED);
    }

    #[test]
    fn controls_outliving_field_do_not_panic() {
        let f = field(23);
        let controls = f.controls();
        drop(f);
        controls.set_particle_count(5);
    }
}
