use std::path::Path;

use clap::Parser;
use macroquad::prelude::*;
use tracing::{info, trace, warn};
use tracing_subscriber::{fmt, EnvFilter};

use adsorb::{renderer, AnimationClock, FieldConfig, ParticleField};

mod args;

use args::ProgramArgs;

fn window_conf() -> Conf {
    Conf {
        window_title: "Adsorb".to_string(),
        window_width: 720,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn load_config(path: Option<&Path>) -> FieldConfig {
    let Some(path) = path else {
        return FieldConfig::default();
    };
    match FieldConfig::load(path) {
        Ok(cfg) => {
            info!(path = %path.display(), "Loaded config");
            cfg
        }
        Err(e) => {
            warn!(error = %e, "Falling back to default config");
            FieldConfig::default()
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,adsorb=debug"));
    fmt().with_env_filter(filter).with_target(true).init();

    let args = ProgramArgs::parse();
    let cfg = load_config(args.config.as_deref());
    let seed = args.seed;
    info!(seed, count = cfg.particle_count, "Starting particle field");

    let mut clock = AnimationClock::from_config(&cfg);
    let mut field = ParticleField::with_seed(cfg, seed);
    let mut size = (0.0f32, 0.0f32);
    let mut cycles = 0u64;

    loop {
        let current = (screen_width(), screen_height());
        if current != size {
            size = current;
            field.resize(size.0, size.1);
            clock.restart();
            cycles = 0;
        }

        for _ in 0..clock.advance(get_frame_time()) {
            field.tick();
        }
        if clock.cycles() != cycles {
            cycles = clock.cycles();
            trace!(
                cycles,
                value = clock.value(),
                ticks = field.tick_count(),
                "animation cycle completed"
            );
        }

        renderer::draw(&field);

        next_frame().await;
    }
}
