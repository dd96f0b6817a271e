use std::path::PathBuf;

use clap::Parser;

/// Radial particle field viewer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct ProgramArgs {
    /// JSON field config; defaults are used when omitted
    #[arg(env = "ADSORB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Seed for the particle random source
    #[arg(long, env = "ADSORB_SEED", default_value_t = 42)]
    pub seed: u64,
}
