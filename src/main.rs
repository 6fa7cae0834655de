/*
 * Artificial Life Simulations
 *
 * Opens one window hosting three interchangeable simulations:
 * 1. Boids: flocking from separation, alignment and cohesion
 * 2. Particle Life: colored clusters attracting and repelling by rule
 * 3. Particles KNN: wanderers linked to their nearest neighbors
 *
 * Press 1, 2 or 3 to switch, Space to pause, R to regenerate. Parameters
 * are adjusted live from the control panels. Set RUST_LOG to change the
 * log level (default: info).
 */

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use alife::app;
use alife::config::{AppConfig, Cli};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::try_from(Cli::parse()).context("invalid command line options")?;
    tracing::info!(?config, "starting");
    app::install_config(config);

    nannou::app(app::model)
        .update(app::update)
        .exit(app::exit)
        .run();

    Ok(())
}
