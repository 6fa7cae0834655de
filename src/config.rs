//! Command line options and the validated startup configuration.

use clap::{Parser, ValueEnum};

use crate::error::ConfigError;
use crate::time::MAX_DELTA_TIME;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    Flocking,
    ParticleLife,
    Proximity,
}

impl SceneKind {
    pub const ALL: [SceneKind; 3] = [Self::Flocking, Self::ParticleLife, Self::Proximity];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Flocking => "Boids",
            Self::ParticleLife => "Particle Life",
            Self::Proximity => "Particles KNN",
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "alife")]
#[command(about = "Emergent behavior simulations: boids, particle life and proximity graphs", long_about = None)]
pub struct Cli {
    /// Simulation shown at startup
    #[arg(short, long, value_enum, default_value_t = SceneKind::ParticleLife)]
    pub scene: SceneKind,

    /// Window width in pixels
    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    /// Window height in pixels
    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    /// Seed for every random source; drawn from entropy when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial number of boids
    #[arg(long, default_value_t = 200)]
    pub boids: usize,

    /// Initial number of wandering agents
    #[arg(long, default_value_t = 100)]
    pub wanderers: usize,

    /// Largest time step handed to a simulation, in seconds
    #[arg(long, default_value_t = MAX_DELTA_TIME)]
    pub max_step: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub title: String,
    pub scene: SceneKind,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub boid_count: usize,
    pub wanderer_count: usize,
    pub max_step: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "ArtificialLife".to_string(),
            scene: SceneKind::ParticleLife,
            width: 1920,
            height: 1080,
            seed: 0,
            boid_count: 200,
            wanderer_count: 100,
            max_step: MAX_DELTA_TIME,
        }
    }
}

impl TryFrom<Cli> for AppConfig {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        if cli.width == 0 || cli.height == 0 {
            return Err(ConfigError::InvalidWindowSize {
                width: cli.width,
                height: cli.height,
            });
        }
        if cli.boids == 0 {
            return Err(ConfigError::EmptyPopulation { what: "boid" });
        }
        if cli.wanderers == 0 {
            return Err(ConfigError::EmptyPopulation { what: "wanderer" });
        }
        if !(cli.max_step > 0.0) {
            return Err(ConfigError::InvalidMaxStep(cli.max_step));
        }

        Ok(Self {
            title: format!("ArtificialLife - {}", cli.scene.label()),
            scene: cli.scene,
            width: cli.width,
            height: cli.height,
            seed: cli.seed.unwrap_or_else(rand::random),
            boid_count: cli.boids,
            wanderer_count: cli.wanderers,
            max_step: cli.max_step,
        })
    }
}

impl AppConfig {
    /// Seed for one scene, derived from the global seed.
    pub fn scene_seed(&self, scene: SceneKind) -> u64 {
        let salt = match scene {
            SceneKind::Flocking => 0x9E37_79B9_7F4A_7C15,
            SceneKind::ParticleLife => 0xC2B2_AE3D_27D4_EB4F,
            SceneKind::Proximity => 0x1656_67B1_9E37_79F9,
        };
        self.seed ^ salt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("alife").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::try_from(parse(&["--seed", "42"])).unwrap();
        assert_eq!(config.scene, SceneKind::ParticleLife);
        assert_eq!((config.width, config.height), (1920, 1080));
        assert_eq!(config.seed, 42);
        assert_eq!(config.max_step, MAX_DELTA_TIME);
    }

    #[test]
    fn scene_flag_parses() {
        let cli = parse(&["--scene", "flocking", "--boids", "50"]);
        assert_eq!(cli.scene, SceneKind::Flocking);
        assert_eq!(cli.boids, 50);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert_eq!(
            AppConfig::try_from(parse(&["--width", "0"])),
            Err(ConfigError::InvalidWindowSize { width: 0, height: 1080 })
        );
        assert_eq!(
            AppConfig::try_from(parse(&["--boids", "0"])),
            Err(ConfigError::EmptyPopulation { what: "boid" })
        );
        assert!(AppConfig::try_from(parse(&["--max-step", "0"])).is_err());
    }

    #[test]
    fn scene_seeds_differ() {
        let config = AppConfig::default();
        assert_ne!(
            config.scene_seed(SceneKind::Flocking),
            config.scene_seed(SceneKind::Proximity)
        );
    }
}
