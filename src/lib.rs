/*
 * Artificial Life Simulations - Module Definitions
 *
 * Three emergent-behavior models sharing one host loop:
 * - Flocking boids (separation, alignment, cohesion)
 * - Particle life clusters driven by pairwise gravity rules
 * - A proximity graph linking each wanderer to its nearest neighbors
 *
 * The simulation modules have no windowing dependencies beyond nannou's
 * vector types and can be driven headless; `app`, `input`, `renderer` and
 * `ui` wire them to a nannou window.
 */

// Re-export key components for easier access
pub use boid::Boid;
pub use cluster::{Cluster, Color, Particle};
pub use config::{AppConfig, Cli, SceneKind};
pub use error::{ConfigError, SimulationError};
pub use flocking::Flock;
pub use params::{ClusterParams, FlockParams, KnnParams};
pub use particle_life::{ClusterSystem, Preset, Rule};
pub use physics::{BoundaryPolicy, Bounds};
pub use proximity::{Connection, ProximityGraph, Wanderer};
pub use scene::Scene;
pub use spatial_grid::SpatialGrid;
pub use time::FrameClock;

// Simulation
pub mod boid;
pub mod cluster;
pub mod flocking;
pub mod params;
pub mod particle_life;
pub mod physics;
pub mod proximity;
pub mod spatial_grid;
pub mod time;

// Host
pub mod app;
pub mod config;
pub mod debug;
pub mod error;
pub mod input;
pub mod renderer;
pub mod scene;
pub mod ui;
