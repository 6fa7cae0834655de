/*
 * Scene Module
 *
 * Each simulation model is wrapped in a scene that the host loop drives
 * through one entry point per phase: start, update, draw, gui, shutdown.
 * The scene owns its engine plus the UI state around it (pause flag,
 * overlay toggles, pending rule edits).
 */

use nannou::prelude::*;
use nannou_egui::egui;
use tracing::info;

use crate::config::{AppConfig, SceneKind};
use crate::debug::DebugInfo;
use crate::flocking::Flock;
use crate::params::{ChangeTracker, FlockParams};
use crate::particle_life::{ClusterSystem, Preset};
use crate::physics::Bounds;
use crate::proximity::ProximityGraph;
use crate::renderer;
use crate::ui;

pub trait Scene {
    fn kind(&self) -> SceneKind;

    /// Called once when the scene becomes active.
    fn start(&mut self, bounds: Bounds);

    /// Advance by `dt` seconds (already clamped by the caller).
    fn update(&mut self, dt: f32, bounds: Bounds);

    fn draw(&self, draw: &Draw, bounds: Bounds);

    fn gui(&mut self, ctx: &egui::CtxRef, info: &DebugInfo, bounds: Bounds);

    /// Replace the population, keeping parameters.
    fn regenerate(&mut self, bounds: Bounds);

    fn paused(&self) -> bool;

    fn set_paused(&mut self, paused: bool);

    fn toggle_pause(&mut self) {
        let paused = self.paused();
        self.set_paused(!paused);
    }

    /// Cursor position in simulation coordinates, `None` when outside.
    fn set_cursor(&mut self, _cursor: Option<Point2>) {}

    /// Called once when the scene is replaced or the app exits.
    fn shutdown(&mut self) {
        info!(scene = self.kind().label(), "simulation shutting down");
    }
}

/// Build the scene for `kind` from the startup configuration.
pub fn create(kind: SceneKind, config: &AppConfig, bounds: Bounds) -> Box<dyn Scene> {
    let seed = config.scene_seed(kind);
    match kind {
        SceneKind::Flocking => Box::new(FlockingScene::new(seed, config.boid_count)),
        SceneKind::ParticleLife => Box::new(ParticleLifeScene::new(seed, bounds)),
        SceneKind::Proximity => Box::new(ProximityScene::new(seed, config.wanderer_count)),
    }
}

pub struct FlockingScene {
    pub flock: Flock,
    pub boid_count: usize,
    pub paused: bool,
    pub show_direction: bool,
    pub show_steering: bool,
    pub(crate) params_tracker: ChangeTracker<FlockParams>,
}

impl FlockingScene {
    pub fn new(seed: u64, boid_count: usize) -> Self {
        Self {
            flock: Flock::with_seed(seed),
            boid_count,
            paused: false,
            show_direction: false,
            show_steering: false,
            params_tracker: ChangeTracker::new(),
        }
    }
}

impl Scene for FlockingScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Flocking
    }

    fn start(&mut self, bounds: Bounds) {
        info!("Boids simulation starting...");
        self.flock.generate(self.boid_count, bounds);
    }

    fn update(&mut self, dt: f32, bounds: Bounds) {
        if !self.paused {
            self.flock.update(dt, bounds);
        }
    }

    fn draw(&self, draw: &Draw, bounds: Bounds) {
        renderer::draw_flock(draw, self, bounds);
    }

    fn gui(&mut self, ctx: &egui::CtxRef, info: &DebugInfo, bounds: Bounds) {
        ui::flocking_panel(ctx, self, info, bounds);
    }

    fn regenerate(&mut self, bounds: Bounds) {
        self.flock.generate(self.boid_count, bounds);
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// Staged values for the "Add New Rule" controls.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RuleDraft {
    pub source: usize,
    pub target: usize,
    pub gravity: f32,
}

pub struct ParticleLifeScene {
    pub system: ClusterSystem,
    pub paused: bool,
    pub show_boundaries: bool,
    pub draft: RuleDraft,
    pub cursor: Option<Point2>,
}

impl ParticleLifeScene {
    pub fn new(seed: u64, bounds: Bounds) -> Self {
        Self {
            system: ClusterSystem::with_seed(seed, bounds),
            paused: false,
            show_boundaries: true,
            draft: RuleDraft::default(),
            cursor: None,
        }
    }

    /// Number of particles registered around the cursor.
    pub fn particles_under_cursor(&self) -> Option<usize> {
        self.cursor.map(|c| self.system.particles_near(c).len())
    }
}

impl Scene for ParticleLifeScene {
    fn kind(&self) -> SceneKind {
        SceneKind::ParticleLife
    }

    fn start(&mut self, bounds: Bounds) {
        info!("Particle Life simulation starting...");
        self.system.set_screen_size(bounds);
        self.system.load_preset(Preset::Default3Clusters);
    }

    fn update(&mut self, dt: f32, bounds: Bounds) {
        self.system.set_screen_size(bounds);
        if !self.paused {
            self.system.update(dt);
        }
    }

    fn draw(&self, draw: &Draw, bounds: Bounds) {
        renderer::draw_clusters(draw, self, bounds);
    }

    fn gui(&mut self, ctx: &egui::CtxRef, info: &DebugInfo, bounds: Bounds) {
        ui::particle_life_panel(ctx, self, info, bounds);
    }

    fn regenerate(&mut self, bounds: Bounds) {
        self.system.set_screen_size(bounds);
        self.system.reset_positions();
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn set_cursor(&mut self, cursor: Option<Point2>) {
        self.cursor = cursor;
    }
}

pub struct ProximityScene {
    pub graph: ProximityGraph,
    pub wanderer_count: usize,
    pub paused: bool,
}

impl ProximityScene {
    pub fn new(seed: u64, wanderer_count: usize) -> Self {
        Self {
            graph: ProximityGraph::with_seed(seed),
            wanderer_count,
            paused: false,
        }
    }
}

impl Scene for ProximityScene {
    fn kind(&self) -> SceneKind {
        SceneKind::Proximity
    }

    fn start(&mut self, bounds: Bounds) {
        info!("Particles KNN simulation starting...");
        self.graph.generate(self.wanderer_count, bounds);
    }

    fn update(&mut self, dt: f32, bounds: Bounds) {
        if !self.paused {
            self.graph.update(dt, bounds);
        }
    }

    fn draw(&self, draw: &Draw, bounds: Bounds) {
        renderer::draw_proximity(draw, self, bounds);
    }

    fn gui(&mut self, ctx: &egui::CtxRef, info: &DebugInfo, bounds: Bounds) {
        ui::proximity_panel(ctx, self, info, bounds);
    }

    fn regenerate(&mut self, bounds: Bounds) {
        self.graph.generate(self.wanderer_count, bounds);
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}
