/*
 * Cluster Module
 *
 * Particles grouped into colored clusters, and the pairwise interaction rule
 * applied between two clusters.
 *
 * The rule is an inverse-distance law, not physical gravity:
 *   force    += (gravity / distance) * (other - self)   for 0 < distance < max
 *   velocity  = (velocity + force) * 0.5
 *   position += velocity * dt
 * Positive gravity attracts, negative gravity repels. Each neighbor inside
 * the range contributes a force of magnitude |gravity|, whatever its distance.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::physics::{sample_range, BoundaryPolicy};
use crate::spatial_grid::SpatialGrid;

/// Blend factor between the previous velocity and the new force.
pub const VELOCITY_DAMPING: f32 = 0.5;
/// Initial velocity components are drawn from `-PARTICLE_SPAWN_SPEED..PARTICLE_SPAWN_SPEED`.
pub const PARTICLE_SPAWN_SPEED: f32 = 0.5;
/// Initial acceleration components are drawn from `-PARTICLE_SPAWN_ACCEL..PARTICLE_SPAWN_ACCEL`.
pub const PARTICLE_SPAWN_ACCEL: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Random opaque color with every channel in `100..=255`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::rgb(
            rng.gen_range(100..=255),
            rng.gen_range(100..=255),
            rng.gen_range(100..=255),
        )
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_array(rgb: [u8; 3]) -> Self {
        Self::rgb(rgb[0], rgb[1], rgb[2])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Point2,
    pub velocity: Vec2,
    /// Seeded at spawn; the interaction rule does not integrate it.
    pub acceleration: Vec2,
}

impl Particle {
    pub fn new(position: Point2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
        }
    }

    /// Random position in `[min, max)`, small random velocity and acceleration.
    pub fn random_in_bounds<R: Rng + ?Sized>(rng: &mut R, min: Vec2, max: Vec2) -> Self {
        let position = pt2(sample_range(rng, min.x, max.x), sample_range(rng, min.y, max.y));
        let velocity = vec2(
            rng.gen_range(-PARTICLE_SPAWN_SPEED..PARTICLE_SPAWN_SPEED),
            rng.gen_range(-PARTICLE_SPAWN_SPEED..PARTICLE_SPAWN_SPEED),
        );
        let acceleration = vec2(
            rng.gen_range(-PARTICLE_SPAWN_ACCEL..PARTICLE_SPAWN_ACCEL),
            rng.gen_range(-PARTICLE_SPAWN_ACCEL..PARTICLE_SPAWN_ACCEL),
        );
        Self {
            position,
            velocity,
            acceleration,
        }
    }
}


/// Force exerted on a particle at `position` by every particle in `others`.
#[inline]
fn accumulate_force<'a, I>(position: Point2, others: I, gravity: f32, max_distance: f32) -> Vec2
where
    I: IntoIterator<Item = &'a Point2>,
{
    let mut force = Vec2::ZERO;
    for other in others {
        let delta = *other - position;
        let distance = delta.length();
        if distance > 0.0 && distance < max_distance {
            force += delta * (gravity / distance);
        }
    }
    force
}

#[inline]
fn integrate(particle: &mut Particle, force: Vec2, dt: f32) {
    particle.velocity = (particle.velocity + force) * VELOCITY_DAMPING;
    particle.position += particle.velocity * dt;
}

/// A colored group of particles with its own spatial index.
#[derive(Debug, Clone)]
pub struct Cluster {
    particles: Vec<Particle>,
    color: Color,
    grid: SpatialGrid,
}

impl Cluster {
    pub fn new(color: Color) -> Self {
        Self {
            particles: Vec::new(),
            color,
            grid: SpatialGrid::default(),
        }
    }

    pub fn from_particles(particles: Vec<Particle>, color: Color) -> Self {
        let mut cluster = Self::new(color);
        cluster.particles = particles;
        cluster.rebuild_grid();
        cluster
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut Vec<Particle> {
        &mut self.particles
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }

    /// Replace every particle with `count` fresh random ones inside `[min, max)`.
    pub fn resize<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R, min: Vec2, max: Vec2) {
        self.particles.clear();
        self.particles.reserve(count);
        for _ in 0..count {
            self.particles.push(Particle::random_in_bounds(rng, min, max));
        }
        self.rebuild_grid();
    }

    /// Apply the forces `other` exerts on this cluster.
    pub fn interact(&mut self, other: &Cluster, gravity: f32, max_distance: f32, dt: f32) {
        let targets: Vec<Point2> = other.particles.iter().map(|p| p.position).collect();
        for particle in &mut self.particles {
            let force = accumulate_force(particle.position, &targets, gravity, max_distance);
            integrate(particle, force, dt);
        }
    }

    /// Apply the cluster's forces on itself. Particles move in place, so a
    /// particle sees the already updated positions of the ones before it.
    pub fn interact_self(&mut self, gravity: f32, max_distance: f32, dt: f32) {
        for i in 0..self.particles.len() {
            let position = self.particles[i].position;
            let force = accumulate_force(
                position,
                self.particles.iter().map(|p| &p.position),
                gravity,
                max_distance,
            );
            integrate(&mut self.particles[i], force, dt);
        }
    }

    pub fn apply_boundaries(&mut self, policy: BoundaryPolicy, min: Vec2, max: Vec2) {
        for particle in &mut self.particles {
            policy.apply(&mut particle.position, &mut particle.velocity, min, max);
        }
    }

    /// Reindex the current particle positions.
    pub fn rebuild_grid(&mut self) {
        self.grid.rebuild(self.particles.iter().map(|p| p.position));
    }

    /// Indices of particles in the grid cells around `position`, as of the
    /// last rebuild.
    pub fn particles_near(&self, position: Point2) -> Vec<usize> {
        self.grid.neighbors_of(position)
    }
}
