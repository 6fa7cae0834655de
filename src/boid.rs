/*
 * Boid Module
 *
 * This module defines the Boid struct and its behavior.
 * Each boid follows three main rules:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 *
 * Every rule scans the whole flock and compares squared distances against
 * the squared radii held by FlockParams.
 */

use nannou::prelude::*;
use rand::Rng;

use crate::params::FlockParams;
use crate::physics::{self, Bounds, MIN_DISTANCE_SQ};

pub const BOID_MAX_SPEED: f32 = 150.0;
pub const BOID_MAX_FORCE: f32 = 100.0;
pub const BOID_SIZE: f32 = 8.0;
/// Initial velocity components are drawn from `-BOID_SPAWN_SPEED..BOID_SPAWN_SPEED`.
pub const BOID_SPAWN_SPEED: f32 = 80.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub position: Point2,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub max_speed: f32,
    pub max_force: f32,
    pub size: f32,
    /// Acceleration accumulated during the last update, kept for the
    /// steering overlay after `acceleration` is reset.
    pub last_steering: Vec2,
}

impl Boid {
    pub fn new(position: Point2, velocity: Vec2) -> Self {
        Self {
            position,
            velocity,
            acceleration: Vec2::ZERO,
            max_speed: BOID_MAX_SPEED,
            max_force: BOID_MAX_FORCE,
            size: BOID_SIZE,
            last_steering: Vec2::ZERO,
        }
    }

    /// Random position inside the bounds, random velocity components.
    pub fn random<R: Rng + ?Sized>(rng: &mut R, bounds: Bounds) -> Self {
        let x = physics::sample_range(rng, 0.0, bounds.width);
        let y = physics::sample_range(rng, 0.0, bounds.height);
        let vx = rng.gen_range(-BOID_SPAWN_SPEED..BOID_SPAWN_SPEED);
        let vy = rng.gen_range(-BOID_SPAWN_SPEED..BOID_SPAWN_SPEED);
        Self::new(pt2(x, y), vec2(vx, vy))
    }

    // Apply a force to the boid
    pub fn apply_force(&mut self, force: Vec2) {
        self.acceleration += force;
    }

    /// Integrate one step and wrap around the screen edges.
    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        self.velocity += self.acceleration * dt;
        self.velocity = physics::limit(self.velocity, self.max_speed);

        self.position += self.velocity * dt;

        self.position.x = physics::wrap_axis(self.position.x, 0.0, bounds.width);
        self.position.y = physics::wrap_axis(self.position.y, 0.0, bounds.height);

        self.last_steering = self.acceleration;
        self.acceleration = Vec2::ZERO;
    }

    pub fn heading(&self) -> f32 {
        self.velocity.y.atan2(self.velocity.x)
    }

    /// Nose, left and right corners of the triangle drawn for this boid.
    pub fn triangle_points(&self) -> [Point2; 3] {
        let angle = self.heading();
        let half = self.size * 0.5;
        let nose = self.position + vec2(angle.cos(), angle.sin()) * self.size;
        let left = self.position + vec2((angle + 2.5).cos(), (angle + 2.5).sin()) * half;
        let right = self.position + vec2((angle - 2.5).cos(), (angle - 2.5).sin()) * half;
        [nose, left, right]
    }

    // Calculate separation force (avoid crowding neighbors)
    pub fn separation(&self, boids: &[Boid], params: &FlockParams) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in boids {
            let diff = self.position - other.position;
            let distance_sq = diff.length_squared();

            if distance_sq > MIN_DISTANCE_SQ && distance_sq < params.separation_radius_sq() {
                // Unit vector pointing away from the neighbor
                sum += diff / distance_sq.sqrt();
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        sum /= count as f32;
        physics::steer_towards(sum, self.velocity, self.max_speed, self.max_force)
    }

    // Calculate alignment force (steer towards average heading of neighbors)
    pub fn alignment(&self, boids: &[Boid], params: &FlockParams) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in boids {
            let distance_sq = self.position.distance_squared(other.position);

            if distance_sq > MIN_DISTANCE_SQ && distance_sq < params.alignment_radius_sq() {
                sum += other.velocity;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        sum /= count as f32;
        physics::steer_towards(sum, self.velocity, self.max_speed, self.max_force)
    }

    // Calculate cohesion force (steer towards average position of neighbors)
    pub fn cohesion(&self, boids: &[Boid], params: &FlockParams) -> Vec2 {
        let mut sum = Vec2::ZERO;
        let mut count = 0;

        for other in boids {
            let distance_sq = self.position.distance_squared(other.position);

            if distance_sq > MIN_DISTANCE_SQ && distance_sq < params.cohesion_radius_sq() {
                sum += other.position;
                count += 1;
            }
        }

        if count == 0 {
            return Vec2::ZERO;
        }

        let center = sum / count as f32;
        physics::steer_towards(center - self.position, self.velocity, self.max_speed, self.max_force)
    }

    /// Weighted sum of the three rules.
    pub fn flock_force(&self, boids: &[Boid], params: &FlockParams) -> Vec2 {
        self.separation(boids, params) * params.separation_weight
            + self.alignment(boids, params) * params.alignment_weight
            + self.cohesion(boids, params) * params.cohesion_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn still(x: f32, y: f32) -> Boid {
        Boid::new(pt2(x, y), Vec2::ZERO)
    }

    #[test]
    fn isolated_boid_feels_no_steering() {
        let params = FlockParams::default();
        let boids = vec![Boid::new(pt2(100.0, 100.0), vec2(10.0, 0.0))];
        let boid = &boids[0];
        assert_eq!(boid.separation(&boids, &params), Vec2::ZERO);
        assert_eq!(boid.alignment(&boids, &params), Vec2::ZERO);
        assert_eq!(boid.cohesion(&boids, &params), Vec2::ZERO);
    }

    #[test]
    fn neighbors_outside_radius_are_ignored() {
        let params = FlockParams::default();
        let boids = vec![still(0.0, 0.0), still(500.0, 0.0)];
        assert_eq!(boids[0].flock_force(&boids, &params), Vec2::ZERO);
    }

    #[test]
    fn coincident_boids_are_skipped() {
        let params = FlockParams::default();
        let boids = vec![still(10.0, 10.0), still(10.05, 10.0)];
        assert_eq!(boids[0].separation(&boids, &params), Vec2::ZERO);
    }

    #[test]
    fn separation_points_away_and_is_limited() {
        let params = FlockParams::default();
        let boids = vec![still(100.0, 100.0), still(110.0, 100.0)];
        let force = boids[0].separation(&boids, &params);
        assert!(force.x < 0.0);
        assert!(force.y.abs() < 1e-4);
        assert!(force.length() <= BOID_MAX_FORCE + 1e-3);
    }

    #[test]
    fn cohesion_points_towards_center() {
        let params = FlockParams::default();
        let boids = vec![still(100.0, 100.0), still(100.0, 160.0)];
        let force = boids[0].cohesion(&boids, &params);
        assert!(force.y > 0.0);
        assert!(force.x.abs() < 1e-4);
    }

    #[test]
    fn alignment_matches_neighbor_heading() {
        let params = FlockParams::default();
        let boids = vec![still(100.0, 100.0), Boid::new(pt2(130.0, 100.0), vec2(0.0, -50.0))];
        let force = boids[0].alignment(&boids, &params);
        assert!(force.y < 0.0);
    }

    #[test]
    fn update_limits_speed_and_clears_acceleration() {
        let mut boid = Boid::new(pt2(50.0, 50.0), vec2(140.0, 0.0));
        boid.apply_force(vec2(1000.0, 1000.0));
        boid.update(0.1, Bounds::new(1000.0, 1000.0));
        assert!(boid.velocity.length() <= boid.max_speed + 1e-3);
        assert_eq!(boid.acceleration, Vec2::ZERO);
        assert_eq!(boid.last_steering, vec2(1000.0, 1000.0));
    }

    #[test]
    fn update_wraps_each_axis() {
        let bounds = Bounds::new(200.0, 100.0);
        let mut boid = Boid::new(pt2(199.0, 1.0), vec2(100.0, -100.0));
        boid.update(0.1, bounds);
        assert_eq!(boid.position.x, 0.0);
        assert_eq!(boid.position.y, 100.0);
    }
}
