/*
 * Flocking Module
 *
 * The flocking engine: steering forces are computed for every boid against
 * the whole flock (O(n^2), no spatial pruning), applied, and then every boid
 * is integrated in a second pass.
 *
 * Force computation can optionally run on rayon. Forces are read-only over
 * the flock snapshot, so the parallel path gives the same result as the
 * sequential one.
 */

use nannou::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::boid::Boid;
use crate::params::FlockParams;
use crate::physics::Bounds;

/// Advance a flock by one step.
pub fn step(boids: &mut [Boid], dt: f32, bounds: Bounds, params: &FlockParams) {
    let snapshot: &[Boid] = boids;
    let forces: Vec<Vec2> = if params.parallel {
        snapshot
            .par_iter()
            .map(|boid| boid.flock_force(snapshot, params))
            .collect()
    } else {
        snapshot
            .iter()
            .map(|boid| boid.flock_force(snapshot, params))
            .collect()
    };

    for (boid, force) in boids.iter_mut().zip(forces) {
        boid.apply_force(force);
    }

    for boid in boids.iter_mut() {
        boid.update(dt, bounds);
    }
}

/// Owns a flock, its parameters and its random source.
pub struct Flock {
    boids: Vec<Boid>,
    params: FlockParams,
    rng: SmallRng,
}

impl Flock {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            boids: Vec::new(),
            params: FlockParams::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Replace the whole flock with `count` random boids.
    pub fn generate(&mut self, count: usize, bounds: Bounds) {
        let rng = &mut self.rng;
        self.boids = (0..count).map(|_| Boid::random(rng, bounds)).collect();
        info!(count, width = bounds.width, height = bounds.height, "generated flock");
    }

    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        step(&mut self.boids, dt, bounds, &self.params);
        debug!(boids = self.boids.len(), dt, "flock updated");
    }

    pub fn boids(&self) -> &[Boid] {
        &self.boids
    }

    pub fn params(&self) -> &FlockParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut FlockParams {
        &mut self.params
    }

    pub fn len(&self) -> usize {
        self.boids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_boid_moves_in_a_straight_line() {
        let bounds = Bounds::new(1000.0, 1000.0);
        let mut boids = vec![Boid::new(pt2(100.0, 100.0), vec2(10.0, 5.0))];
        step(&mut boids, 0.5, bounds, &FlockParams::default());
        assert_eq!(boids[0].position, pt2(105.0, 102.5));
        assert_eq!(boids[0].velocity, vec2(10.0, 5.0));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let bounds = Bounds::new(400.0, 300.0);
        let mut flock = Flock::with_seed(11);
        flock.generate(60, bounds);
        let mut parallel = flock.boids().to_vec();
        let mut sequential = flock.boids().to_vec();

        let mut params = FlockParams::default();
        for _ in 0..5 {
            step(&mut sequential, 0.016, bounds, &params);
        }
        params.parallel = true;
        for _ in 0..5 {
            step(&mut parallel, 0.016, bounds, &params);
        }

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn generate_replaces_population() {
        let bounds = Bounds::new(640.0, 480.0);
        let mut flock = Flock::with_seed(3);
        flock.generate(50, bounds);
        flock.generate(20, bounds);
        assert_eq!(flock.len(), 20);
        for boid in flock.boids() {
            assert!(boid.position.x >= 0.0 && boid.position.x < bounds.width);
            assert!(boid.position.y >= 0.0 && boid.position.y < bounds.height);
        }
    }

    #[test]
    fn generate_into_a_collapsed_window() {
        let mut flock = Flock::with_seed(4);
        flock.generate(5, Bounds::new(0.0, 600.0));
        assert_eq!(flock.len(), 5);
        assert!(flock.boids().iter().all(|b| b.position.x == 0.0));

        flock.generate(5, Bounds::new(0.0, 0.0));
        flock.update(0.016, Bounds::new(0.0, 0.0));
        assert_eq!(flock.len(), 5);
    }
}
