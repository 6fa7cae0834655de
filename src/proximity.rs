/*
 * Proximity Graph Module
 *
 * Wandering agents that drift smoothly towards a randomly chosen heading,
 * and the per-frame k-nearest-neighbor connections drawn between them.
 *
 * Connections are for display only; they never feed back into motion.
 */

use std::f32::consts::TAU;

use nannou::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::params::KnnParams;
use crate::physics::{self, Bounds};

pub const WANDERER_SPEED: f32 = 50.0;
pub const WANDERER_SIZE: f32 = 4.0;
/// Rate at which velocity relaxes towards the target velocity.
pub const WANDERER_SMOOTHNESS: f32 = 2.0;
/// Chance per update that a wanderer picks a new heading.
pub const DIRECTION_CHANGE_PROBABILITY: f32 = 0.01;

#[derive(Debug, Clone, PartialEq)]
pub struct Wanderer {
    pub position: Point2,
    pub velocity: Vec2,
    pub target_velocity: Vec2,
    pub speed: f32,
    pub size: f32,
    pub smoothness: f32,
}

impl Wanderer {
    /// A wanderer at rest with a random target heading.
    pub fn new<R: Rng + ?Sized>(position: Point2, rng: &mut R) -> Self {
        let mut wanderer = Self {
            position,
            velocity: Vec2::ZERO,
            target_velocity: Vec2::ZERO,
            speed: WANDERER_SPEED,
            size: WANDERER_SIZE,
            smoothness: WANDERER_SMOOTHNESS,
        };
        wanderer.randomize_direction(rng);
        wanderer
    }

    pub fn randomize_direction<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let angle = rng.gen_range(0.0..TAU);
        self.target_velocity = vec2(angle.cos(), angle.sin()) * self.speed;
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, bounds: Bounds, rng: &mut R) {
        self.velocity += (self.target_velocity - self.velocity) * self.smoothness * dt;
        self.position += self.velocity * dt;

        self.position.x = physics::wrap_axis(self.position.x, 0.0, bounds.width);
        self.position.y = physics::wrap_axis(self.position.y, 0.0, bounds.height);

        if rng.gen::<f32>() < DIRECTION_CHANGE_PROBABILITY {
            self.randomize_direction(rng);
        }
    }
}

/// Directed edge from `a` to one of its nearest neighbors `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub distance: f32,
}

impl Connection {
    /// Line opacity in `[0, 1]`, fading linearly to zero at `max_distance`.
    pub fn strength(&self, max_distance: f32) -> f32 {
        if max_distance <= 0.0 {
            return 0.0;
        }
        (1.0 - self.distance / max_distance).clamp(0.0, 1.0)
    }
}

/// For every agent `i`, connect it to its closest agents `j > i` within
/// `max_distance`, at most `max_connections` of them.
///
/// Only pairs with `i < j` are considered, so the result is asymmetric: an
/// agent late in the list may have no outgoing edges even when it appears in
/// other agents' lists.
pub fn find_connections(positions: &[Point2], params: &KnnParams) -> Vec<Connection> {
    let mut connections = Vec::new();
    let mut candidates: Vec<(usize, f32)> = Vec::new();

    for (i, p1) in positions.iter().enumerate() {
        candidates.clear();

        for (j, p2) in positions.iter().enumerate().skip(i + 1) {
            let distance_sq = p1.distance_squared(*p2);
            if distance_sq < params.max_distance_sq() {
                candidates.push((j, distance_sq));
            }
        }

        candidates.sort_by(|a, b| a.1.total_cmp(&b.1));

        connections.extend(
            candidates
                .iter()
                .take(params.max_connections)
                .map(|&(j, distance_sq)| Connection {
                    a: i,
                    b: j,
                    distance: distance_sq.sqrt(),
                }),
        );
    }

    connections
}

pub struct ProximityGraph {
    wanderers: Vec<Wanderer>,
    connections: Vec<Connection>,
    params: KnnParams,
    rng: SmallRng,
}

impl ProximityGraph {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            wanderers: Vec::new(),
            connections: Vec::new(),
            params: KnnParams::default(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Replace every wanderer with `count` fresh ones at random positions.
    pub fn generate(&mut self, count: usize, bounds: Bounds) {
        let rng = &mut self.rng;
        self.wanderers = (0..count)
            .map(|_| {
                let x = physics::sample_range(rng, 0.0, bounds.width);
                let y = physics::sample_range(rng, 0.0, bounds.height);
                Wanderer::new(pt2(x, y), rng)
            })
            .collect();
        self.connections.clear();
        info!(count, "generated wanderers");
    }

    /// Move every wanderer, then recompute the connections from scratch.
    pub fn update(&mut self, dt: f32, bounds: Bounds) {
        for wanderer in &mut self.wanderers {
            wanderer.update(dt, bounds, &mut self.rng);
        }
        self.recompute_connections();
    }

    pub fn recompute_connections(&mut self) {
        let positions: Vec<Point2> = self.wanderers.iter().map(|w| w.position).collect();
        self.connections = find_connections(&positions, &self.params);
    }

    pub fn wanderers(&self) -> &[Wanderer] {
        &self.wanderers
    }

    pub fn wanderers_mut(&mut self) -> &mut Vec<Wanderer> {
        &mut self.wanderers
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn params(&self) -> &KnnParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut KnnParams {
        &mut self.params
    }

    pub fn len(&self) -> usize {
        self.wanderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wanderers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_first_and_capped() {
        let positions = [
            pt2(0.0, 0.0),
            pt2(3.0, 0.0),
            pt2(1.0, 0.0),
            pt2(2.0, 0.0),
        ];
        let connections = find_connections(&positions, &KnnParams::new(2, 10.0));
        let from_zero: Vec<_> = connections.iter().filter(|c| c.a == 0).collect();
        assert_eq!(from_zero.len(), 2);
        assert_eq!((from_zero[0].b, from_zero[0].distance), (2, 1.0));
        assert_eq!((from_zero[1].b, from_zero[1].distance), (3, 2.0));
    }

    #[test]
    fn only_later_agents_are_candidates() {
        let positions = [pt2(0.0, 0.0), pt2(1.0, 0.0)];
        let connections = find_connections(&positions, &KnnParams::new(5, 10.0));
        assert_eq!(connections, vec![Connection { a: 0, b: 1, distance: 1.0 }]);
    }

    #[test]
    fn threshold_is_strict() {
        let positions = [pt2(0.0, 0.0), pt2(5.0, 0.0)];
        assert!(find_connections(&positions, &KnnParams::new(5, 5.0)).is_empty());
    }

    #[test]
    fn strength_fades_with_distance() {
        let c = Connection { a: 0, b: 1, distance: 50.0 };
        assert!((c.strength(200.0) - 0.75).abs() < 1e-6);
        assert_eq!(c.strength(25.0), 0.0);
    }

    #[test]
    fn velocity_relaxes_towards_target() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut w = Wanderer::new(pt2(100.0, 100.0), &mut rng);
        w.target_velocity = vec2(50.0, 0.0);
        let bounds = Bounds::new(1000.0, 1000.0);
        // Keep the test independent of the random heading change.
        let mut last_gap = (w.target_velocity - w.velocity).length();
        for _ in 0..10 {
            let target = w.target_velocity;
            w.update(0.05, bounds, &mut rng);
            if w.target_velocity != target {
                break;
            }
            let gap = (w.target_velocity - w.velocity).length();
            assert!(gap < last_gap);
            last_gap = gap;
        }
    }

    #[test]
    fn target_speed_is_constant() {
        let mut rng = SmallRng::seed_from_u64(2);
        for _ in 0..20 {
            let w = Wanderer::new(Vec2::ZERO, &mut rng);
            assert!((w.target_velocity.length() - WANDERER_SPEED).abs() < 1e-3);
        }
    }

    #[test]
    fn generate_into_a_collapsed_window() {
        let mut graph = ProximityGraph::with_seed(6);
        graph.generate(5, Bounds::new(800.0, 0.0));
        assert_eq!(graph.len(), 5);
        assert!(graph.wanderers().iter().all(|w| w.position.y == 0.0));

        graph.update(0.016, Bounds::new(800.0, 0.0));
        assert_eq!(graph.len(), 5);
    }
}
