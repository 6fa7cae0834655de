//! Headless runs of the three simulations through the public API.

use alife::cluster::{Cluster, Color, Particle};
use alife::params::{FlockParams, KnnParams};
use alife::particle_life::apply_rule;
use alife::proximity::{find_connections, Connection};
use alife::{Boid, BoundaryPolicy, Bounds, ClusterSystem, Flock, ProximityGraph, Rule};
use nannou::prelude::*;

const BOUNDS: Bounds = Bounds {
    width: 800.0,
    height: 600.0,
};

fn single_particle(x: f32, y: f32) -> Cluster {
    Cluster::from_particles(vec![Particle::new(pt2(x, y), Vec2::ZERO)], Color::WHITE)
}

#[test]
fn flock_respects_speed_limit_and_bounds() {
    let mut flock = Flock::with_seed(21);
    flock.generate(120, BOUNDS);

    for _ in 0..200 {
        flock.update(1.0 / 60.0, BOUNDS);
    }

    for boid in flock.boids() {
        assert!(boid.velocity.length() <= boid.max_speed + 1e-3);
        assert!((0.0..=BOUNDS.width).contains(&boid.position.x));
        assert!((0.0..=BOUNDS.height).contains(&boid.position.y));
    }
}

#[test]
fn isolated_boid_feels_no_steering() {
    let boid = Boid::new(pt2(400.0, 300.0), vec2(10.0, 0.0));
    let flock = vec![boid.clone()];
    assert_eq!(boid.flock_force(&flock, &FlockParams::default()), Vec2::ZERO);
}

#[test]
fn regenerating_with_a_new_seed_keeps_the_count() {
    let mut a = Flock::with_seed(1);
    let mut b = Flock::with_seed(2);
    a.generate(40, BOUNDS);
    b.generate(40, BOUNDS);
    assert_eq!(a.len(), b.len());
    assert_ne!(a.boids(), b.boids());
}

#[test]
fn positive_gravity_attracts_and_negative_repels() {
    for (gravity, moves_right) in [(1.0, true), (-1.0, false)] {
        let mut clusters = vec![single_particle(100.0, 100.0), single_particle(150.0, 100.0)];
        apply_rule(&mut clusters, &Rule::new(0, 1, gravity), 300.0, 1.0);

        let moved = clusters[0].particles()[0].position.x - 100.0;
        assert_eq!(moved > 0.0, moves_right, "gravity {}", gravity);
        // Only the source cluster moves
        assert_eq!(clusters[1].particles()[0].position, pt2(150.0, 100.0));
    }
}

#[test]
fn particles_beyond_max_distance_do_not_interact() {
    let mut clusters = vec![single_particle(100.0, 100.0), single_particle(500.0, 100.0)];
    apply_rule(&mut clusters, &Rule::new(0, 1, 5.0), 300.0, 1.0);
    assert_eq!(clusters[0].particles()[0].position, pt2(100.0, 100.0));
}

#[test]
fn particle_life_step_ignores_frame_time() {
    let run = |elapsed: f32| {
        let mut system = ClusterSystem::with_seed(99, Bounds::new(1920.0, 1080.0));
        system.add_random_cluster(30);
        system.add_random_cluster(30);
        system.add_rule(0, 1, 0.5);
        system.add_rule(1, 0, -0.5);
        for _ in 0..5 {
            system.update(elapsed);
        }
        system
            .clusters()
            .iter()
            .flat_map(|c| c.particles().iter().map(|p| p.position))
            .collect::<Vec<_>>()
    };

    assert_eq!(run(0.001), run(0.1));
}

#[test]
fn particles_stay_inside_the_simulation_area() {
    for policy in BoundaryPolicy::ALL {
        let mut system = ClusterSystem::with_seed(5, Bounds::new(1024.0, 768.0));
        system.set_boundary(policy);
        system.add_random_cluster(50);
        system.add_rule(0, 0, -2.0);
        for _ in 0..20 {
            system.update(1.0 / 60.0);
        }

        let (min, max) = system.simulation_area();
        for particle in system.clusters()[0].particles() {
            let p = particle.position;
            assert!(p.x >= min.x && p.x <= max.x, "{:?} x={}", policy, p.x);
            assert!(p.y >= min.y && p.y <= max.y, "{:?} y={}", policy, p.y);
        }
    }
}

#[test]
fn removing_a_cluster_drops_its_rules() {
    let mut system = ClusterSystem::with_seed(3, Bounds::new(1920.0, 1080.0));
    system.add_random_cluster(10);
    system.add_random_cluster(10);
    system.add_rule(0, 1, 1.0);
    system.add_rule(1, 1, 1.0);
    system.add_rule(0, 0, 1.0);

    system.remove_cluster(1).unwrap();

    assert_eq!(system.cluster_count(), 1);
    assert_eq!(system.rules(), &[Rule::new(0, 0, 1.0)]);
    assert!(system.remove_cluster(5).is_err());
}

#[test]
fn nearest_neighbors_only_link_later_agents_within_range() {
    let positions = [pt2(0.0, 0.0), pt2(1.0, 0.0), pt2(100.0, 100.0)];
    let connections = find_connections(&positions, &KnnParams::new(2, 5.0));

    assert_eq!(
        connections,
        vec![Connection {
            a: 0,
            b: 1,
            distance: 1.0
        }]
    );
}

#[test]
fn proximity_graph_caps_connections_per_agent() {
    let mut graph = ProximityGraph::with_seed(8);
    graph.params_mut().max_connections = 3;
    graph.params_mut().max_distance = 500.0;
    graph.params_mut().update_squared();
    graph.generate(60, BOUNDS);
    graph.update(1.0 / 60.0, BOUNDS);

    for i in 0..graph.len() {
        let outgoing = graph.connections().iter().filter(|c| c.a == i).count();
        assert!(outgoing <= 3);
    }
    for connection in graph.connections() {
        assert!(connection.a < connection.b);
        assert!(connection.distance < 500.0);
    }
}
