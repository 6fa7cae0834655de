/*
 * Renderer Module
 *
 * Draws each scene with nannou primitives: boids as triangle outlines,
 * particles as filled circles, graph connections as fading lines and the
 * cluster simulation area as a rectangle outline.
 *
 * Simulations run in screen coordinates (origin top-left, y down). nannou
 * draws with the origin at the window center and y up, so every point goes
 * through `to_screen` on its way out and `to_simulation` on its way in.
 */

use nannou::prelude::*;

use crate::physics::Bounds;
use crate::scene::{FlockingScene, ParticleLifeScene, ProximityScene};

const DIRECTION_LENGTH: f32 = 30.0;
const STEERING_SCALE: f32 = 0.05;
const CONNECTION_MAX_ALPHA: f32 = 150.0 / 255.0;

/// Simulation point to nannou window point.
#[inline]
pub fn to_screen(point: Point2, bounds: Bounds) -> Point2 {
    pt2(point.x - bounds.width / 2.0, bounds.height / 2.0 - point.y)
}

/// nannou window point to simulation point.
#[inline]
pub fn to_simulation(point: Point2, bounds: Bounds) -> Point2 {
    pt2(point.x + bounds.width / 2.0, bounds.height / 2.0 - point.y)
}

pub fn clear(draw: &Draw) {
    draw.background().color(rgb(20u8, 20, 30));
}

pub fn draw_flock(draw: &Draw, scene: &FlockingScene, bounds: Bounds) {
    for boid in scene.flock.boids() {
        let [p1, p2, p3] = boid.triangle_points().map(|p| to_screen(p, bounds));
        for (start, end) in [(p1, p2), (p2, p3), (p3, p1)] {
            draw.line().start(start).end(end).weight(1.0).color(CYAN);
        }
    }

    if scene.show_direction {
        for boid in scene.flock.boids() {
            let angle = boid.heading();
            let tip = boid.position + vec2(angle.cos(), angle.sin()) * DIRECTION_LENGTH;
            draw.line()
                .start(to_screen(boid.position, bounds))
                .end(to_screen(tip, bounds))
                .weight(1.0)
                .color(YELLOW);
        }
    }

    if scene.show_steering {
        for boid in scene.flock.boids() {
            if boid.last_steering.length_squared() < 1e-4 {
                continue;
            }
            let tip = boid.position + boid.last_steering * STEERING_SCALE;
            draw.line()
                .start(to_screen(boid.position, bounds))
                .end(to_screen(tip, bounds))
                .weight(1.0)
                .color(MAGENTA);
        }
    }
}

pub fn draw_clusters(draw: &Draw, scene: &ParticleLifeScene, bounds: Bounds) {
    let system = &scene.system;
    let radius = system.params().particle_size;

    for cluster in system.clusters() {
        let color = cluster.color();
        let fill = rgb(color.r, color.g, color.b);
        for particle in cluster.particles() {
            draw.ellipse()
                .xy(to_screen(particle.position, bounds))
                .radius(radius)
                .color(fill);
        }
    }

    if scene.show_boundaries {
        let (min, max) = system.simulation_area();
        let center = to_screen((min + max) * 0.5, bounds);
        draw.rect()
            .xy(center)
            .wh(max - min)
            .no_fill()
            .stroke_weight(1.0)
            .stroke(rgb(100u8, 100, 100));
    }
}

pub fn draw_proximity(draw: &Draw, scene: &ProximityScene, bounds: Bounds) {
    let graph = &scene.graph;
    let wanderers = graph.wanderers();
    let max_distance = graph.params().max_distance;

    // Connections first so agents are drawn on top
    for connection in graph.connections() {
        let (Some(a), Some(b)) = (wanderers.get(connection.a), wanderers.get(connection.b)) else {
            continue;
        };
        let alpha = connection.strength(max_distance) * CONNECTION_MAX_ALPHA;
        draw.line()
            .start(to_screen(a.position, bounds))
            .end(to_screen(b.position, bounds))
            .weight(1.0)
            .color(rgba(100.0 / 255.0, 150.0 / 255.0, 200.0 / 255.0, alpha));
    }

    for wanderer in wanderers {
        draw.ellipse()
            .xy(to_screen(wanderer.position, bounds))
            .radius(wanderer.size)
            .color(WHITE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_mapping_round_trips() {
        let bounds = Bounds::new(800.0, 600.0);
        assert_eq!(to_screen(pt2(0.0, 0.0), bounds), pt2(-400.0, 300.0));
        assert_eq!(to_screen(pt2(800.0, 600.0), bounds), pt2(400.0, -300.0));
        let p = pt2(123.0, 456.0);
        assert_eq!(to_simulation(to_screen(p, bounds), bounds), p);
    }
}
