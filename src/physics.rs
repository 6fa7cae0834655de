/*
 * Physics Module
 *
 * Shared motion primitives used by every simulation model:
 * - Simulation bounds
 * - Boundary policies (wrap, clamp, reflect)
 * - Vector magnitude limiting and guarded normalization
 *
 * All simulation coordinates are screen-space: the origin is the top-left
 * corner of the window and y grows downwards.
 */

use nannou::prelude::*;
use rand::Rng;

/// Squared distance below which two agents are treated as coincident.
pub const MIN_DISTANCE_SQ: f32 = 0.01;

/// Squared magnitude below which a vector is not normalized.
pub const MIN_MAGNITUDE_SQ: f32 = 0.01;

/// Width and height of the simulated area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Inner rectangle left after removing a margin from every edge.
    pub fn inset(&self, margin_x: f32, margin_y: f32) -> (Vec2, Vec2) {
        (
            vec2(margin_x, margin_y),
            vec2(self.width - margin_x, self.height - margin_y),
        )
    }

    pub fn max(&self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

/// What happens to an agent that leaves its allowed rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// Teleport to the opposite edge, each axis independently.
    #[default]
    Wrap,
    /// Pin the position to the edge it crossed.
    Clamp,
    /// Pin to the edge and point the velocity component back inside.
    Reflect,
}

impl BoundaryPolicy {
    pub const ALL: [BoundaryPolicy; 3] = [Self::Wrap, Self::Clamp, Self::Reflect];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Wrap => "Wrap",
            Self::Clamp => "Clamp",
            Self::Reflect => "Reflect",
        }
    }

    /// Bring `position` back inside `[min, max]` according to the policy.
    pub fn apply(&self, position: &mut Vec2, velocity: &mut Vec2, min: Vec2, max: Vec2) {
        match self {
            Self::Wrap => {
                position.x = warp_axis(position.x, min.x, max.x);
                position.y = warp_axis(position.y, min.y, max.y);
            }
            Self::Clamp => {
                position.x = position.x.clamp(min.x, max.x);
                position.y = position.y.clamp(min.y, max.y);
            }
            Self::Reflect => {
                reflect_axis(&mut position.x, &mut velocity.x, min.x, max.x);
                reflect_axis(&mut position.y, &mut velocity.y, min.y, max.y);
            }
        }
    }
}

/// Uniform sample in `[min, max)`; an empty range yields `min`.
pub fn sample_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..max)
    } else {
        min
    }
}

/// Wrap used by the cluster boundary: touching either edge teleports to the
/// opposite one, so a particle exactly on `min` lands on `max`.
#[inline]
pub fn warp_axis(value: f32, min: f32, max: f32) -> f32 {
    if value <= min {
        max
    } else if value >= max {
        min
    } else {
        value
    }
}

/// Teleport a coordinate across the range: below `min` lands on `max`,
/// at or above `max` lands on `min`.
#[inline]
pub fn wrap_axis(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        max
    } else if value >= max {
        min
    } else {
        value
    }
}

#[inline]
fn reflect_axis(position: &mut f32, velocity: &mut f32, min: f32, max: f32) {
    if *position < min {
        *position = min;
        *velocity = velocity.abs();
    } else if *position > max {
        *position = max;
        *velocity = -velocity.abs();
    }
}

/// Scale `v` down so its magnitude does not exceed `max_magnitude`.
#[inline]
pub fn limit(v: Vec2, max_magnitude: f32) -> Vec2 {
    let length = v.length();
    if length > max_magnitude {
        v / length * max_magnitude
    } else {
        v
    }
}

/// Unit vector in the direction of `v`, or `None` when `v` is too short
/// to have a meaningful direction.
#[inline]
pub fn normalize_or_none(v: Vec2) -> Option<Vec2> {
    let length_sq = v.length_squared();
    if length_sq > MIN_MAGNITUDE_SQ {
        Some(v / length_sq.sqrt())
    } else {
        None
    }
}

/// Reynolds steering: desired velocity at full speed minus the current one,
/// limited to `max_force`. Returns zero when the desired direction is
/// degenerate.
#[inline]
pub fn steer_towards(direction: Vec2, velocity: Vec2, max_speed: f32, max_force: f32) -> Vec2 {
    match normalize_or_none(direction) {
        Some(unit) => limit(unit * max_speed - velocity, max_force),
        None => Vec2::ZERO,
    }
}
