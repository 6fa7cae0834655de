/*
 * Simulation Parameters Module
 *
 * Editable knobs owned by each simulation model and consulted by its engine
 * every frame. Values are edited between frames through the UI and take
 * effect on the next update.
 *
 * Radii and distances are compared squared. The squared copies are NOT kept
 * in sync automatically: call the matching recompute method after editing.
 */

use std::ops::RangeInclusive;

/// Flocking parameters (radii and rule weights).
#[derive(Debug, Clone, PartialEq)]
pub struct FlockParams {
    pub separation_radius: f32,
    pub alignment_radius: f32,
    pub cohesion_radius: f32,

    pub separation_weight: f32,
    pub alignment_weight: f32,
    pub cohesion_weight: f32,

    /// Compute steering forces with rayon. Produces the same result as the
    /// sequential pass.
    pub parallel: bool,

    separation_radius_sq: f32,
    alignment_radius_sq: f32,
    cohesion_radius_sq: f32,
}

impl Default for FlockParams {
    fn default() -> Self {
        let mut params = Self {
            separation_radius: 50.0,
            alignment_radius: 100.0,
            cohesion_radius: 100.0,
            separation_weight: 1.5,
            alignment_weight: 1.0,
            cohesion_weight: 1.0,
            parallel: false,
            separation_radius_sq: 0.0,
            alignment_radius_sq: 0.0,
            cohesion_radius_sq: 0.0,
        };
        params.update_squared_radii();
        params
    }
}

impl FlockParams {
    /// Recompute the squared radii from the current radii.
    pub fn update_squared_radii(&mut self) {
        self.separation_radius_sq = self.separation_radius * self.separation_radius;
        self.alignment_radius_sq = self.alignment_radius * self.alignment_radius;
        self.cohesion_radius_sq = self.cohesion_radius * self.cohesion_radius;
    }

    pub fn separation_radius_sq(&self) -> f32 {
        self.separation_radius_sq
    }

    pub fn alignment_radius_sq(&self) -> f32 {
        self.alignment_radius_sq
    }

    pub fn cohesion_radius_sq(&self) -> f32 {
        self.cohesion_radius_sq
    }

    /// Restore the default radii and weights, keeping the parallel toggle.
    pub fn reset(&mut self) {
        let parallel = self.parallel;
        *self = Self::default();
        self.parallel = parallel;
    }

    // Parameter ranges for UI sliders
    pub fn separation_radius_range() -> RangeInclusive<f32> {
        10.0..=200.0
    }

    pub fn perception_radius_range() -> RangeInclusive<f32> {
        20.0..=300.0
    }

    pub fn weight_range() -> RangeInclusive<f32> {
        0.0..=5.0
    }

    pub fn boid_count_range() -> RangeInclusive<usize> {
        1..=1000
    }
}

/// Proximity graph parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct KnnParams {
    pub max_connections: usize,
    pub max_distance: f32,
    max_distance_sq: f32,
}

impl Default for KnnParams {
    fn default() -> Self {
        Self::new(5, 200.0)
    }
}

impl KnnParams {
    pub fn new(max_connections: usize, max_distance: f32) -> Self {
        Self {
            max_connections,
            max_distance,
            max_distance_sq: max_distance * max_distance,
        }
    }

    pub fn update_squared(&mut self) {
        self.max_distance_sq = self.max_distance * self.max_distance;
    }

    pub fn max_distance_sq(&self) -> f32 {
        self.max_distance_sq
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn max_connections_range() -> RangeInclusive<usize> {
        1..=20
    }

    pub fn max_distance_range() -> RangeInclusive<f32> {
        50.0..=500.0
    }

    pub fn wanderer_count_range() -> RangeInclusive<usize> {
        1..=500
    }
}

/// Global parameters of the cluster interaction model.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterParams {
    /// Interaction cutoff shared by every rule.
    pub max_distance: f32,
    /// Radius particles are drawn with.
    pub particle_size: f32,
    pub margin_x: f32,
    pub margin_y: f32,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            max_distance: 300.0,
            particle_size: 3.0,
            margin_x: 50.0,
            margin_y: 50.0,
        }
    }
}

impl ClusterParams {
    pub fn max_distance_range() -> RangeInclusive<f32> {
        50.0..=600.0
    }

    pub fn particle_size_range() -> RangeInclusive<f32> {
        1.0..=10.0
    }

    pub fn cluster_size_range() -> RangeInclusive<usize> {
        10..=500
    }

    pub fn gravity_range() -> RangeInclusive<f32> {
        -50.0..=50.0
    }
}

/// Detects slider edits between two points of a frame.
///
/// Take a snapshot before the UI runs and compare afterwards.
#[derive(Debug)]
pub struct ChangeTracker<T: Clone + PartialEq> {
    previous: Option<T>,
}

impl<T: Clone + PartialEq> ChangeTracker<T> {
    pub fn new() -> Self {
        Self { previous: None }
    }

    pub fn take_snapshot(&mut self, value: &T) {
        self.previous = Some(value.clone());
    }

    /// Whether `value` differs from the last snapshot. With no snapshot,
    /// nothing has changed.
    pub fn changed(&self, value: &T) -> bool {
        match &self.previous {
            Some(prev) => prev != value,
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn squared_radii_follow_only_on_recompute() {
        let mut params = FlockParams::default();
        assert_eq!(params.separation_radius_sq(), 2500.0);
        assert_eq!(params.alignment_radius_sq(), 10000.0);

        params.separation_radius = 20.0;
        assert_eq!(params.separation_radius_sq(), 2500.0);

        params.update_squared_radii();
        assert_eq!(params.separation_radius_sq(), 400.0);
    }

    #[test]
    fn reset_keeps_parallel_toggle() {
        let mut params = FlockParams::default();
        params.parallel = true;
        params.cohesion_weight = 4.0;
        params.reset();
        assert!(params.parallel);
        assert_eq!(params.cohesion_weight, 1.0);
    }

    #[test]
    fn knn_squared_distance() {
        let mut params = KnnParams::default();
        assert_eq!(params.max_distance_sq(), 40000.0);
        params.max_distance = 10.0;
        params.update_squared();
        assert_eq!(params.max_distance_sq(), 100.0);
    }

    #[test]
    fn change_tracker_detects_edits() {
        let mut params = KnnParams::default();
        let mut tracker = ChangeTracker::new();
        assert!(!tracker.changed(&params));

        tracker.take_snapshot(&params);
        assert!(!tracker.changed(&params));

        params.max_connections = 9;
        assert!(tracker.changed(&params));
    }
}
