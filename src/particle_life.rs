/*
 * Particle Life Module
 *
 * Multi-cluster orchestration: an ordered list of clusters, an ordered list
 * of directed rules between them, and the per-frame update that applies
 * every rule in list order and then runs one boundary pass.
 *
 * Rules address clusters by position. Removing a cluster drops every rule
 * naming it and renumbers rules naming later clusters, so no rule is left
 * pointing at a shifted cluster.
 */

use nannou::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::cluster::{Cluster, Color};
use crate::error::SimulationError;
use crate::params::ClusterParams;
use crate::physics::{Bounds, BoundaryPolicy};

/// Integration step used for every rule application, whatever the frame's
/// elapsed time. Gravity constants are tuned against this value.
pub const CLUSTER_TIME_STEP: f32 = 1.0;

/// Directed interaction: `source` feels the particles of `target`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub source: usize,
    pub target: usize,
    /// Negative repels, positive attracts.
    pub gravity: f32,
}

impl Rule {
    pub fn new(source: usize, target: usize, gravity: f32) -> Self {
        Self {
            source,
            target,
            gravity,
        }
    }

    pub fn names(&self, cluster: usize) -> bool {
        self.source == cluster || self.target == cluster
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Default3Clusters,
    ChaoticOrbits,
    PredatorPrey,
    LiquidCrystal,
    SpontaneousSorting,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Self::Default3Clusters,
        Self::ChaoticOrbits,
        Self::PredatorPrey,
        Self::LiquidCrystal,
        Self::SpontaneousSorting,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Default3Clusters => "Default 3 Clusters",
            Self::ChaoticOrbits => "Chaotic Orbits",
            Self::PredatorPrey => "Predator-Prey",
            Self::LiquidCrystal => "Liquid Crystal",
            Self::SpontaneousSorting => "Sorting",
        }
    }
}

pub struct ClusterSystem {
    clusters: Vec<Cluster>,
    rules: Vec<Rule>,
    params: ClusterParams,
    boundary: BoundaryPolicy,
    bounds: Bounds,
    rng: SmallRng,
}

impl ClusterSystem {
    pub fn with_seed(seed: u64, bounds: Bounds) -> Self {
        Self {
            clusters: Vec::new(),
            rules: Vec::new(),
            params: ClusterParams::default(),
            boundary: BoundaryPolicy::default(),
            bounds,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn set_screen_size(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Rectangle particles are spawned in and wrapped into.
    pub fn simulation_area(&self) -> (Vec2, Vec2) {
        self.bounds.inset(self.params.margin_x, self.params.margin_y)
    }

    pub fn params(&self) -> &ClusterParams {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ClusterParams {
        &mut self.params
    }

    pub fn boundary(&self) -> BoundaryPolicy {
        self.boundary
    }

    pub fn set_boundary(&mut self, boundary: BoundaryPolicy) {
        self.boundary = boundary;
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, index: usize) -> Option<&Cluster> {
        self.clusters.get(index)
    }

    pub fn cluster_mut(&mut self, index: usize) -> Option<&mut Cluster> {
        self.clusters.get_mut(index)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn total_particles(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    fn check_cluster(&self, index: usize) -> Result<(), SimulationError> {
        if index < self.clusters.len() {
            Ok(())
        } else {
            Err(SimulationError::ClusterOutOfRange {
                index,
                len: self.clusters.len(),
            })
        }
    }

    fn check_rule(&self, index: usize) -> Result<(), SimulationError> {
        if index < self.rules.len() {
            Ok(())
        } else {
            Err(SimulationError::RuleOutOfRange {
                index,
                len: self.rules.len(),
            })
        }
    }

    /// Add a cluster of `count` random particles and return its index.
    pub fn add_cluster(&mut self, count: usize, color: Color) -> usize {
        let (min, max) = self.simulation_area();
        let mut cluster = Cluster::new(color);
        cluster.resize(count, &mut self.rng, min, max);
        self.clusters.push(cluster);
        debug!(index = self.clusters.len() - 1, count, "added cluster");
        self.clusters.len() - 1
    }

    /// Add a cluster with a random bright color.
    pub fn add_random_cluster(&mut self, count: usize) -> usize {
        let color = Color::random(&mut self.rng);
        self.add_cluster(count, color)
    }

    /// Remove a cluster, drop the rules naming it and renumber the rules
    /// naming later clusters.
    pub fn remove_cluster(&mut self, index: usize) -> Result<(), SimulationError> {
        self.check_cluster(index)?;
        self.clusters.remove(index);

        let before = self.rules.len();
        self.rules.retain(|rule| !rule.names(index));
        for rule in &mut self.rules {
            if rule.source > index {
                rule.source -= 1;
            }
            if rule.target > index {
                rule.target -= 1;
            }
        }
        debug!(index, dropped_rules = before - self.rules.len(), "removed cluster");
        Ok(())
    }

    /// Replace a cluster's particles with `count` fresh random ones.
    pub fn resize_cluster(&mut self, index: usize, count: usize) -> Result<(), SimulationError> {
        self.check_cluster(index)?;
        let (min, max) = self.simulation_area();
        self.clusters[index].resize(count, &mut self.rng, min, max);
        Ok(())
    }

    pub fn set_cluster_color(&mut self, index: usize, color: Color) -> Result<(), SimulationError> {
        self.check_cluster(index)?;
        self.clusters[index].set_color(color);
        Ok(())
    }

    /// Append a rule. Indices are not checked here: a rule naming a missing
    /// cluster is skipped by `update`.
    pub fn add_rule(&mut self, source: usize, target: usize, gravity: f32) {
        self.rules.push(Rule::new(source, target, gravity));
    }

    pub fn set_rule(&mut self, index: usize, gravity: f32) -> Result<(), SimulationError> {
        self.check_rule(index)?;
        self.rules[index].gravity = gravity;
        Ok(())
    }

    pub fn remove_rule(&mut self, index: usize) -> Result<(), SimulationError> {
        self.check_rule(index)?;
        self.rules.remove(index);
        Ok(())
    }

    pub fn clear_rules(&mut self) {
        self.rules.clear();
    }

    /// Remove every cluster and rule.
    pub fn clear(&mut self) {
        self.clusters.clear();
        self.rules.clear();
    }

    /// One rule per ordered cluster pair with gravity uniform in `[min, max)`.
    pub fn generate_random_rules(&mut self, min_gravity: f32, max_gravity: f32) {
        self.clear_rules();
        let n = self.clusters.len();
        for source in 0..n {
            for target in 0..n {
                let gravity = if max_gravity > min_gravity {
                    self.rng.gen_range(min_gravity..max_gravity)
                } else {
                    min_gravity
                };
                self.add_rule(source, target, gravity);
            }
        }
        info!(rules = self.rules.len(), "generated random rules");
    }

    /// Respawn every cluster at its current size, keeping clusters and rules.
    pub fn reset_positions(&mut self) {
        let (min, max) = self.simulation_area();
        for cluster in &mut self.clusters {
            let count = cluster.len();
            cluster.resize(count, &mut self.rng, min, max);
        }
    }

    pub fn load_preset(&mut self, preset: Preset) {
        self.clear();
        match preset {
            Preset::Default3Clusters => {
                self.add_cluster(100, Color::RED);
                self.add_cluster(100, Color::GREEN);
                self.add_cluster(100, Color::BLUE);

                self.add_rule(0, 0, -0.96);
                self.add_rule(0, 1, -0.51);
                self.add_rule(0, 2, 1.02);
                self.add_rule(1, 0, -1.02);
                self.add_rule(1, 1, -0.30);
                self.add_rule(2, 0, -0.60);
                self.add_rule(2, 2, 0.45);
            }
            Preset::ChaoticOrbits => {
                let red = self.add_cluster(150, Color::RED);
                let blue = self.add_cluster(150, Color::BLUE);

                self.add_rule(red, red, -2.0);
                self.add_rule(red, blue, 1.0);
                self.add_rule(blue, blue, -2.0);
                self.add_rule(blue, red, 1.0);
            }
            Preset::PredatorPrey => {
                let prey = self.add_cluster(250, Color::GREEN);
                let predator = self.add_cluster(80, Color::RED);

                self.add_rule(prey, prey, 0.8);
                self.add_rule(prey, predator, -3.0);
                self.add_rule(predator, predator, -1.0);
                self.add_rule(predator, prey, 2.5);
            }
            Preset::LiquidCrystal => {
                let blue = self.add_cluster(120, Color::BLUE);
                let cyan = self.add_cluster(120, Color::CYAN);
                let white = self.add_cluster(120, Color::WHITE);

                self.add_rule(blue, blue, 1.5);
                self.add_rule(blue, cyan, -0.8);
                self.add_rule(blue, white, 0.8);

                self.add_rule(cyan, cyan, 1.5);
                self.add_rule(cyan, blue, -0.8);
                self.add_rule(cyan, white, 0.8);

                self.add_rule(white, white, 1.5);
                self.add_rule(white, blue, 0.8);
                self.add_rule(white, cyan, 0.8);
            }
            Preset::SpontaneousSorting => {
                let red = self.add_cluster(100, Color::RED);
                let green = self.add_cluster(100, Color::GREEN);
                let blue = self.add_cluster(100, Color::BLUE);

                let attract = 0.8;
                let repel = -1.2;
                for (a, b, c) in [(red, green, blue), (green, red, blue), (blue, red, green)] {
                    self.add_rule(a, a, attract);
                    self.add_rule(a, b, repel);
                    self.add_rule(a, c, repel);
                }
            }
        }
        info!(preset = preset.label(), clusters = self.clusters.len(), rules = self.rules.len(), "loaded preset");
    }

    /// Advance one frame. `_elapsed` only decides how often this is called;
    /// every rule integrates with `CLUSTER_TIME_STEP`.
    pub fn update(&mut self, _elapsed: f32) {
        let max_distance = self.params.max_distance;

        for rule in &self.rules {
            apply_rule(&mut self.clusters, rule, max_distance, CLUSTER_TIME_STEP);
        }

        let (min, max) = self.simulation_area();
        for cluster in &mut self.clusters {
            cluster.apply_boundaries(self.boundary, min, max);
            cluster.rebuild_grid();
        }
    }

    /// `(cluster, particle)` pairs registered near `position` in the
    /// clusters' grids.
    pub fn particles_near(&self, position: Point2) -> Vec<(usize, usize)> {
        self.clusters
            .iter()
            .enumerate()
            .flat_map(|(c, cluster)| {
                cluster
                    .particles_near(position)
                    .into_iter()
                    .map(move |p| (c, p))
            })
            .collect()
    }
}

/// Apply one rule to the cluster list. Rules naming a missing cluster are
/// skipped.
pub fn apply_rule(clusters: &mut [Cluster], rule: &Rule, max_distance: f32, dt: f32) {
    let (source, target) = (rule.source, rule.target);
    if source >= clusters.len() || target >= clusters.len() {
        return;
    }

    if source == target {
        clusters[source].interact_self(rule.gravity, max_distance, dt);
    } else if source < target {
        let (head, tail) = clusters.split_at_mut(target);
        head[source].interact(&tail[0], rule.gravity, max_distance, dt);
    } else {
        let (head, tail) = clusters.split_at_mut(source);
        tail[0].interact(&head[target], rule.gravity, max_distance, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn system() -> ClusterSystem {
        ClusterSystem::with_seed(7, Bounds::new(1920.0, 1080.0))
    }

    #[test]
    fn remove_cluster_drops_and_renumbers_rules() {
        let mut sys = system();
        for _ in 0..3 {
            sys.add_random_cluster(10);
        }
        sys.add_rule(0, 0, 1.0);
        sys.add_rule(0, 1, 1.0);
        sys.add_rule(1, 2, 1.0);
        sys.add_rule(2, 0, 1.0);
        sys.add_rule(2, 2, 1.0);

        sys.remove_cluster(1).unwrap();

        assert_eq!(sys.cluster_count(), 2);
        assert_eq!(
            sys.rules(),
            &[Rule::new(0, 0, 1.0), Rule::new(1, 0, 1.0), Rule::new(1, 1, 1.0)]
        );
    }

    #[test]
    fn stale_indices_are_rejected() {
        let mut sys = system();
        sys.add_random_cluster(10);
        assert_eq!(
            sys.remove_cluster(3),
            Err(SimulationError::ClusterOutOfRange { index: 3, len: 1 })
        );
        assert_eq!(
            sys.set_rule(0, 1.0),
            Err(SimulationError::RuleOutOfRange { index: 0, len: 0 })
        );
        assert!(sys.resize_cluster(1, 5).is_err());
        assert_eq!(sys.cluster_count(), 1);
    }

    #[test]
    fn rules_to_missing_clusters_are_skipped() {
        let mut sys = system();
        sys.add_random_cluster(5);
        sys.add_rule(0, 4, 10.0);
        let before: Vec<_> = sys.clusters()[0].particles().to_vec();
        sys.params_mut().max_distance = 10_000.0;
        sys.update(0.016);
        let after = sys.clusters()[0].particles();
        // Only the boundary pass may have touched the particles.
        for (b, a) in before.iter().zip(after) {
            assert_eq!(b.velocity, a.velocity);
        }
    }

    #[test]
    fn resize_and_totals() {
        let mut sys = system();
        sys.add_random_cluster(10);
        sys.add_random_cluster(20);
        assert_eq!(sys.total_particles(), 30);
        sys.resize_cluster(0, 50).unwrap();
        assert_eq!(sys.total_particles(), 70);
    }

    #[test]
    fn presets_build_expected_shapes() {
        let mut sys = system();
        sys.load_preset(Preset::Default3Clusters);
        assert_eq!((sys.cluster_count(), sys.rule_count()), (3, 7));
        assert_eq!(sys.total_particles(), 300);

        sys.load_preset(Preset::PredatorPrey);
        assert_eq!((sys.cluster_count(), sys.rule_count()), (2, 4));
        assert_eq!(sys.total_particles(), 330);

        sys.load_preset(Preset::SpontaneousSorting);
        assert_eq!((sys.cluster_count(), sys.rule_count()), (3, 9));
        assert_eq!(sys.rules()[0], Rule::new(0, 0, 0.8));
        assert_eq!(sys.rules()[4], Rule::new(1, 0, -1.2));
    }

    #[test]
    fn random_rules_cover_every_pair() {
        let mut sys = system();
        for _ in 0..3 {
            sys.add_random_cluster(5);
        }
        sys.generate_random_rules(-3.0, 3.0);
        assert_eq!(sys.rule_count(), 9);
        assert!(sys.rules().iter().all(|r| (-3.0..3.0).contains(&r.gravity)));
    }

    #[test]
    fn apply_rule_handles_both_orders() {
        let mut clusters = vec![
            Cluster::from_particles(vec![crate::cluster::Particle::new(pt2(0.0, 0.0), Vec2::ZERO)], Color::RED),
            Cluster::from_particles(vec![crate::cluster::Particle::new(pt2(10.0, 0.0), Vec2::ZERO)], Color::BLUE),
        ];
        apply_rule(&mut clusters, &Rule::new(1, 0, 1.0), 100.0, 1.0);
        assert!(clusters[1].particles()[0].position.x < 10.0);
        assert_eq!(clusters[0].particles()[0].position, pt2(0.0, 0.0));

        apply_rule(&mut clusters, &Rule::new(0, 1, 1.0), 100.0, 1.0);
        assert!(clusters[0].particles()[0].position.x > 0.0);
    }
}
