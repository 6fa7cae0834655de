/*
 * UI Module
 *
 * Control panels built with nannou_egui, one per scene, plus the scene
 * selector. Panels edit parameters in place; edits take effect on the next
 * update. Structural edits (resizing or removing clusters and rules) are
 * collected while the panel is drawn and applied once it is done.
 */

use nannou_egui::egui;
use tracing::{debug, warn};

use crate::cluster::Color;
use crate::config::SceneKind;
use crate::debug::DebugInfo;
use crate::error::SimulationError;
use crate::params::{ClusterParams, FlockParams, KnnParams};
use crate::particle_life::{ClusterSystem, Preset};
use crate::physics::{Bounds, BoundaryPolicy};
use crate::scene::{FlockingScene, ParticleLifeScene, ProximityScene};
use crate::time::FrameClock;

fn pause_label(paused: bool) -> &'static str {
    if paused {
        "Resume"
    } else {
        "Pause"
    }
}

fn log_rejected(result: Result<(), SimulationError>) {
    if let Err(err) = result {
        warn!(%err, "ignored cluster edit");
    }
}

fn frame_stats(ui: &mut egui::Ui, info: &DebugInfo) {
    ui.label(format!("FPS: {:.1}", info.fps));
    ui.label(format!("Frame time: {:.2} ms", info.frame_time_ms()));
    ui.label(format!("Step: {:.3} s (frame {})", info.sim_step, info.frame_count));
    ui.label(format!("Status: {}", info.status()));
}

/// Scene picker and clock controls. Returns the newly selected scene.
pub fn scene_selector(ctx: &egui::CtxRef, current: SceneKind, clock: &mut FrameClock) -> Option<SceneKind> {
    let mut selected = current;

    egui::Window::new("Scenes")
        .default_pos([10.0, 600.0])
        .show(ctx, |ui| {
            egui::ComboBox::from_label("Simulation")
                .selected_text(selected.label())
                .show_ui(ui, |ui| {
                    for kind in SceneKind::ALL {
                        ui.selectable_value(&mut selected, kind, kind.label());
                    }
                });
            ui.add(egui::Slider::new(&mut clock.time_scale, 0.0..=2.0).text("Time Scale"));
            ui.label(format!("Max step: {:.3} s", clock.max_step()));
            ui.label(format!("Frame delta: {:.3} s", clock.unscaled_delta()));
            ui.label(format!("Simulated: {:.1} s", clock.elapsed()));
            ui.label("Space: pause   R: regenerate   1/2/3: switch");
        });

    (selected != current).then_some(selected)
}

pub fn flocking_panel(ctx: &egui::CtxRef, scene: &mut FlockingScene, info: &DebugInfo, bounds: Bounds) {
    scene.params_tracker.take_snapshot(scene.flock.params());

    egui::Window::new("Boids Control Panel")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label("Simulation Controls");
            ui.separator();

            ui.add(
                egui::Slider::new(&mut scene.boid_count, FlockParams::boid_count_range())
                    .text("Number of Boids"),
            );

            ui.horizontal(|ui| {
                if ui.button("Reset Boids").clicked() {
                    scene.flock.generate(scene.boid_count, bounds);
                }
                if ui.button(pause_label(scene.paused)).clicked() {
                    scene.paused = !scene.paused;
                }
            });

            ui.separator();
            ui.label("Visualization");
            ui.checkbox(&mut scene.show_direction, "Show Direction Vector");
            ui.checkbox(&mut scene.show_steering, "Show Steering Vector");
            ui.separator();

            ui.collapsing("Boid Parameters", |ui| {
                let params = scene.flock.params_mut();

                ui.label("Perception Radii");
                ui.add(
                    egui::Slider::new(&mut params.separation_radius, FlockParams::separation_radius_range())
                        .text("Separation Radius"),
                );
                ui.add(
                    egui::Slider::new(&mut params.alignment_radius, FlockParams::perception_radius_range())
                        .text("Alignment Radius"),
                );
                ui.add(
                    egui::Slider::new(&mut params.cohesion_radius, FlockParams::perception_radius_range())
                        .text("Cohesion Radius"),
                );

                ui.separator();
                ui.label("Force Weights");
                ui.add(egui::Slider::new(&mut params.separation_weight, FlockParams::weight_range()).text("Separation Weight"));
                ui.add(egui::Slider::new(&mut params.alignment_weight, FlockParams::weight_range()).text("Alignment Weight"));
                ui.add(egui::Slider::new(&mut params.cohesion_weight, FlockParams::weight_range()).text("Cohesion Weight"));

                ui.checkbox(&mut params.parallel, "Parallel Force Computation");

                if ui.button("Reset Parameters").clicked() {
                    params.reset();
                }
            });

            ui.separator();
            ui.label("Statistics");
            ui.label(format!("Active Boids: {}", scene.flock.len()));
            frame_stats(ui, info);
        });

    if scene.params_tracker.changed(scene.flock.params()) {
        scene.flock.params_mut().update_squared_radii();
        debug!(params = ?scene.flock.params(), "flocking parameters changed");
    }
}

/// Edits picked in the particle life panel, applied after it is drawn.
///
/// Indices refer to the clusters and rules as they were shown, so every
/// index-based edit runs before a cluster removal renumbers them.
#[derive(Debug, Default)]
pub(crate) struct ClusterEdits {
    recolor: Option<(usize, Color)>,
    resize: Option<(usize, usize)>,
    set_gravity: Option<(usize, f32)>,
    remove_rule: Option<usize>,
    remove_cluster: Option<usize>,
    add_cluster: bool,
    preset: Option<Preset>,
    random_rules: bool,
}

impl ClusterEdits {
    fn apply(self, system: &mut ClusterSystem) {
        if let Some((i, color)) = self.recolor {
            log_rejected(system.set_cluster_color(i, color));
        }
        if let Some((i, size)) = self.resize {
            log_rejected(system.resize_cluster(i, size));
        }
        if let Some((i, gravity)) = self.set_gravity {
            log_rejected(system.set_rule(i, gravity));
        }
        if let Some(i) = self.remove_rule {
            log_rejected(system.remove_rule(i));
        }
        if let Some(i) = self.remove_cluster {
            log_rejected(system.remove_cluster(i));
        }
        if self.add_cluster {
            system.add_random_cluster(100);
        }
        if let Some(preset) = self.preset {
            system.load_preset(preset);
        }
        if self.random_rules {
            system.generate_random_rules(-3.0, 3.0);
        }
    }
}

pub fn particle_life_panel(ctx: &egui::CtxRef, scene: &mut ParticleLifeScene, info: &DebugInfo, bounds: Bounds) {
    let mut edits = ClusterEdits::default();

    egui::Window::new("Particle Life Control")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.collapsing("Simulation", |ui| {
                ui.horizontal(|ui| {
                    if ui.button(pause_label(scene.paused)).clicked() {
                        scene.paused = !scene.paused;
                    }
                    if ui.button("Reset Positions").clicked() {
                        scene.system.set_screen_size(bounds);
                        scene.system.reset_positions();
                    }
                });

                ui.separator();
                let params = scene.system.params_mut();
                ui.add(egui::Slider::new(&mut params.max_distance, ClusterParams::max_distance_range()).text("Max Distance"));
                ui.add(egui::Slider::new(&mut params.particle_size, ClusterParams::particle_size_range()).text("Particle Size"));
                ui.checkbox(&mut scene.show_boundaries, "Show Boundaries");

                let mut boundary = scene.system.boundary();
                egui::ComboBox::from_label("Boundary")
                    .selected_text(boundary.label())
                    .show_ui(ui, |ui| {
                        for policy in BoundaryPolicy::ALL {
                            ui.selectable_value(&mut boundary, policy, policy.label());
                        }
                    });
                scene.system.set_boundary(boundary);
            });

            ui.collapsing("Clusters", |ui| {
                ui.label(format!("Total Particles: {}", scene.system.total_particles()));
                ui.separator();

                for (i, cluster) in scene.system.clusters().iter().enumerate() {
                    ui.horizontal(|ui| {
                        let mut rgb = cluster.color().to_array();
                        if ui.color_edit_button_srgb(&mut rgb).changed() {
                            edits.recolor = Some((i, Color::from_array(rgb)));
                        }

                        let mut size = cluster.len();
                        let slider = egui::Slider::new(&mut size, ClusterParams::cluster_size_range())
                            .text(format!("Cluster {}", i));
                        if ui.add(slider).changed() {
                            edits.resize = Some((i, size));
                        }

                        if ui.button("X").clicked() {
                            edits.remove_cluster = Some(i);
                        }
                    });
                }

                ui.separator();
                if ui.button("Add Cluster").clicked() {
                    edits.add_cluster = true;
                }
            });

            ui.collapsing("Rules", |ui| {
                ui.label(format!("Active Rules: {}", scene.system.rule_count()));
                ui.separator();

                for (i, rule) in scene.system.rules().iter().enumerate() {
                    ui.horizontal(|ui| {
                        ui.label(format!("C{} -> C{}:", rule.source, rule.target));
                        let mut gravity = rule.gravity;
                        if ui.add(egui::Slider::new(&mut gravity, ClusterParams::gravity_range())).changed() {
                            edits.set_gravity = Some((i, gravity));
                        }
                        if ui.button("Del").clicked() {
                            edits.remove_rule = Some(i);
                        }
                    });
                }

                ui.separator();
                ui.label("Add New Rule:");

                let cluster_count = scene.system.cluster_count();
                if cluster_count > 0 {
                    let last = cluster_count - 1;
                    let draft = &mut scene.draft;
                    draft.source = draft.source.min(last);
                    draft.target = draft.target.min(last);

                    ui.add(egui::Slider::new(&mut draft.source, 0..=last).text("From Cluster"));
                    ui.add(egui::Slider::new(&mut draft.target, 0..=last).text("To Cluster"));
                    ui.add(egui::Slider::new(&mut draft.gravity, ClusterParams::gravity_range()).text("Gravity"));

                    ui.horizontal(|ui| {
                        if ui.button("Add Rule").clicked() {
                            let draft = scene.draft;
                            scene.system.add_rule(draft.source, draft.target, draft.gravity);
                        }
                        if ui.button("Clear All Rules").clicked() {
                            scene.system.clear_rules();
                        }
                    });
                } else {
                    ui.label("(Add clusters first)");
                }
            });

            ui.collapsing("Presets", |ui| {
                for candidate in Preset::ALL {
                    if ui.button(candidate.label()).clicked() {
                        edits.preset = Some(candidate);
                    }
                }
                ui.separator();
                if ui.button("Random Rules").clicked() {
                    edits.random_rules = true;
                }
            });

            ui.collapsing("Statistics", |ui| {
                ui.label(format!("Clusters: {}", scene.system.cluster_count()));
                ui.label(format!("Total Particles: {}", scene.system.total_particles()));
                ui.label(format!("Rules: {}", scene.system.rule_count()));
                if let Some(near) = scene.particles_under_cursor() {
                    ui.label(format!("Particles near cursor: {}", near));
                }
                frame_stats(ui, info);
            });
        });

    egui::Window::new("Help")
        .default_pos([10.0, 700.0])
        .show(ctx, |ui| {
            ui.label("Particle Life - Controls");
            ui.separator();
            ui.label("• Gravity < 0: Repulsion");
            ui.label("• Gravity > 0: Attraction");
            ui.label("• Max Distance: Interaction range");
            ui.label("• Adjust cluster sizes in real-time");
            ui.label("• Add/remove rules dynamically");
        });

    // Apply structural edits now that nothing borrows the system
    scene.system.set_screen_size(bounds);
    edits.apply(&mut scene.system);
}

pub fn proximity_panel(ctx: &egui::CtxRef, scene: &mut ProximityScene, info: &DebugInfo, bounds: Bounds) {
    egui::Window::new("Particle KNN Control Panel")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label("Simulation Controls");
            ui.separator();

            let count = egui::Slider::new(&mut scene.wanderer_count, KnnParams::wanderer_count_range())
                .text("Number of Particles");
            let mut regenerate = ui.add(count).changed();

            ui.horizontal(|ui| {
                if ui.button("Regenerate").clicked() {
                    regenerate = true;
                }
                if ui.button(pause_label(scene.paused)).clicked() {
                    scene.paused = !scene.paused;
                }
            });

            if regenerate {
                scene.graph.generate(scene.wanderer_count, bounds);
            }

            ui.separator();
            ui.collapsing("KNN Parameters", |ui| {
                let params = scene.graph.params_mut();
                ui.label("Connection Settings");
                ui.add(
                    egui::Slider::new(&mut params.max_connections, KnnParams::max_connections_range())
                        .text("Max Connections per Particle"),
                );
                let distance = egui::Slider::new(&mut params.max_distance, KnnParams::max_distance_range())
                    .text("Max Connection Distance");
                if ui.add(distance).changed() {
                    params.update_squared();
                }

                ui.separator();
                ui.label(format!("Max Distance Sq: {:.0}", params.max_distance_sq()));
                if ui.button("Reset Parameters").clicked() {
                    params.reset();
                }
            });

            ui.separator();
            ui.label("Statistics");
            ui.label(format!("Active Particles: {}", scene.graph.len()));
            ui.label(format!("Active Connections: {}", scene.graph.connections().len()));
            frame_stats(ui, info);
        });
}
