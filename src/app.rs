/*
 * Application Module
 *
 * The nannou model and the per-frame loop. Each frame:
 * 1. Measure the frame time and clamp it into a simulation step
 * 2. Build the control panels for the active scene
 * 3. Advance the active scene by the clamped step
 * 4. Draw the scene, then the UI on top
 *
 * Exactly one scene is active at a time. Switching scenes shuts the old one
 * down before the new one starts.
 */

use std::sync::OnceLock;

use nannou::prelude::*;
use nannou_egui::Egui;
use tracing::{error, info};

use crate::config::{AppConfig, SceneKind};
use crate::debug::DebugInfo;
use crate::input;
use crate::physics::Bounds;
use crate::renderer;
use crate::scene::{self, Scene};
use crate::time::FrameClock;
use crate::ui;

// nannou builds the model from a plain fn, so startup config is handed over here
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Store the startup configuration. Only the first call has an effect.
pub fn install_config(config: AppConfig) {
    if CONFIG.set(config).is_err() {
        error!("configuration already installed, keeping the first one");
    }
}

pub struct Model {
    pub scene: Box<dyn Scene>,
    pub egui: Egui,
    pub clock: FrameClock,
    pub debug_info: DebugInfo,
    pub config: AppConfig,
    pub bounds: Bounds,
}

pub fn model(app: &App) -> Model {
    let config = CONFIG.get().cloned().unwrap_or_default();

    let window_id = app
        .new_window()
        .title(&config.title)
        .size(config.width, config.height)
        .view(view)
        .key_pressed(input::key_pressed)
        .mouse_moved(input::mouse_moved)
        .mouse_exited(input::mouse_exited)
        .raw_event(input::raw_window_event)
        .build()
        .expect("failed to create the main window");

    let window = app.window(window_id).expect("main window was just created");
    let egui = Egui::from_window(&window);

    let bounds = Bounds::new(config.width as f32, config.height as f32);
    let mut scene = scene::create(config.scene, &config, bounds);
    scene.start(bounds);

    info!(
        scene = config.scene.label(),
        seed = config.seed,
        width = config.width,
        height = config.height,
        "application initialized"
    );

    Model {
        scene,
        egui,
        clock: FrameClock::new(config.max_step),
        debug_info: DebugInfo::default(),
        config,
        bounds,
    }
}

/// Replace the active scene with a fresh one of `kind`.
pub fn switch_scene(model: &mut Model, kind: SceneKind) {
    if model.scene.kind() == kind {
        return;
    }

    model.scene.shutdown();
    let mut next = scene::create(kind, &model.config, model.bounds);
    next.start(model.bounds);
    model.scene = next;

    info!(scene = kind.label(), "switched scene");
}

pub fn update(app: &App, model: &mut Model, update: Update) {
    // A minimized window reports 0x0; keep simulating in the last real size
    let rect = app.window_rect();
    if rect.w() >= 1.0 && rect.h() >= 1.0 {
        model.bounds = Bounds::new(rect.w(), rect.h());
    }

    let dt = model.clock.advance(update.since_last);

    model.debug_info.fps = app.fps();
    model.debug_info.frame_time = update.since_last;
    model.debug_info.sim_step = dt;
    model.debug_info.frame_count = model.clock.frame_count();
    model.debug_info.paused = model.scene.paused();

    let requested = {
        let ctx = model.egui.begin_frame();
        model.scene.gui(&ctx, &model.debug_info, model.bounds);
        ui::scene_selector(&ctx, model.scene.kind(), &mut model.clock)
    };

    if let Some(kind) = requested {
        switch_scene(model, kind);
    }

    model.scene.update(dt, model.bounds);
}

pub fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    renderer::clear(&draw);
    model.scene.draw(&draw, model.bounds);

    if let Err(err) = draw.to_frame(app, &frame) {
        error!(?err, "failed to render scene");
    }
    if let Err(err) = model.egui.draw_to_frame(&frame) {
        error!(?err, "failed to render ui");
    }
}

pub fn exit(_app: &App, mut model: Model) {
    model.scene.shutdown();
    info!(frames = model.clock.frame_count(), "application exiting");
}
