/*
 * Input Module
 *
 * Window event handlers:
 * - Space pauses or resumes the active scene
 * - R regenerates the active scene's population
 * - 1, 2 and 3 switch between scenes
 * - Cursor movement feeds the cursor inspection readout
 *
 * Keyboard and cursor events that egui wants are left to egui.
 */

use nannou::prelude::*;
use nannou::winit::event::WindowEvent;
use tracing::debug;

use crate::app::{self, Model};
use crate::config::SceneKind;
use crate::renderer;

fn scene_for_key(key: Key) -> Option<SceneKind> {
    match key {
        Key::Key1 => Some(SceneKind::Flocking),
        Key::Key2 => Some(SceneKind::ParticleLife),
        Key::Key3 => Some(SceneKind::Proximity),
        _ => None,
    }
}

pub fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    if model.egui.ctx().wants_keyboard_input() {
        return;
    }

    match key {
        Key::Space => {
            model.scene.toggle_pause();
            debug!(paused = model.scene.paused(), "pause toggled");
        }
        Key::R => model.scene.regenerate(model.bounds),
        other => {
            if let Some(kind) = scene_for_key(other) {
                app::switch_scene(model, kind);
            }
        }
    }
}

pub fn mouse_moved(_app: &App, model: &mut Model, pos: Point2) {
    let cursor = if model.egui.ctx().is_pointer_over_area() {
        None
    } else {
        Some(renderer::to_simulation(pos, model.bounds))
    };
    model.scene.set_cursor(cursor);
}

pub fn mouse_exited(_app: &App, model: &mut Model) {
    model.scene.set_cursor(None);
}

pub fn raw_window_event(_app: &App, model: &mut Model, event: &WindowEvent) {
    // Pass events to egui
    model.egui.handle_raw_event(event);
}
