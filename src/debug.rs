/*
 * Debug Information Module
 *
 * Frame statistics shown in the control panels:
 * - FPS (frames per second)
 * - Frame time and the clamped simulation step
 * - Whether the active scene is paused
 */

use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    pub fps: f32,
    pub frame_time: Duration,
    /// Delta handed to the simulation on the last frame.
    pub sim_step: f32,
    pub frame_count: u64,
    pub paused: bool,
}

impl DebugInfo {
    pub fn status(&self) -> &'static str {
        if self.paused {
            "PAUSED"
        } else {
            "RUNNING"
        }
    }

    pub fn frame_time_ms(&self) -> f64 {
        self.frame_time.as_secs_f64() * 1000.0
    }
}
