/*
 * Time Module
 *
 * Frame clock for the host loop. Elapsed wall-clock time is clamped to a
 * maximum step so a stall (window drag, breakpoint) does not hand the
 * integrators a huge delta.
 */

use std::time::Duration;

/// Largest delta handed to a simulation, in seconds.
pub const MAX_DELTA_TIME: f32 = 0.1;

/// Seconds in `elapsed`, capped at `max_step`.
pub fn clamp_delta(elapsed: Duration, max_step: f32) -> f32 {
    elapsed.as_secs_f32().min(max_step)
}

#[derive(Debug, Clone)]
pub struct FrameClock {
    max_step: f32,
    /// Multiplier applied to the clamped delta.
    pub time_scale: f32,
    unscaled_delta: f32,
    delta: f32,
    elapsed: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_DELTA_TIME)
    }
}

impl FrameClock {
    pub fn new(max_step: f32) -> Self {
        Self {
            max_step,
            time_scale: 1.0,
            unscaled_delta: 0.0,
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Advance by an externally measured interval.
    pub fn advance(&mut self, elapsed: Duration) -> f32 {
        self.unscaled_delta = clamp_delta(elapsed, self.max_step);
        self.delta = self.unscaled_delta * self.time_scale;
        self.elapsed += self.unscaled_delta;
        self.frame_count += 1;
        self.delta
    }

    pub fn unscaled_delta(&self) -> f32 {
        self.unscaled_delta
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn max_step(&self) -> f32 {
        self.max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stalls_are_clamped() {
        assert_eq!(clamp_delta(Duration::from_secs(3), MAX_DELTA_TIME), MAX_DELTA_TIME);
        let small = clamp_delta(Duration::from_millis(16), MAX_DELTA_TIME);
        assert!((small - 0.016).abs() < 1e-6);
    }

    #[test]
    fn advance_applies_scale_and_counts_frames() {
        let mut clock = FrameClock::default();
        clock.time_scale = 0.5;
        let dt = clock.advance(Duration::from_millis(500));
        assert!((dt - 0.05).abs() < 1e-6);
        assert!((clock.unscaled_delta() - 0.1).abs() < 1e-6);
        clock.advance(Duration::from_millis(20));
        assert_eq!(clock.frame_count(), 2);
        assert!((clock.elapsed() - 0.12).abs() < 1e-5);
    }
}
