//! Frame clock

use std::time::Instant;

/// Longest wall-clock frame `tick` will report
const MAX_FRAME_TIME: f64 = 0.25;

/// Tracks elapsed time for the river animation
pub struct FrameClock {
    /// Total elapsed time in seconds
    pub total_time: f64,
    /// Time since last frame in seconds
    pub delta_time: f64,
    /// Number of frames advanced so far
    pub frame: u64,
    last_instant: Instant,
    first_tick: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self {
            total_time: 0.0,
            delta_time: 0.0,
            frame: 0,
            last_instant: Instant::now(),
            first_tick: true,
        }
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance from the wall clock. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();

        if self.first_tick {
            self.first_tick = false;
            self.last_instant = now;
            self.delta_time = 0.0;
            self.frame += 1;
            return;
        }

        let elapsed = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(elapsed.min(MAX_FRAME_TIME));
    }

    /// Advance by exactly `dt` seconds. Negative steps count as zero.
    ///
    /// Unlike [`tick`](Self::tick) this is not capped: callers that drive
    /// other state with the same `dt` stay in step with the clock.
    pub fn advance(&mut self, dt: f64) {
        self.delta_time = dt.max(0.0);
        self.total_time += self.delta_time;
        self.frame += 1;
    }

    /// Elapsed time as the shader-facing `f32`
    pub fn elapsed(&self) -> f32 {
        self.total_time as f32
    }

    pub fn delta(&self) -> f32 {
        self.delta_time as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_defaults() {
        let clock = FrameClock::new();
        assert_eq!(clock.total_time, 0.0);
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame, 0);
    }

    #[test]
    fn test_first_tick_zero_delta() {
        let mut clock = FrameClock::new();
        clock.tick();
        assert_eq!(clock.delta_time, 0.0);
        assert_eq!(clock.frame, 1);
    }

    #[test]
    fn test_manual_advance_accumulates() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.total_time - 0.75).abs() < 1e-12);
        assert!((clock.delta() - 0.25).abs() < 1e-6);
        assert_eq!(clock.frame, 2);
    }

    #[test]
    fn test_long_fixed_steps_are_not_capped() {
        let mut clock = FrameClock::new();
        clock.advance(3.0);
        assert!((clock.delta_time - 3.0).abs() < 1e-12);
        assert!((clock.total_time - 3.0).abs() < 1e-12);
        clock.advance(-1.0);
        assert_eq!(clock.delta_time, 0.0);
        assert!((clock.total_time - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_stalled_tick_is_capped() {
        let mut clock = FrameClock::new();
        clock.tick();
        clock.last_instant -= std::time::Duration::from_secs(2);
        clock.tick();
        assert!((clock.delta_time - MAX_FRAME_TIME).abs() < 1e-12);
        assert_eq!(clock.frame, 2);
    }
}
