use std::time::Instant;

/// Elapsed and delta time for one frame, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock was created. Monotonic.
    pub elapsed: f32,
    /// Seconds since the previous `tick`. Zero on the first frame.
    pub delta: f32,
}

/// Wall-clock frame timer.
///
/// `elapsed` drives the portal and firefly time uniforms; `delta` drives
/// camera damping.
#[derive(Debug)]
pub struct FrameClock {
    start: Instant,
    previous_elapsed: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            previous_elapsed: 0.0,
        }
    }

    /// Seconds since construction without advancing the frame boundary.
    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Advance to the next frame, returning elapsed and delta time.
    pub fn tick(&mut self) -> FrameTime {
        let elapsed = self.elapsed();
        let delta = elapsed - self.previous_elapsed;
        self.previous_elapsed = elapsed;
        FrameTime { elapsed, delta }
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn elapsed_is_monotonic() {
        let clock = FrameClock::new();
        let a = clock.elapsed();
        std::thread::sleep(Duration::from_millis(5));
        let b = clock.elapsed();
        assert!(b > a);
    }

    #[test]
    fn tick_reports_positive_delta_after_delay() {
        let mut clock = FrameClock::new();
        clock.tick();
        std::thread::sleep(Duration::from_millis(5));
        let frame = clock.tick();
        assert!(frame.delta > 0.0);
        assert!(frame.elapsed >= frame.delta);
    }

    #[test]
    fn deltas_sum_to_elapsed() {
        let mut clock = FrameClock::new();
        let mut total = 0.0;
        for _ in 0..3 {
            std::thread::sleep(Duration::from_millis(2));
            total += clock.tick().delta;
        }
        assert!((total - clock.elapsed()).abs() < 0.05);
    }
}
