//! Time management utilities

use std::time::{Duration, Instant};

/// Monotonic clock measuring time since its creation
///
/// The host loop samples this once per iteration and hands the value to the
/// scheduler and the frame tick, so everything inside one iteration agrees on
/// "now".
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    /// Start a new clock
    pub fn start() -> Self {
        Self { origin: Instant::now() }
    }

    /// Time elapsed since the clock was started
    pub fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::start()
    }
}

/// Frame timer fed with timestamps from the host
pub struct Timer {
    last_frame: Option<Duration>,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: None,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    ///
    /// The first update reports a zero delta. A timestamp older than the
    /// previous one is treated as no time passing.
    pub fn update(&mut self, now: Duration) {
        self.delta_time = self
            .last_frame
            .map_or(0.0, |last| now.saturating_sub(last).as_secs_f32());
        self.total_time += self.delta_time;
        self.last_frame = Some(now.max(self.last_frame.unwrap_or_default()));
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since the first update
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

/// Fixed-timestep accumulator with a bounded number of catch-up steps
///
/// Real frame time is accumulated and converted into whole simulation steps
/// of `step` seconds, at most `max_sub_steps` per call. Whatever remains after
/// the cap is folded back below one step.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_sub_steps: u32,
    accumulator: f32,
}

impl FixedTimestep {
    /// Create an accumulator for the given step size and sub-step cap
    pub fn new(step: f32, max_sub_steps: u32) -> Self {
        Self {
            step,
            max_sub_steps,
            accumulator: 0.0,
        }
    }

    /// Add `delta_time` seconds and return how many fixed steps to run now
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        self.accumulator += delta_time.max(0.0);

        let mut sub_steps = 0;
        while self.accumulator >= self.step && sub_steps < self.max_sub_steps {
            self.accumulator -= self.step;
            sub_steps += 1;
        }
        self.accumulator %= self.step;

        sub_steps
    }

    /// Fixed step size in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Unconsumed time, always below one step
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }
}
