//! Host loop: the stand-in for a browser's timers and animation frames
//!
//! Each iteration samples the clock once, lets the app run due timer tasks
//! and its requested frame, then waits for the next display refresh.

use std::time::Duration;

use crate::app::{PlaygroundApp, PlaygroundError};
use crate::core::config::DisplayConfig;
use crate::foundation::time::Clock;
use crate::physics::PhysicsWorld;
use crate::scene::Renderer;

/// Cooperative single-threaded driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostLoop {
    frame_period: Duration,
    max_frames: Option<u64>,
}

impl HostLoop {
    /// Loop pacing frames at `refresh_rate_hz`, stopping after `max_frames` when set
    pub fn new(refresh_rate_hz: u32, max_frames: Option<u64>) -> Self {
        Self {
            frame_period: Duration::from_secs(1) / refresh_rate_hz.max(1),
            max_frames,
        }
    }

    /// Loop configured from the display section
    pub fn from_config(display: &DisplayConfig) -> Self {
        Self::new(display.refresh_rate_hz, display.max_frames)
    }

    /// Time between two frames
    pub fn frame_period(&self) -> Duration {
        self.frame_period
    }

    /// Drive `app` in real time; returns the number of frames rendered
    ///
    /// Runs until the frame limit is reached, forever when there is none.
    pub fn run<W: PhysicsWorld, R: Renderer>(&self, app: &mut PlaygroundApp<W, R>) -> Result<u64, PlaygroundError> {
        let clock = Clock::start();
        let mut frames = 0;
        log::info!("Host loop running at {:?} per frame", self.frame_period);

        loop {
            let now = clock.now();
            if app.pump(now)?.is_some() {
                frames += 1;
                if self.limit_reached(frames) {
                    break;
                }
            }
            let next = now + self.frame_period;
            std::thread::sleep(next.saturating_sub(clock.now()));
        }

        log::info!("Host loop finished after {} frames", frames);
        Ok(frames)
    }

    /// Drive `app` on a virtual clock advancing one frame period per iteration,
    /// for `iterations` iterations or until the frame limit
    pub fn run_simulated<W: PhysicsWorld, R: Renderer>(
        &self,
        app: &mut PlaygroundApp<W, R>,
        iterations: u32,
    ) -> Result<u64, PlaygroundError> {
        let mut frames = 0;
        for i in 0..iterations {
            if app.pump(self.frame_period * i)?.is_some() {
                frames += 1;
                if self.limit_reached(frames) {
                    break;
                }
            }
        }
        Ok(frames)
    }

    fn limit_reached(&self, frames: u64) -> bool {
        self.max_frames.is_some_and(|max| frames >= max)
    }
}
