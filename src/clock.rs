//! Fixed-cadence tick source.
//!
//! Frame time from the host is accumulated and converted into a whole number
//! of ticks. A linear cycle of `cycle_duration` time units (milliseconds)
//! repeats forever on top of it.

use tracing::debug;

use crate::config::{self, FieldConfig};

pub struct AnimationClock {
    frame_dt: f32,
    max_frame_time: f32,
    cycle_duration: u32,
    accumulator: f32,
    cycle_elapsed: f32,
    cycles: u64,
    running: bool,
}

impl AnimationClock {
    pub fn new(frame_dt: f32, cycle_duration: u32) -> Self {
        let frame_dt = config::frame_dt(frame_dt);
        Self {
            frame_dt,
            max_frame_time: config::MAX_FRAME_TIME.max(frame_dt),
            cycle_duration: cycle_duration.max(1),
            accumulator: 0.0,
            cycle_elapsed: 0.0,
            cycles: 0,
            running: false,
        }
    }

    pub fn from_config(cfg: &FieldConfig) -> Self {
        Self::new(cfg.frame_dt, cfg.cycle_duration)
    }

    /// Start ticking. Starting a running clock does nothing.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        debug!(frame_dt = self.frame_dt, cycle = self.cycle_duration, "clock started");
    }

    /// Stop and rewind. Cancelling a stopped clock does nothing.
    pub fn cancel(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.accumulator = 0.0;
        self.cycle_elapsed = 0.0;
        self.cycles = 0;
        debug!("clock cancelled");
    }

    pub fn restart(&mut self) {
        self.cancel();
        self.start();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Feed elapsed host time in seconds; returns how many ticks are due,
    /// at most `MAX_TICKS_PER_ADVANCE`.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        if !self.running || !frame_time.is_finite() {
            return 0;
        }
        self.accumulator += frame_time.clamp(0.0, self.max_frame_time);

        let whole = (self.accumulator / self.frame_dt).floor();
        let due = if whole >= config::MAX_TICKS_PER_ADVANCE as f32 {
            // Backlog beyond the cap is dropped.
            self.accumulator = 0.0;
            config::MAX_TICKS_PER_ADVANCE
        } else {
            let due = whole as u32;
            self.accumulator = (self.accumulator - due as f32 * self.frame_dt).max(0.0);
            due
        };
        for _ in 0..due {
            self.step_cycle();
        }
        due
    }

    /// Current position in the cycle, `0..cycle_duration`.
    pub fn value(&self) -> u32 {
        (self.cycle_elapsed as u32).min(self.cycle_duration - 1)
    }

    /// Completed cycles since the last start.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    fn step_cycle(&mut self) {
        let duration = self.cycle_duration as f32;
        self.cycle_elapsed += self.frame_dt * 1000.0;
        while self.cycle_elapsed >= duration {
            self.cycle_elapsed -= duration;
            self.cycles += 1;
        }
    }
}
