//! Fixed-timestep clock
//!
//! Converts variable frame deltas into whole `SIM_DT` steps. A stopped clock
//! produces no steps, which is what keeps timers from firing after stop.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

#[derive(Debug, Clone, Default)]
pub struct SimulationClock {
    accumulator: f32,
    running: bool,
    /// Simulated seconds since the last start
    elapsed: f64,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
        self.accumulator = 0.0;
        self.elapsed = 0.0;
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Feed a frame delta; returns how many fixed steps to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop whatever the substep cap left behind instead of snowballing
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        substeps
    }

    /// Account for one step that actually ran
    pub fn record_tick(&mut self, dt: f32) {
        self.elapsed += dt as f64;
    }
}
