//! Motion engine task.
//!
//! Continuously sweeps the bell table: every pass it evaluates each
//! bell with a pending call, drives the shared servo block to that
//! bell's current sweep position, and marks the bell handled once its
//! stroke has run out of laps. Handled bells cost nothing — they are
//! skipped without touching the actuator.
//!
//! The servo block is a single shared peripheral, so bells are driven
//! strictly one at a time within a pass and output is stopped globally
//! at the end of each pass. That serialization is a hardware-sharing
//! constraint of this board, not a requirement of the motion model —
//! an actuator with independent channels could hold all six positions
//! at once (the port keeps per-channel state for exactly that reason).

use std::time::Duration;

use log::{info, trace};

use crate::bells::{BELL_COUNT, BellTable};
use crate::config::MotionConfig;
use crate::ports::{ActuatorPort, Clock};
use crate::sweep::{self, SweepStep};

pub struct MotionEngine<'a, A: ActuatorPort, C: Clock> {
    bells: &'a BellTable,
    actuator: A,
    clock: C,
    cfg: &'a MotionConfig,
}

impl<'a, A: ActuatorPort, C: Clock> MotionEngine<'a, A, C> {
    pub fn new(bells: &'a BellTable, actuator: A, clock: C, cfg: &'a MotionConfig) -> Self {
        Self {
            bells,
            actuator,
            clock,
            cfg,
        }
    }

    /// Evaluate and drive every pending bell once, then stop the shared
    /// output. Elapsed time wraps with the tick counter (see
    /// [`crate::sweep`] for the auto-complete boundary behavior).
    pub fn pass(&mut self) {
        for bell in 0..BELL_COUNT {
            let Some(called_at) = self.bells.pending_since(bell) else {
                continue;
            };
            let now = self.clock.now_ticks();
            let elapsed = now.wrapping_sub(called_at);
            match sweep::step(&self.cfg.sweep, elapsed) {
                SweepStep::Drive { lap, position } => {
                    trace!("Bell {} lap {} servo position {}", bell + 1, lap, position);
                    self.actuator.drive(bell, self.cfg.pwm_hz, position);
                }
                SweepStep::Complete => {
                    // A call that arrived since `called_at` was read
                    // makes the exchange fail; the slot stays pending
                    // and the next pass picks the new stroke up.
                    if self.bells.mark_handled(bell, called_at) {
                        info!("Bell {} stopped at tick {}", bell + 1, now);
                    }
                }
            }
        }
        self.actuator.stop_all();
    }

    /// Run passes forever, yielding one slice between them.
    pub fn run(mut self) -> ! {
        let yield_between = Duration::from_millis(u64::from(self.cfg.pass_yield_ms));
        loop {
            self.pass();
            std::thread::sleep(yield_between);
        }
    }

    #[cfg(test)]
    fn actuator(&self) -> &A {
        &self.actuator
    }
}
