//! Bell-stroke sweep math.
//!
//! A stroke is a triangle-wave position trajectory: the servo sweeps
//! from `start` to `start + range` (an even *lap*), back again (an odd
//! lap), and so on until `max_laps` half-cycles have elapsed, at which
//! point the stroke is complete.
//!
//! Positions are 16-bit PWM duty units on a 20 ms servo frame. With the
//! default constants one lap takes `range / velocity` ≈ 22 ticks
//! (~220 ms at 100 Hz), so a full stroke rings for about 1.3 s.
//!
//! ## Tick wraparound
//!
//! `elapsed` is produced by `u32` wrapping subtraction in the motion
//! engine. When the tick counter wraps, a pending call's elapsed time
//! jumps to an enormous value, `lap` blows straight past `max_laps`,
//! and the stroke auto-completes on the next pass. This is a known
//! boundary artifact of the unsigned math, kept deliberately — see
//! DESIGN.md.

use crate::bells::Tick;

/// Fixed sweep-motion constants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepParams {
    /// Duty value at the resting end of the sweep (~1 ms pulse region).
    pub start: u16,
    /// Sweep span in duty units.
    pub range: u16,
    /// Duty units advanced per tick.
    pub velocity: f32,
    /// Half-cycles before the stroke is complete.
    pub max_laps: u32,
}

impl SweepParams {
    pub const DEFAULT: Self = Self {
        start: 3400,
        range: 2900,
        velocity: 130.0,
        max_laps: 6,
    };
}

impl Default for SweepParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of evaluating one bell's sweep at a given elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// Drive the servo to `position` (currently in half-cycle `lap`).
    Drive { lap: u32, position: u16 },
    /// The stroke sequence has run its course.
    Complete,
}

/// Evaluate the sweep at `elapsed` ticks since the call was recorded.
pub fn step(params: &SweepParams, elapsed: Tick) -> SweepStep {
    let progress = elapsed as f32 * params.velocity;
    let lap = (progress / params.range as f32) as u32;
    if lap >= params.max_laps {
        return SweepStep::Complete;
    }
    // Truncate before the modulo, as the integer duty hardware does.
    let rest = (progress as u32 % params.range as u32) as u16;
    SweepStep::Drive {
        lap,
        position: position(params, lap, rest),
    }
}

/// Triangle-wave position for a given lap parity and in-lap offset.
/// Even laps sweep forward from `start`; odd laps sweep back from
/// `start + range`.
pub fn position(params: &SweepParams, lap: u32, rest: u16) -> u16 {
    if lap % 2 == 0 {
        params.start + rest
    } else {
        params.start + params.range - rest
    }
}
