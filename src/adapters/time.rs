//! Monotonic tick clock.
//!
//! Scales the platform's monotonic microsecond timer down to 100 Hz
//! scheduler ticks, truncated to `u32` so the counter wraps naturally
//! (roughly every 500 days of uptime — the sweep math treats a wrapped
//! elapsed value as an instantly-completed stroke).
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()`.
//! - **everywhere else** — `std::time::Instant` since construction.

use crate::bells::Tick;
use crate::ports::Clock;

/// Ticks per second.
pub const TICK_HZ: u32 = 100;

const US_PER_TICK: u64 = 1_000_000 / TICK_HZ as u64;

pub struct TickClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl TickClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    fn uptime_us(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    #[cfg(not(target_os = "espidf"))]
    fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickClock {
    fn now_ticks(&self) -> Tick {
        (self.uptime_us() / US_PER_TICK) as Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_are_monotonic_over_a_short_wait() {
        let clock = TickClock::new();
        let a = clock.now_ticks();
        std::thread::sleep(std::time::Duration::from_millis(25));
        let b = clock.now_ticks();
        assert!(b >= a + 2, "expected >= 2 ticks across 25 ms, got {} → {}", a, b);
    }

    #[test]
    fn fresh_clock_starts_near_zero() {
        let clock = TickClock::new();
        assert!(clock.now_ticks() < TICK_HZ); // well under a second old
    }
}
