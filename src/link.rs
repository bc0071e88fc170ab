//! Connectivity supervisor and the link-usable gate.
//!
//! The supervisor owns the WiFi association lifecycle: it polls the
//! station driver with a fixed interval and a bounded retry budget,
//! and while the association holds an address it raises the
//! [`LinkGate`] once per scheduling slice. The session task blocks on
//! the gate before every transport attempt, so nothing upstream ever
//! dials without a usable link.
//!
//! Retry policy is fixed-interval, no exponential backoff: the device
//! shares one AP with nothing else and a steady 1 s cadence recovers
//! promptly.

use std::time::Duration;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{error, info, warn};

use crate::config::NetworkConfig;
use crate::ports::{StationPort, StationStatus};

// ───────────────────────────────────────────────────────────────
// Link gate
// ───────────────────────────────────────────────────────────────

/// Single-slot "link usable" readiness gate.
///
/// Raising an already-raised gate is a harmless no-op for the waiter;
/// the gate is never torn down, only left unraised while the link is
/// down.
pub struct LinkGate {
    inner: Signal<CriticalSectionRawMutex, ()>,
}

impl LinkGate {
    pub const fn new() -> Self {
        Self {
            inner: Signal::new(),
        }
    }

    /// Signal that the link is currently usable.
    pub fn raise(&self) {
        self.inner.signal(());
    }

    /// Block until the link is usable, consuming the signal.
    pub fn wait_usable(&self) {
        futures_lite::future::block_on(self.inner.wait());
    }

    /// Non-consuming peek, for tests and diagnostics.
    pub fn is_raised(&self) -> bool {
        self.inner.signaled()
    }
}

impl Default for LinkGate {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Supervisor
// ───────────────────────────────────────────────────────────────

pub struct ConnectivitySupervisor<'a, S: StationPort> {
    station: S,
    gate: &'a LinkGate,
    cfg: &'a NetworkConfig,
}

impl<'a, S: StationPort> ConnectivitySupervisor<'a, S> {
    pub fn new(station: S, gate: &'a LinkGate, cfg: &'a NetworkConfig) -> Self {
        Self { station, gate, cfg }
    }

    /// Run the association lifecycle forever.
    pub fn run(mut self) -> ! {
        info!("WiFi: connecting to WiFi");
        while let Err(e) = self
            .station
            .configure(self.cfg.ssid, self.cfg.passphrase)
        {
            error!("WiFi: station config rejected: {}", e);
            sleep_ms(self.cfg.redial_delay_ms);
        }
        loop {
            self.cycle();
        }
    }

    /// One full supervisor iteration: associate, hold the gate up while
    /// the link lasts, then tear down and pause before redialing.
    pub fn cycle(&mut self) {
        if self.await_association() {
            info!("WiFi: Connected");
            while self.station.status() == StationStatus::GotIp {
                self.gate.raise();
                sleep_ms(self.cfg.link_slice_ms);
            }
            warn!("WiFi: disconnected");
        }
        self.station.disassociate();
        sleep_ms(self.cfg.redial_delay_ms);
    }

    /// Poll the station until it holds an address, a terminal status
    /// appears, or the retry budget runs out. The budget is fresh on
    /// every call.
    fn await_association(&mut self) -> bool {
        let mut retries = self.cfg.retry_limit;
        loop {
            match self.station.status() {
                StationStatus::GotIp => return true,
                StationStatus::WrongPassphrase => {
                    error!("WiFi: wrong passphrase");
                    return false;
                }
                StationStatus::ApNotFound => {
                    error!("WiFi: AP not found");
                    return false;
                }
                StationStatus::ConnectFailed => {
                    error!("WiFi: connection failed");
                    return false;
                }
                StationStatus::Connecting => {
                    if retries == 0 {
                        warn!("WiFi: association attempt timed out");
                        return false;
                    }
                    retries -= 1;
                    sleep_ms(self.cfg.poll_interval_ms);
                }
            }
        }
    }
}

fn sleep_ms(ms: u32) {
    if ms > 0 {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}
