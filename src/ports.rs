//! Port traits — the hexagonal boundary between the control tasks and
//! the platform.
//!
//! ```text
//!   Adapter / driver ──▶ Port trait ──▶ task (domain)
//! ```
//!
//! The network association driver, the MQTT client library and the PWM
//! servo block are external collaborators; the tasks consume them only
//! through these traits, so everything above this line runs unchanged
//! on the host for tests.

use crate::bells::Tick;
use crate::error::{LinkError, SessionError};

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic scheduler-tick source.
pub trait Clock {
    fn now_ticks(&self) -> Tick;
}

// ───────────────────────────────────────────────────────────────
// Station port (network association driver)
// ───────────────────────────────────────────────────────────────

/// Association state as seen by the connectivity supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationStatus {
    /// Association in progress — keep polling.
    Connecting,
    /// Terminal: passphrase rejected by the AP.
    WrongPassphrase,
    /// Terminal: configured AP not found.
    ApNotFound,
    /// Terminal: association failed.
    ConnectFailed,
    /// Associated and holding an address — the link is usable.
    GotIp,
}

/// Driver boundary for the WiFi station. Connect/disconnect primitives
/// and status polling only; retry policy lives in the supervisor.
pub trait StationPort {
    /// Configure station mode for the given access point and start
    /// associating.
    fn configure(&mut self, ssid: &str, passphrase: &str) -> Result<(), LinkError>;

    /// Poll the current association status.
    fn status(&mut self) -> StationStatus;

    /// Force a disassociation. Safe to call when already down.
    fn disassociate(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Session port (publish/subscribe client)
// ───────────────────────────────────────────────────────────────

/// MQTT delivery guarantee for subscribe/publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Qos {
    AtMostOnce = 0,
    AtLeastOnce = 1,
}

/// Session handshake parameters. No credentials: the broker is on a
/// trusted private segment (authentication is an explicit non-goal).
#[derive(Debug, Clone, Copy)]
pub struct HandshakeOptions<'a> {
    pub client_id: &'a str,
    pub keep_alive_secs: u16,
    /// `false` asks the broker to retain subscription state across
    /// reconnects.
    pub clean_session: bool,
}

/// Result of one bounded service call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOutcome {
    /// Session alive; inbound traffic and keep-alive were serviced.
    Serviced,
    /// The session reports itself dead — tear down and reconnect.
    Disconnected,
}

/// Broker client boundary. One implementor instance backs at most one
/// live session: `connect` brings up a fresh transport, `disconnect`
/// destroys it, and the session manager never overlaps the two.
pub trait SessionPort {
    /// Open the transport connection to the broker.
    fn connect(&mut self, host: &str, port: u16) -> Result<(), SessionError>;

    /// Perform the session handshake over an open transport.
    fn handshake(&mut self, opts: &HandshakeOptions<'_>) -> Result<(), SessionError>;

    /// Subscribe to a control topic. Inbound messages surface through
    /// the `on_message` callback passed to [`service`](Self::service).
    fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<(), SessionError>;

    /// Publish one message.
    fn publish(&mut self, topic: &str, payload: &[u8], qos: Qos) -> Result<(), SessionError>;

    /// Service inbound traffic and keep-alive for at most `bound_ms`,
    /// invoking `on_message(topic, payload)` for each arrival. The
    /// bound doubles as the dead-session detection interval.
    fn service(
        &mut self,
        bound_ms: u32,
        on_message: &mut dyn FnMut(&str, &[u8]),
    ) -> ServiceOutcome;

    /// Tear down the transport. Safe to call when already down.
    fn disconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Actuator port (PWM servo block)
// ───────────────────────────────────────────────────────────────

/// Driver boundary for the shared servo PWM block. The signal
/// generation behind it is out of scope; the motion engine only selects
/// a channel, a frequency and a duty position, and starts/stops output.
pub trait ActuatorPort {
    /// (Re)configure the output for `channel` and start driving
    /// `position` (duty units) at `freq_hz`.
    fn drive(&mut self, channel: usize, freq_hz: u32, position: u16);

    /// Stop all PWM output. Called at the end of every motion pass.
    fn stop_all(&mut self);
}
