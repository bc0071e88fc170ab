//! Error types for the bell-tower firmware.
//!
//! Every failure here is transient: the owning task logs it and loops
//! back into its retry path; there is no fatal path once the tasks are
//! running. The enums exist so port implementations and tests can say
//! which stage failed, not to propagate anything out of a task.
//! Bootstrap failures in `main` go through `anyhow` instead.

use core::fmt;

// ───────────────────────────────────────────────────────────────
// Connectivity errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// SSID rejected by the station driver (empty or over 32 bytes).
    InvalidSsid,
    /// Passphrase rejected by the station driver.
    InvalidPassphrase,
    /// The underlying WiFi driver refused the configuration.
    DriverFault,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 bytes)"),
            Self::InvalidPassphrase => write!(f, "passphrase invalid"),
            Self::DriverFault => write!(f, "station driver fault"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Session errors
// ───────────────────────────────────────────────────────────────

/// Stage-tagged session failures. Each maps to one arm of the session
/// manager's reconnect state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// TCP connect to the broker failed.
    Transport,
    /// MQTT CONNECT was refused or timed out.
    Handshake,
    /// SUBSCRIBE to the control topic failed.
    Subscribe,
    /// PUBLISH failed mid-session.
    Publish,
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport connect failed"),
            Self::Handshake => write!(f, "handshake refused"),
            Self::Subscribe => write!(f, "subscribe failed"),
            Self::Publish => write!(f, "publish failed"),
        }
    }
}
