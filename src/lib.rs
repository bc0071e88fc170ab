//! AbbeyBell firmware library.
//!
//! Control firmware for a networked six-bell mechanical ringer. Four
//! tasks cooperate through two shared primitives:
//!
//! ```text
//! ┌───────────┐ link gate ┌───────────┐ callback ┌───────────┐
//! │   WiFi    │──────────▶│   MQTT    │─────────▶│ ingestion │
//! │ supervisor│           │  session  │          └─────┬─────┘
//! └───────────┘           └───────────┘                │ writes
//!       ▲ beat queue            ▲                ┌─────▼─────┐
//! ┌───────────┐                 │     reads      │ bell-call │
//! │ heartbeat │─────────────────┘   ┌────────────│   table   │
//! └───────────┘                     ▼            └───────────┘
//!                            ┌───────────┐
//!                            │  motion   │──▶ servo PWM bank
//!                            │  engine   │
//!                            └───────────┘
//! ```
//!
//! Pure-logic modules are exposed for integration testing; all
//! ESP-IDF-specific code is guarded by `#[cfg(target_os = "espidf")]`
//! within each adapter.

#![deny(unused_must_use)]

pub mod bells;
pub mod config;
pub mod heartbeat;
pub mod ingest;
pub mod link;
pub mod motion;
pub mod ports;
pub mod session;
pub mod sweep;

pub mod error;
mod pins;

pub mod adapters;
pub mod drivers;
