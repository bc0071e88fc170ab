//! System configuration parameters.
//!
//! Everything is fixed at build time: there is no config file, no NVS,
//! and no runtime reconfiguration surface. WiFi credentials and the
//! broker address can be overridden through compile-time environment
//! variables (`ABBEYBELL_WIFI_SSID`, `ABBEYBELL_WIFI_PASS`,
//! `ABBEYBELL_BROKER_HOST`); everything else is a constant chosen for
//! the tower hardware.

use crate::sweep::SweepParams;

const fn env_or(value: Option<&'static str>, default: &'static str) -> &'static str {
    match value {
        Some(v) => v,
        None => default,
    }
}

/// Access point credentials and supervisor retry timing.
#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    pub ssid: &'static str,
    pub passphrase: &'static str,
    /// Association status polls before the attempt is abandoned.
    pub retry_limit: u32,
    /// Delay between association status polls (milliseconds).
    pub poll_interval_ms: u32,
    /// Delay before restarting after a drop or failed attempt.
    pub redial_delay_ms: u32,
    /// Scheduling slice between link-gate raises while associated.
    pub link_slice_ms: u32,
}

/// Broker endpoint and session timing.
#[derive(Debug, Clone, Copy)]
pub struct BrokerConfig {
    pub host: &'static str,
    pub port: u16,
    pub keep_alive_secs: u16,
    /// Inbound ring-command topic (QoS 1 subscription).
    pub control_topic: &'static str,
    /// Outbound liveness topic.
    pub beat_topic: &'static str,
    /// Bounded wait per session-service call; also the dead-session
    /// detection interval.
    pub service_bound_ms: u32,
}

/// Motion engine timing and sweep constants.
#[derive(Debug, Clone, Copy)]
pub struct MotionConfig {
    /// Servo signal frequency (standard 20 ms frame).
    pub pwm_hz: u32,
    /// Yield between full passes over the bell table.
    pub pass_yield_ms: u32,
    pub sweep: SweepParams,
}

/// Top-level build-time configuration.
#[derive(Debug, Clone, Copy)]
pub struct TowerConfig {
    pub network: NetworkConfig,
    pub broker: BrokerConfig,
    pub motion: MotionConfig,
    /// Heartbeat cadence (milliseconds).
    pub heartbeat_interval_ms: u32,
}

impl TowerConfig {
    pub const DEFAULT: Self = Self {
        network: NetworkConfig {
            ssid: env_or(option_env!("ABBEYBELL_WIFI_SSID"), "abbey-tower"),
            passphrase: env_or(option_env!("ABBEYBELL_WIFI_PASS"), "carillon-wpa2"),
            retry_limit: 30,
            poll_interval_ms: 1000,
            redial_delay_ms: 1000,
            link_slice_ms: 100,
        },
        broker: BrokerConfig {
            host: env_or(option_env!("ABBEYBELL_BROKER_HOST"), "192.168.0.186"),
            port: 1883,
            keep_alive_secs: 10,
            control_topic: "/bell",
            beat_topic: "/beat",
            service_bound_ms: 1000,
        },
        motion: MotionConfig {
            pwm_hz: 50,
            pass_yield_ms: 10,
            sweep: SweepParams::DEFAULT,
        },
        heartbeat_interval_ms: 10_000,
    };
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
