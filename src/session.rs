//! Session manager — the broker reconnect state machine.
//!
//! ```text
//!   WaitLink ──▶ Connecting ──▶ Handshaking ──▶ Active
//!      ▲              │              │             │
//!      └──────────────┴──────────────┴─────────────┘
//!                  (any failure / session drop)
//! ```
//!
//! One task owns one [`SessionPort`]; at most one live session exists
//! at a time. The outer loop blocks on the link gate, dials the broker,
//! handshakes with the MAC-derived client id and non-clean-session
//! semantics, subscribes the control topic, discards any heartbeats
//! that went stale while disconnected, and then sits in the inner
//! publish/service loop until the session reports itself dead.
//!
//! Heartbeats are nominally QoS 1 but effectively best-effort: a failed
//! publish drops the frame and aborts that drain iteration rather than
//! retrying — the next beat is ten seconds away anyway.

use log::{info, warn};

use crate::config::BrokerConfig;
use crate::heartbeat::BeatQueue;
use crate::ingest::CommandIngestor;
use crate::link::LinkGate;
use crate::ports::{Clock, HandshakeOptions, Qos, ServiceOutcome, SessionPort};

pub struct SessionManager<'a, S: SessionPort, C: Clock> {
    port: S,
    gate: &'a LinkGate,
    queue: &'static BeatQueue,
    ingestor: CommandIngestor<'a, C>,
    cfg: &'a BrokerConfig,
    client_id: heapless::String<20>,
}

impl<'a, S: SessionPort, C: Clock> SessionManager<'a, S, C> {
    pub fn new(
        port: S,
        gate: &'a LinkGate,
        queue: &'static BeatQueue,
        ingestor: CommandIngestor<'a, C>,
        cfg: &'a BrokerConfig,
        client_id: &str,
    ) -> Self {
        let mut id = heapless::String::new();
        // Client ids are a fixed 16 characters ("ESP-" + 12 hex).
        let _ = id.push_str(client_id);
        Self {
            port,
            gate,
            queue,
            ingestor,
            cfg,
            client_id: id,
        }
    }

    pub fn run(mut self) -> ! {
        loop {
            self.cycle();
        }
    }

    /// One pass of the outer reconnect loop. Returns whenever the
    /// session ends for any reason; the caller re-enters `WaitLink`.
    pub fn cycle(&mut self) {
        // WaitLink — nothing is attempted until the supervisor says
        // the association is up.
        self.gate.wait_usable();

        // Connecting.
        info!(
            "MQTT: (re)connecting to server {}:{}",
            self.cfg.host, self.cfg.port
        );
        if let Err(e) = self.port.connect(self.cfg.host, self.cfg.port) {
            warn!("MQTT: {}", e);
            return;
        }

        // Handshaking.
        let opts = HandshakeOptions {
            client_id: self.client_id.as_str(),
            keep_alive_secs: self.cfg.keep_alive_secs,
            clean_session: false,
        };
        if let Err(e) = self.port.handshake(&opts) {
            warn!("MQTT: {}", e);
            self.port.disconnect();
            return;
        }
        info!("MQTT: session up as {}", self.client_id);

        if let Err(e) = self.port.subscribe(self.cfg.control_topic, Qos::AtLeastOnce) {
            warn!("MQTT: {}", e);
            self.port.disconnect();
            return;
        }

        // Beats queued while disconnected are stale — drop them so the
        // broker only ever sees fresh liveness.
        while self.queue.try_receive().is_ok() {}

        // Active.
        self.serve();

        warn!("MQTT: connection dropped, request restart");
        self.port.disconnect();
    }

    /// Inner publish/service loop; returns when the session dies.
    fn serve(&mut self) {
        loop {
            while let Ok(msg) = self.queue.try_receive() {
                if let Err(e) = self.port.publish(self.cfg.beat_topic, &msg, Qos::AtLeastOnce) {
                    // Frame already dequeued: dropped, not retried.
                    warn!("MQTT: error while publishing beat: {}", e);
                    break;
                }
            }

            let ingestor = &self.ingestor;
            let mut on_message =
                |topic: &str, payload: &[u8]| ingestor.on_message(topic, payload);
            if self.port.service(self.cfg.service_bound_ms, &mut on_message)
                == ServiceOutcome::Disconnected
            {
                return;
            }
        }
    }
}
