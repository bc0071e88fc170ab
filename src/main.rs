//! AbbeyBell firmware — main entry point.
//!
//! Bootstraps the platform, derives the device identity, and spawns
//! the four tasks (WiFi supervisor, heartbeat producer, MQTT session
//! manager, motion engine) as named threads — FreeRTOS tasks under
//! ESP-IDF's pthread layer. The shared state they coordinate through
//! (bell-call table, link gate, beat queue) lives in statics so every
//! task borrows it at `'static`.

use anyhow::Result;
use log::info;
use std::thread;

use abbeybell::adapters::device_id;
use abbeybell::adapters::mqtt::MqttAdapter;
use abbeybell::adapters::station::StationAdapter;
use abbeybell::adapters::time::TickClock;
use abbeybell::bells::BellTable;
use abbeybell::config::TowerConfig;
use abbeybell::drivers::servo::ServoBank;
use abbeybell::heartbeat::{BEAT_QUEUE, HeartbeatProducer};
use abbeybell::ingest::CommandIngestor;
use abbeybell::link::{ConnectivitySupervisor, LinkGate};
use abbeybell::motion::MotionEngine;
use abbeybell::session::SessionManager;

static BELLS: BellTable = BellTable::new();
static GATE: LinkGate = LinkGate::new();
static CONFIG: TowerConfig = TowerConfig::DEFAULT;

fn main() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("AbbeyBell v{}", env!("CARGO_PKG_VERSION"));

    let mac = device_id::read_mac();
    let client_id = device_id::client_id(&mac);
    info!("Client ID: {}", client_id);

    let wifi = thread::Builder::new()
        .name("wifi_task".into())
        .stack_size(4096)
        .spawn(|| {
            ConnectivitySupervisor::new(StationAdapter::new(), &GATE, &CONFIG.network).run()
        })?;

    let beat = thread::Builder::new()
        .name("beat_task".into())
        .stack_size(4096)
        .spawn(|| HeartbeatProducer::new().run(&BEAT_QUEUE, CONFIG.heartbeat_interval_ms))?;

    let mqtt = thread::Builder::new()
        .name("mqtt_task".into())
        .stack_size(8192)
        .spawn(move || {
            let ingestor = CommandIngestor::new(&BELLS, TickClock::new());
            SessionManager::new(
                MqttAdapter::new(),
                &GATE,
                &BEAT_QUEUE,
                ingestor,
                &CONFIG.broker,
                client_id.as_str(),
            )
            .run()
        })?;

    let servo = thread::Builder::new()
        .name("servo_task".into())
        .stack_size(8192)
        .spawn(|| {
            MotionEngine::new(&BELLS, ServoBank::new(), TickClock::new(), &CONFIG.motion).run()
        })?;

    // The tasks run until power loss; joining keeps main parked.
    for handle in [wifi, beat, mqtt, servo] {
        let _ = handle.join();
    }
    unreachable!("tasks never exit");
}
