//! Integration tests: control message → session callback → bell-call
//! table → motion engine → actuator, all against the host simulation
//! adapters and mock ports.

use std::cell::Cell;
use std::rc::Rc;

use abbeybell::adapters::mqtt::{MqttAdapter, ServiceScript};
use abbeybell::bells::{BELL_COUNT, BellTable, Tick};
use abbeybell::config::{BrokerConfig, MotionConfig};
use abbeybell::heartbeat::BeatQueue;
use abbeybell::ingest::CommandIngestor;
use abbeybell::link::LinkGate;
use abbeybell::motion::MotionEngine;
use abbeybell::ports::{ActuatorPort, Clock};
use abbeybell::session::SessionManager;
use abbeybell::sweep::SweepParams;

// ── Mock ports ────────────────────────────────────────────────

#[derive(Clone)]
struct TestClock(Rc<Cell<Tick>>);

impl TestClock {
    fn new(t: Tick) -> Self {
        Self(Rc::new(Cell::new(t)))
    }
    fn set(&self, t: Tick) {
        self.0.set(t);
    }
}

impl Clock for TestClock {
    fn now_ticks(&self) -> Tick {
        self.0.get()
    }
}

// The engine takes the actuator by value, so the record is shared out
// through a clonable handle.
#[derive(Default, Clone)]
struct RecordingActuator {
    drives: Rc<std::cell::RefCell<Vec<(usize, u16)>>>,
}

impl RecordingActuator {
    fn drives(&self) -> Vec<(usize, u16)> {
        self.drives.borrow().clone()
    }
}

impl ActuatorPort for RecordingActuator {
    fn drive(&mut self, channel: usize, _freq_hz: u32, position: u16) {
        self.drives.borrow_mut().push((channel, position));
    }
    fn stop_all(&mut self) {}
}

fn broker_cfg() -> BrokerConfig {
    BrokerConfig {
        host: "broker.test",
        port: 1883,
        keep_alive_secs: 10,
        control_topic: "/bell",
        beat_topic: "/beat",
        service_bound_ms: 1000,
    }
}

fn motion_cfg() -> MotionConfig {
    MotionConfig {
        pwm_hz: 50,
        pass_yield_ms: 0,
        sweep: SweepParams::DEFAULT,
    }
}

// ── Tests ─────────────────────────────────────────────────────

#[test]
fn control_message_rings_a_bell_end_to_end() {
    static Q: BeatQueue = BeatQueue::new();
    let bells = BellTable::new();
    let gate = LinkGate::new();
    let clock = TestClock::new(500);
    let cfg = broker_cfg();

    let mut adapter = MqttAdapter::new();
    adapter.script_service(ServiceScript::delivering("/bell", b"3"));

    let ingestor = CommandIngestor::new(&bells, clock.clone());
    let mut mgr = SessionManager::new(adapter, &gate, &Q, ingestor, &cfg, "ESP-DEADBEEFCAFE");

    gate.raise();
    mgr.cycle(); // delivers the command, then the scripted session dies

    assert!(!bells.is_handled(2));
    assert_eq!(bells.called_at(2), 500);
    for b in (0..BELL_COUNT).filter(|&b| b != 2) {
        assert!(bells.is_handled(b));
    }

    // The motion engine picks the call up and sweeps it to completion.
    let mcfg = motion_cfg();
    let mut engine = MotionEngine::new(&bells, RecordingActuator::default(), clock.clone(), &mcfg);

    clock.set(501);
    engine.pass();
    clock.set(510);
    engine.pass();
    clock.set(500 + 200); // stroke exhausted well before 200 ticks
    engine.pass();

    assert!(bells.is_handled(2));
}

#[test]
fn ring_all_command_sweeps_every_bell() {
    static Q: BeatQueue = BeatQueue::new();
    let bells = BellTable::new();
    let gate = LinkGate::new();
    let clock = TestClock::new(100);
    let cfg = broker_cfg();

    let mut adapter = MqttAdapter::new();
    adapter.script_service(ServiceScript::delivering("/bell", b"0"));

    let ingestor = CommandIngestor::new(&bells, clock.clone());
    let mut mgr = SessionManager::new(adapter, &gate, &Q, ingestor, &cfg, "ESP-DEADBEEFCAFE");

    gate.raise();
    mgr.cycle();

    assert_eq!(bells.pending(), BELL_COUNT);

    let mcfg = motion_cfg();
    let actuator = RecordingActuator::default();
    let mut engine = MotionEngine::new(&bells, actuator.clone(), clock.clone(), &mcfg);
    clock.set(101);
    engine.pass();

    // One drive per bell, serialized in channel order, same position
    // since every call carries the same tick.
    let drives = actuator.drives();
    let channels: Vec<usize> = drives.iter().map(|d| d.0).collect();
    assert_eq!(channels, vec![0, 1, 2, 3, 4, 5]);
    assert!(drives.iter().all(|&(_, pos)| pos == 3530));
}

#[test]
fn garbage_commands_leave_the_tower_silent() {
    static Q: BeatQueue = BeatQueue::new();
    let bells = BellTable::new();
    let gate = LinkGate::new();
    let cfg = broker_cfg();

    let mut adapter = MqttAdapter::new();
    for payload in [b"7".as_slice(), b"-1", b"abc", b""] {
        adapter.script_service(ServiceScript::delivering("/bell", payload));
    }

    let ingestor = CommandIngestor::new(&bells, TestClock::new(1));
    let mut mgr = SessionManager::new(adapter, &gate, &Q, ingestor, &cfg, "ESP-DEADBEEFCAFE");

    gate.raise();
    mgr.cycle();

    assert_eq!(bells.pending(), 0);
}

#[test]
fn new_call_mid_stroke_restarts_the_sweep_clock() {
    let bells = BellTable::new();
    let clock = TestClock::new(0);
    let mcfg = motion_cfg();
    let mut engine = MotionEngine::new(&bells, RecordingActuator::default(), clock.clone(), &mcfg);

    bells.call(0, 0);
    clock.set(100); // deep into the stroke (lap 4)
    engine.pass();
    assert!(!bells.is_handled(0));

    // A fresh call overwrites the record and restarts the sweep.
    bells.call(0, 100);
    clock.set(110);
    engine.pass();
    assert!(!bells.is_handled(0));

    // Completion now happens 134 ticks after the *second* call.
    clock.set(100 + 134);
    engine.pass();
    assert!(bells.is_handled(0));
}
