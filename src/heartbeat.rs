//! Heartbeat producer task.
//!
//! Every fixed interval, formats a liveness frame `"Beat <n>\n"` (NUL
//! padded to a fixed 16-byte width) with a monotonically increasing
//! counter and tries a non-blocking enqueue into the bounded beat
//! queue. The session task drains the queue and publishes each frame;
//! if the queue is full — the session has been down for a while — the
//! frame is logged as an overflow and dropped. The cadence never
//! stalls on backpressure.

use core::fmt::Write;
use std::time::{Duration, Instant};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::warn;

/// Fixed beat frame width (text + NUL padding).
pub const BEAT_MSG_LEN: usize = 16;

/// Queue depth: a handful of beats bounds memory while the session is
/// reconnecting; anything older is stale anyway.
pub const BEAT_QUEUE_DEPTH: usize = 3;

/// One fixed-width heartbeat frame.
pub type BeatMsg = heapless::Vec<u8, BEAT_MSG_LEN>;

/// Bounded producer → session queue. Drop-on-full, never blocking.
pub type BeatQueue = Channel<CriticalSectionRawMutex, BeatMsg, BEAT_QUEUE_DEPTH>;

/// The process-wide beat queue shared by the heartbeat and session
/// tasks.
pub static BEAT_QUEUE: BeatQueue = Channel::new();

/// Counter state for the heartbeat task.
pub struct HeartbeatProducer {
    count: u32,
}

impl HeartbeatProducer {
    pub fn new() -> Self {
        Self { count: 0 }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Build the next beat frame and advance the counter.
    pub fn next_beat(&mut self) -> BeatMsg {
        let mut text: heapless::String<BEAT_MSG_LEN> = heapless::String::new();
        // Truncates like snprintf if the counter ever needs more room.
        let _ = write!(text, "Beat {}\n", self.count);
        self.count = self.count.wrapping_add(1);

        let mut msg = BeatMsg::new();
        let _ = msg.extend_from_slice(text.as_bytes());
        let _ = msg.resize(BEAT_MSG_LEN, 0); // fixed-width, NUL padded
        msg
    }

    /// Run the periodic cadence forever. Deadline-based so the interval
    /// does not drift with enqueue time.
    pub fn run(mut self, queue: &'static BeatQueue, interval_ms: u32) -> ! {
        let interval = Duration::from_millis(u64::from(interval_ms));
        let mut deadline = Instant::now() + interval;
        loop {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            deadline += interval;

            let msg = self.next_beat();
            if queue.try_send(msg).is_err() {
                warn!("Publish queue overflow.");
            }
        }
    }
}

impl Default for HeartbeatProducer {
    fn default() -> Self {
        Self::new()
    }
}
