//! Command ingestion — parses inbound control messages into bell calls.
//!
//! Runs as a callback in the session task's execution context: the
//! session manager hands every message that arrives on the control
//! topic to [`CommandIngestor::on_message`].
//!
//! The protocol is fire-and-forget ASCII: the payload is a decimal
//! integer in `[0, BELL_COUNT]`, where `0` rings every bell and `k`
//! rings bell `k` (1-based). Anything else (out of range, negative,
//! non-numeric, oversized) is dropped without a reply; there is no
//! acknowledgment channel.

use log::info;

use crate::bells::{BELL_COUNT, BellTable};
use crate::ports::Clock;

/// Upper bound on accepted payload size. Larger messages are ignored
/// outright.
pub const MAX_COMMAND_LEN: usize = 100;

/// Strict decimal parse of a control payload. Trims ASCII whitespace
/// and NUL padding, then requires the remainder to be a plain unsigned
/// decimal — `"3abc"`, `"-1"` and `"abc"` all fail.
pub fn parse_bell_number(payload: &[u8]) -> Option<u32> {
    let text = core::str::from_utf8(payload).ok()?;
    let text = text.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0');
    text.parse::<u32>().ok()
}

/// Parses control messages and records calls into the shared table.
pub struct CommandIngestor<'a, C: Clock> {
    bells: &'a BellTable,
    clock: C,
}

impl<'a, C: Clock> CommandIngestor<'a, C> {
    pub fn new(bells: &'a BellTable, clock: C) -> Self {
        Self { bells, clock }
    }

    /// Handle one message from the control topic.
    pub fn on_message(&self, topic: &str, payload: &[u8]) {
        info!(
            "Received: {} = {}",
            topic,
            core::str::from_utf8(payload).unwrap_or("<non-utf8>")
        );

        if payload.len() >= MAX_COMMAND_LEN {
            return;
        }
        let mut buf: heapless::Vec<u8, MAX_COMMAND_LEN> = heapless::Vec::new();
        let _ = buf.extend_from_slice(payload); // bounded by the check above

        let now = self.clock.now_ticks();
        match parse_bell_number(&buf) {
            Some(0) => {
                info!("Call all bells at tick {}", now);
                self.bells.call_all(now);
            }
            Some(n) if n as usize <= BELL_COUNT => {
                info!("Call bell: {} at tick {}", n, now);
                self.bells.call(n as usize - 1, now);
            }
            // Out of range or unparseable: fire-and-forget, drop it.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bells::Tick;

    struct FixedClock(Tick);
    impl Clock for FixedClock {
        fn now_ticks(&self) -> Tick {
            self.0
        }
    }

    fn untouched(t: &BellTable, except: Option<usize>) -> bool {
        (0..BELL_COUNT)
            .filter(|&b| Some(b) != except)
            .all(|b| t.is_handled(b) && t.called_at(b) == 0)
    }

    #[test]
    fn single_bell_command_touches_only_that_bell() {
        for k in 1..=BELL_COUNT {
            let bells = BellTable::new();
            let ing = CommandIngestor::new(&bells, FixedClock(42));
            ing.on_message("/bell", k.to_string().as_bytes());
            assert!(!bells.is_handled(k - 1));
            assert_eq!(bells.called_at(k - 1), 42);
            assert!(untouched(&bells, Some(k - 1)));
        }
    }

    #[test]
    fn zero_calls_every_bell() {
        let bells = BellTable::new();
        let ing = CommandIngestor::new(&bells, FixedClock(7));
        ing.on_message("/bell", b"0");
        for b in 0..BELL_COUNT {
            assert!(!bells.is_handled(b));
            assert_eq!(bells.called_at(b), 7);
        }
    }

    #[test]
    fn out_of_range_and_garbage_are_ignored() {
        let bells = BellTable::new();
        let ing = CommandIngestor::new(&bells, FixedClock(9));
        for payload in [
            b"7".as_slice(),
            b"-1",
            b"abc",
            b"3abc",
            b"",
            b"\xff\xfe",
            b"99999999999999999999",
        ] {
            ing.on_message("/bell", payload);
        }
        assert!(untouched(&bells, None));
    }

    #[test]
    fn oversized_payload_is_ignored() {
        let bells = BellTable::new();
        let ing = CommandIngestor::new(&bells, FixedClock(9));
        // Leading zeros keep the value parseable at any length.
        let mut big = vec![b'0'; MAX_COMMAND_LEN];
        *big.last_mut().unwrap() = b'3';
        // At the bound: dropped by the length gate before parsing.
        ing.on_message("/bell", &big);
        assert!(untouched(&bells, None));
        // One byte under the bound parses ("00…03") and rings bell 3.
        ing.on_message("/bell", &big[1..]);
        assert!(!bells.is_handled(2));
    }

    #[test]
    fn trailing_newline_and_nul_are_tolerated() {
        let bells = BellTable::new();
        let ing = CommandIngestor::new(&bells, FixedClock(11));
        ing.on_message("/bell", b"4\n");
        assert!(!bells.is_handled(3));
        ing.on_message("/bell", b"5\0\0");
        assert!(!bells.is_handled(4));
    }

    #[test]
    fn repeat_call_restarts_the_stroke_clock() {
        let bells = BellTable::new();
        let ing = CommandIngestor::new(&bells, FixedClock(100));
        ing.on_message("/bell", b"2");
        assert!(bells.mark_handled(1, 100));
        let ing2 = CommandIngestor::new(&bells, FixedClock(250));
        ing2.on_message("/bell", b"2");
        assert_eq!(bells.called_at(1), 250);
        assert!(!bells.is_handled(1));
    }
}
