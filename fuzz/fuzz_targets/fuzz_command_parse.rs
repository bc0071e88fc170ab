//! Fuzz target: control-topic command parsing.
//!
//! Feeds arbitrary payload bytes through `parse_bell_number` and the
//! full `CommandIngestor::on_message` path.
//!
//! Invariants checked:
//! - No panics under any byte sequence
//! - A parsed value re-serializes to the trimmed payload text
//! - The bell table changes ONLY for a payload parsing into `0..=6`
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;

use abbeybell::bells::{BELL_COUNT, BellTable, Tick};
use abbeybell::ingest::{CommandIngestor, MAX_COMMAND_LEN, parse_bell_number};
use abbeybell::ports::Clock;

struct FixedClock(Tick);
impl Clock for FixedClock {
    fn now_ticks(&self) -> Tick {
        self.0
    }
}

fuzz_target!(|data: &[u8]| {
    let parsed = parse_bell_number(data);

    if let Some(n) = parsed {
        // A successful parse means the payload was exactly a decimal
        // integer modulo whitespace/NUL padding.
        let text = core::str::from_utf8(data).unwrap();
        let trimmed = text.trim_matches(|c: char| c.is_ascii_whitespace() || c == '\0');
        assert_eq!(trimmed.parse::<u32>(), Ok(n));
    }

    let bells = BellTable::new();
    let ing = CommandIngestor::new(&bells, FixedClock(1));
    ing.on_message("/bell", data);

    let expected = match parsed {
        Some(0) if data.len() < MAX_COMMAND_LEN => BELL_COUNT,
        Some(n) if n as usize <= BELL_COUNT && data.len() < MAX_COMMAND_LEN => 1,
        _ => 0,
    };
    assert_eq!(bells.pending(), expected);
});
