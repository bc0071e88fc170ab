//! Shared bell-call table.
//!
//! One record per bell, packed into a single `AtomicU64`: the tick at
//! which the most recent ring command arrived (high word) and whether
//! the motion engine has finished the stroke it started (low bit). The
//! table is written from two independently scheduled contexts — the
//! session task's ingestion callback records calls, the motion task
//! completes strokes — so the pair is always read and written as one
//! word, and completion is a `compare_exchange` against the exact
//! record the stroke was evaluated from. A call that lands between
//! evaluation and completion makes the exchange fail and the slot stays
//! pending for the next pass; a completed stroke can never swallow a
//! fresh call.
//!
//! Later calls overwrite earlier ones: there is no per-bell queueing,
//! a new call while a stroke is in progress restarts the stroke clock.

use core::sync::atomic::{AtomicU64, Ordering};

/// Number of actuated ringers. Inbound commands address them 1-based;
/// everything internal is 0-based.
pub const BELL_COUNT: usize = 6;

/// Monotonic scheduler tick (100 Hz). Wraps at `u32::MAX`; elapsed-time
/// math uses `wrapping_sub` (see [`crate::sweep`] for the boundary
/// behavior this produces).
pub type Tick = u32;

const HANDLED_BIT: u64 = 1;

const fn encode(called_at: Tick, handled: bool) -> u64 {
    ((called_at as u64) << 32) | handled as u64
}

fn decode(record: u64) -> (Tick, bool) {
    ((record >> 32) as Tick, record & HANDLED_BIT != 0)
}

/// Fixed-size table of per-bell call records.
///
/// Intended to live in a `static` and be shared by reference between
/// the session task and the motion task.
pub struct BellTable {
    slots: [AtomicU64; BELL_COUNT],
}

impl BellTable {
    pub const fn new() -> Self {
        Self {
            slots: [const { AtomicU64::new(encode(0, true)) }; BELL_COUNT],
        }
    }

    /// Record a call for one bell: stamp the call tick and clear the
    /// handled bit in a single store.
    pub fn call(&self, bell: usize, now: Tick) {
        self.slots[bell].store(encode(now, false), Ordering::Release);
    }

    /// Record a call for every bell at the same tick.
    pub fn call_all(&self, now: Tick) {
        for bell in 0..BELL_COUNT {
            self.call(bell, now);
        }
    }

    pub fn called_at(&self, bell: usize) -> Tick {
        decode(self.slots[bell].load(Ordering::Acquire)).0
    }

    pub fn is_handled(&self, bell: usize) -> bool {
        decode(self.slots[bell].load(Ordering::Acquire)).1
    }

    /// Call tick of a pending stroke, or `None` when the bell is idle.
    /// Tick and handled bit come from one load, so the pair is always
    /// consistent.
    pub fn pending_since(&self, bell: usize) -> Option<Tick> {
        let (called_at, handled) = decode(self.slots[bell].load(Ordering::Acquire));
        (!handled).then_some(called_at)
    }

    /// Mark a bell's stroke complete, provided the record still matches
    /// the call it was evaluated against. Returns `false` when a fresh
    /// call overwrote the record in the meantime; the slot then stays
    /// pending and the next pass evaluates the new call.
    pub fn mark_handled(&self, bell: usize, observed_call: Tick) -> bool {
        self.slots[bell]
            .compare_exchange(
                encode(observed_call, false),
                encode(observed_call, true),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// Number of bells with a pending (unhandled) call.
    pub fn pending(&self) -> usize {
        (0..BELL_COUNT).filter(|&b| !self.is_handled(b)).count()
    }
}

impl Default for BellTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_all_bells_handled() {
        let t = BellTable::new();
        for b in 0..BELL_COUNT {
            assert!(t.is_handled(b));
            assert_eq!(t.pending_since(b), None);
        }
        assert_eq!(t.pending(), 0);
    }

    #[test]
    fn call_records_tick_and_clears_handled() {
        let t = BellTable::new();
        t.call(2, 1234);
        assert_eq!(t.called_at(2), 1234);
        assert!(!t.is_handled(2));
        assert_eq!(t.pending_since(2), Some(1234));
        // Neighbours untouched.
        assert!(t.is_handled(1));
        assert!(t.is_handled(3));
    }

    #[test]
    fn later_call_overwrites_earlier() {
        let t = BellTable::new();
        t.call(0, 100);
        t.call(0, 250);
        assert_eq!(t.called_at(0), 250);
        assert!(!t.is_handled(0));
    }

    #[test]
    fn call_all_hits_every_slot() {
        let t = BellTable::new();
        t.call_all(77);
        for b in 0..BELL_COUNT {
            assert_eq!(t.called_at(b), 77);
            assert!(!t.is_handled(b));
        }
        assert_eq!(t.pending(), BELL_COUNT);
    }

    #[test]
    fn mark_handled_completes_one_bell() {
        let t = BellTable::new();
        t.call_all(5);
        assert!(t.mark_handled(4, 5));
        assert!(t.is_handled(4));
        assert_eq!(t.pending(), BELL_COUNT - 1);
    }

    #[test]
    fn stale_completion_loses_to_a_fresh_call() {
        let t = BellTable::new();
        t.call(0, 100);
        let observed = t.pending_since(0).unwrap();
        // A new call lands after the stroke was evaluated but before it
        // is marked complete.
        t.call(0, 250);
        assert!(!t.mark_handled(0, observed));
        assert_eq!(t.pending_since(0), Some(250));
    }

    #[test]
    fn completion_does_not_match_an_already_handled_slot() {
        let t = BellTable::new();
        t.call(3, 40);
        assert!(t.mark_handled(3, 40));
        // Second completion against the same tick finds the handled bit
        // set and fails cleanly.
        assert!(!t.mark_handled(3, 40));
        assert!(t.is_handled(3));
    }
}
