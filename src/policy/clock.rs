use super::ReplacementPolicy;
use crate::frame::{Frame, FrameTable};

/// Second-chance eviction.
///
/// The scan inspects the head frame: a set reference bit buys the frame
/// one more pass (the bit is cleared and the frame rotates to the tail);
/// the first unreferenced head is the victim. Each full rotation clears
/// every bit, so the scan terminates by the second pass at the latest.
///
/// Reference bits are set on insert and never again: a trap on an
/// already-resident page upgrades its protection without re-marking it.
/// A page therefore survives at most one scan on the strength of its
/// load, and on a trace of pure faults the victim order matches FIFO's.
#[derive(Debug, Default)]
pub struct ClockPolicy;

impl ClockPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for ClockPolicy {
    fn select_victim<'a>(&mut self, table: &'a mut FrameTable) -> &'a Frame {
        assert!(
            !table.is_empty(),
            "victim selection on an empty frame table"
        );
        loop {
            let head = table.head_mut().expect("table checked non-empty");
            if !head.reference_bit {
                break;
            }
            head.reference_bit = false;
            table.rotate_head_to_tail();
        }
        table.head().expect("table checked non-empty")
    }
}
