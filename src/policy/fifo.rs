use super::ReplacementPolicy;
use crate::frame::{Frame, FrameTable};

/// Insertion-order eviction.
///
/// Inserts append at the tail and nothing ever reorders the table, so
/// the head is always the oldest resident page. Selection touches no
/// bits and moves no frames.
#[derive(Debug, Default)]
pub struct FifoPolicy;

impl FifoPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn select_victim<'a>(&mut self, table: &'a mut FrameTable) -> &'a Frame {
        table
            .head()
            .expect("victim selection on an empty frame table")
    }
}
