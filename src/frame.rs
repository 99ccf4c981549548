use std::collections::VecDeque;

use crate::region::{PageNumber, VirtAddr};

/// One page currently resident in a physical slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub page_number: PageNumber,
    pub base_address: VirtAddr,
    /// Set on insert, cleared only by the CLOCK scan.
    pub reference_bit: bool,
    /// Set once the resident page receives a write.
    pub dirty_bit: bool,
}

impl Frame {
    fn new(page_number: PageNumber, base_address: VirtAddr) -> Self {
        Self {
            page_number,
            base_address,
            reference_bit: true,
            dirty_bit: false,
        }
    }
}

/// Ordered, capacity-bounded pool of resident frames.
///
/// The head is the eviction front: FIFO evicts it directly, CLOCK
/// rotates referenced frames to the tail until an unreferenced one
/// surfaces there. Inserts always append at the tail, so with no
/// rotation the order is insertion order.
#[derive(Debug)]
pub struct FrameTable {
    frames: VecDeque<Frame>,
    capacity: usize,
}

impl FrameTable {
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "frame table capacity must be positive");
        Self {
            frames: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.frames.len() == self.capacity
    }

    /// Linear scan for a resident page. No side effects.
    pub fn find(&self, page_number: PageNumber) -> Option<&Frame> {
        self.frames.iter().find(|f| f.page_number == page_number)
    }

    pub(crate) fn find_mut(&mut self, page_number: PageNumber) -> Option<&mut Frame> {
        self.frames.iter_mut().find(|f| f.page_number == page_number)
    }

    /// Resident frames in table order, eviction front first.
    pub fn iter(&self) -> impl Iterator<Item = &Frame> + '_ {
        self.frames.iter()
    }

    /// The frame at the eviction front.
    pub fn head(&self) -> Option<&Frame> {
        self.frames.front()
    }

    pub(crate) fn head_mut(&mut self) -> Option<&mut Frame> {
        self.frames.front_mut()
    }

    /// Appends a new frame at the tail, reference bit set and dirty bit
    /// clear.
    ///
    /// Panics if the table is full or the page is already resident.
    pub fn insert(&mut self, page_number: PageNumber, base_address: VirtAddr) {
        assert!(!self.is_full(), "insert into a full frame table");
        assert!(
            self.find(page_number).is_none(),
            "page {} is already resident",
            page_number
        );
        self.frames.push_back(Frame::new(page_number, base_address));
    }

    /// Removes and returns the head frame. Only membership changes here;
    /// protection and counter bookkeeping belong to the caller.
    ///
    /// Panics if the table is empty.
    pub fn evict_head(&mut self) -> Frame {
        self.frames.pop_front().expect("evict from an empty frame table")
    }

    /// Moves the head frame to the tail, the CLOCK scan step.
    ///
    /// Panics if the table is empty.
    pub fn rotate_head_to_tail(&mut self) {
        let head = self.frames.pop_front().expect("rotate on an empty frame table");
        self.frames.push_back(head);
    }

    /// Sets the dirty bit on a resident page.
    ///
    /// Panics if the page is not resident.
    pub fn mark_dirty(&mut self, page_number: PageNumber) {
        match self.find_mut(page_number) {
            Some(frame) => frame.dirty_bit = true,
            None => panic!("mark_dirty on non-resident page {}", page_number),
        }
    }
}
