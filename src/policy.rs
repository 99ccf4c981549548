//! Pluggable page-replacement policies.
//!
//! Victim selection is the only thing a policy does. Both shipped
//! policies work over the shared [`FrameTable`] order:
//!
//! - **Fifo**: the head of the table is the victim, always.
//! - **Clock**: second chance; referenced head frames are rotated to the
//!   tail (bit cleared) until an unreferenced frame surfaces.
//!
//! The fault handler owns all counter and protection bookkeeping; a
//! policy only decides which frame goes.

pub mod clock;
pub mod fifo;

use std::fmt::Debug;
use std::str::FromStr;

use crate::error::PagingError;
use crate::frame::{Frame, FrameTable};

pub use clock::ClockPolicy;
pub use fifo::FifoPolicy;

pub trait ReplacementPolicy: Send + Sync + Debug {
    /// Select the frame to evict from a non-empty table.
    ///
    /// Must leave the chosen frame at the table head and return a
    /// reference to it; the caller records counters and then calls
    /// `evict_head`. Panics if the table is empty.
    fn select_victim<'a>(&mut self, table: &'a mut FrameTable) -> &'a Frame;
}

/// Selector for the shipped policies, parsed from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyKind {
    Fifo,
    Clock,
}

impl PolicyKind {
    /// Builds a fresh boxed policy of this kind.
    pub fn build(&self) -> Box<dyn ReplacementPolicy> {
        match self {
            PolicyKind::Fifo => Box::new(FifoPolicy::new()),
            PolicyKind::Clock => Box::new(ClockPolicy::new()),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = PagingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fifo" => Ok(PolicyKind::Fifo),
            "clock" => Ok(PolicyKind::Clock),
            _ => Err(PagingError::UnknownPolicy(s.to_string())),
        }
    }
}

impl std::fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PolicyKind::Fifo => "fifo",
            PolicyKind::Clock => "clock",
        };
        write!(f, "{}", name)
    }
}
