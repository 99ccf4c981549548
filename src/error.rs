//! Crate-wide error types.

use thiserror::Error;

use crate::region::{PageNumber, VirtAddr};

/// Errors that can occur while configuring or driving the manager.
///
/// Invariant violations (insert into a full table, evict from an empty
/// one, double-insert of a resident page) are programming errors and
/// panic instead of surfacing here.
#[derive(Error, Debug)]
pub enum PagingError {
    #[error("Invalid region geometry: size {size}, page size {page_size}")]
    InvalidRegion { size: usize, page_size: usize },

    #[error("Invalid frame capacity {capacity}: region spans {page_count} pages")]
    InvalidCapacity { capacity: usize, page_count: usize },

    #[error("Address {0} is outside the configured region")]
    OutOfRegion(VirtAddr),

    #[error("Page {page} is out of range: region spans {page_count} pages")]
    PageOutOfRange { page: PageNumber, page_count: usize },

    #[error("Unknown replacement policy: {0}")]
    UnknownPolicy(String),

    #[error("Protection control failed: {0}")]
    ProtectionControl(String),

    #[error("Access to page {page} still trapping after {attempts} deliveries")]
    AccessStuck { page: PageNumber, attempts: u32 },

    #[error("Malformed trace at line {line}: {reason}")]
    TraceParse { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for paging operations.
pub type PagingResult<T> = Result<T, PagingError>;
