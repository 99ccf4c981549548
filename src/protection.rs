use std::fmt::Debug;

use crate::error::PagingResult;
use crate::region::VirtAddr;

/// Access mode requested for a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protection {
    /// All access revoked; any touch traps.
    None,
    /// Reads complete, writes trap.
    Read,
    /// Reads and writes complete.
    ReadWrite,
}

impl Protection {
    pub fn allows_read(&self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    pub fn allows_write(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

impl std::fmt::Display for Protection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self {
            Protection::None => "none",
            Protection::Read => "read",
            Protection::ReadWrite => "read-write",
        };
        write!(f, "{}", mode)
    }
}

/// Permission-change facility the fault handler drives.
///
/// The manager decides which mode each page should have; implementations
/// apply the change to whatever stands behind the region. Requests are
/// page-granular and always target a page base address.
pub trait ProtectionControl: Send + Sync + Debug {
    fn set_protection(&self, page_base: VirtAddr, protection: Protection) -> PagingResult<()>;
}

/// Accepts every request without backing it by real permissions.
///
/// Useful for hosts that want fault accounting only.
#[derive(Debug, Default)]
pub struct NullProtection;

impl ProtectionControl for NullProtection {
    fn set_protection(&self, _page_base: VirtAddr, _protection: Protection) -> PagingResult<()> {
        Ok(())
    }
}
