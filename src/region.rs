//! Virtual-region geometry and page-aligned address resolution.

use crate::error::{PagingError, PagingResult};

/// A virtual address inside (or aimed at) the simulated region.
///
/// Opaque to the core: it is only compared against the region bounds,
/// resolved to a page number, and handed to the protection collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtAddr(pub usize);

impl std::fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Index of a page within the configured virtual region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageNumber(pub u32);

impl PageNumber {
    /// Index into per-page bookkeeping tables.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PageNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The configured virtual region: base address, total size, page size.
///
/// All address math lives here, as pure bounds-checked conversions.
/// Addresses outside the region and page indices past its end are
/// rejected instead of wrapping into a neighbor's bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualRegion {
    base: VirtAddr,
    size: usize,
    page_size: usize,
}

impl VirtualRegion {
    /// Validates the geometry: `size` must be a positive multiple of a
    /// positive `page_size`, the region must not wrap the address
    /// space, and every page index must fit a [`PageNumber`].
    pub fn new(base: VirtAddr, size: usize, page_size: usize) -> PagingResult<Self> {
        if page_size == 0 || size == 0 || size % page_size != 0 {
            return Err(PagingError::InvalidRegion { size, page_size });
        }
        if base.0.checked_add(size).is_none() {
            return Err(PagingError::InvalidRegion { size, page_size });
        }
        if u32::try_from(size / page_size - 1).is_err() {
            return Err(PagingError::InvalidRegion { size, page_size });
        }
        Ok(Self {
            base,
            size,
            page_size,
        })
    }

    pub fn base(&self) -> VirtAddr {
        self.base
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of pages the region spans.
    pub fn page_count(&self) -> usize {
        self.size / self.page_size
    }

    pub fn contains(&self, addr: VirtAddr) -> bool {
        addr.0 >= self.base.0 && addr.0 < self.base.0 + self.size
    }

    /// Resolves a faulting address to the page it falls in.
    pub fn page_number_of(&self, addr: VirtAddr) -> PagingResult<PageNumber> {
        if !self.contains(addr) {
            return Err(PagingError::OutOfRegion(addr));
        }
        // In-region indices fit u32 by construction.
        Ok(PageNumber(((addr.0 - self.base.0) / self.page_size) as u32))
    }

    /// Start address of a page.
    pub fn page_base(&self, page: PageNumber) -> PagingResult<VirtAddr> {
        if page.index() >= self.page_count() {
            return Err(PagingError::PageOutOfRange {
                page,
                page_count: self.page_count(),
            });
        }
        Ok(VirtAddr(self.base.0 + page.index() * self.page_size))
    }
}
