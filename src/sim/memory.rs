use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::PagingResult;
use crate::protection::{Protection, ProtectionControl};
use crate::region::{PageNumber, VirtAddr, VirtualRegion};
use crate::sim::trace::AccessKind;

/// Per-page protection states for one region, standing in for real
/// page-table permissions.
///
/// The manager writes through the [`ProtectionControl`] impl; the
/// simulation driver reads back to decide whether an access traps.
/// Every page starts with all access revoked. Cloning yields another
/// handle onto the same map.
#[derive(Debug, Clone)]
pub struct ProtectionMap {
    region: VirtualRegion,
    pages: Arc<Mutex<HashMap<PageNumber, Protection>>>,
}

impl ProtectionMap {
    pub fn new(region: VirtualRegion) -> Self {
        Self {
            region,
            pages: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Current protection of `page`; revoked unless set since startup.
    pub fn protection_of(&self, page: PageNumber) -> Protection {
        self.pages
            .lock()
            .get(&page)
            .copied()
            .unwrap_or(Protection::None)
    }

    /// Whether `kind` access to `page` completes without trapping.
    pub fn permits(&self, page: PageNumber, kind: AccessKind) -> bool {
        let protection = self.protection_of(page);
        match kind {
            AccessKind::Read => protection.allows_read(),
            AccessKind::Write => protection.allows_write(),
        }
    }
}

impl ProtectionControl for ProtectionMap {
    fn set_protection(&self, page_base: VirtAddr, protection: Protection) -> PagingResult<()> {
        let page = self.region.page_number_of(page_base)?;
        self.pages.lock().insert(page, protection);
        Ok(())
    }
}
