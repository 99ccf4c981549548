use log::{debug, warn};

use crate::error::{PagingError, PagingResult};
use crate::frame::FrameTable;
use crate::policy::ReplacementPolicy;
use crate::protection::{Protection, ProtectionControl};
use crate::region::{PageNumber, VirtAddr, VirtualRegion};
use crate::stats::FaultStats;

/// The decision engine behind the trap facility.
///
/// One instance owns the resident-frame table, the replacement policy
/// and the counters for exactly one virtual region. Every intercepted
/// access lands in [`on_fault`](Self::on_fault); the manager classifies
/// it, updates residency and asks the protection collaborator to adjust
/// page permissions. It never changes permissions itself and never
/// calls back into the trap facility.
///
/// The surrounding trap facility must deliver faults synchronously in
/// the context of the faulting access and must not re-enter `on_fault`
/// from the manager's own activity. Before the first delivery every
/// page of the region must start with all access revoked.
#[derive(Debug)]
pub struct MemoryManager {
    region: VirtualRegion,
    table: FrameTable,
    policy: Box<dyn ReplacementPolicy>,
    protection: Box<dyn ProtectionControl>,
    stats: FaultStats,
}

impl MemoryManager {
    /// Creates a manager over `region` holding at most `frame_capacity`
    /// resident pages.
    ///
    /// The capacity must be nonzero and no larger than the region's
    /// page count.
    pub fn new(
        region: VirtualRegion,
        frame_capacity: usize,
        policy: Box<dyn ReplacementPolicy>,
        protection: Box<dyn ProtectionControl>,
    ) -> PagingResult<Self> {
        if frame_capacity == 0 || frame_capacity > region.page_count() {
            return Err(PagingError::InvalidCapacity {
                capacity: frame_capacity,
                page_count: region.page_count(),
            });
        }
        let stats = FaultStats::new(region.page_count());
        Ok(Self {
            region,
            table: FrameTable::new(frame_capacity),
            policy,
            protection,
            stats,
        })
    }

    /// Handles one trap delivery for `fault_address`.
    ///
    /// A trap on a resident page is a write upgrade: resident pages are
    /// kept read-only, so the only access that can still trap is a
    /// write. The page turns dirty and gains write access; no fault is
    /// counted. A trap on a non-resident page is a fault: the page is
    /// loaded read-only, evicting the policy's victim first when the
    /// table is full.
    ///
    /// An address outside the region is rejected; the trap itself is
    /// still counted.
    pub fn on_fault(&mut self, fault_address: VirtAddr) -> PagingResult<()> {
        self.stats.record_trap();
        let page = self.region.page_number_of(fault_address)?;
        let page_base = self.region.page_base(page)?;

        if self.table.find(page).is_some() {
            debug!("write upgrade on resident page {}", page);
            self.table.mark_dirty(page);
            self.request_protection(page, page_base, Protection::ReadWrite);
            return Ok(());
        }

        self.stats.record_fault();
        if self.table.is_full() {
            self.evict_victim();
        }
        self.table.insert(page, page_base);
        self.request_protection(page, page_base, Protection::Read);
        Ok(())
    }

    fn evict_victim(&mut self) {
        let (victim_page, victim_base, was_dirty) = {
            let victim = self.policy.select_victim(&mut self.table);
            (victim.page_number, victim.base_address, victim.dirty_bit)
        };
        debug!("evicting page {} (dirty: {})", victim_page, was_dirty);

        self.request_protection(victim_page, victim_base, Protection::None);
        self.stats.record_eviction(victim_page);
        if was_dirty {
            self.stats.record_write_back();
        }
        let evicted = self.table.evict_head();
        assert_eq!(evicted.page_number, victim_page);
    }

    /// A failed protection request is counted and logged, never fatal.
    fn request_protection(&mut self, page: PageNumber, page_base: VirtAddr, mode: Protection) {
        if let Err(e) = self.protection.set_protection(page_base, mode) {
            warn!("protection change to {} failed for page {}: {}", mode, page, e);
            self.stats.record_protection_failure();
        }
    }

    /// Resident pages in table order, eviction front first.
    pub fn resident_pages(&self) -> Vec<PageNumber> {
        self.table.iter().map(|f| f.page_number).collect()
    }

    pub fn region(&self) -> &VirtualRegion {
        &self.region
    }

    pub fn frame_capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The accumulated counters; clone to snapshot.
    pub fn stats(&self) -> &FaultStats {
        &self.stats
    }

    pub fn total_trap_count(&self) -> u64 {
        self.stats.total_trap_count()
    }

    pub fn total_fault_count(&self) -> u64 {
        self.stats.total_fault_count()
    }

    pub fn total_write_back_count(&self) -> u64 {
        self.stats.total_write_back_count()
    }

    pub fn protection_failure_count(&self) -> u64 {
        self.stats.protection_failure_count()
    }

    pub fn eviction_count(&self, page: PageNumber) -> PagingResult<u64> {
        self.stats.eviction_count(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyKind;
    use crate::protection::NullProtection;

    const PAGE: usize = 0x1000;

    fn region(pages: usize) -> VirtualRegion {
        VirtualRegion::new(VirtAddr(0x10_0000), pages * PAGE, PAGE).unwrap()
    }

    fn manager(capacity: usize, kind: PolicyKind) -> MemoryManager {
        MemoryManager::new(region(8), capacity, kind.build(), Box::new(NullProtection)).unwrap()
    }

    /// Delivers the trap a touch of `page` would raise.
    fn touch(manager: &mut MemoryManager, page: u32) {
        let address = manager.region().page_base(PageNumber(page)).unwrap();
        manager.on_fault(address).unwrap();
    }

    #[test]
    fn test_capacity_must_be_nonzero() {
        let err =
            MemoryManager::new(region(4), 0, PolicyKind::Fifo.build(), Box::new(NullProtection))
                .unwrap_err();
        assert!(matches!(err, PagingError::InvalidCapacity { capacity: 0, page_count: 4 }));
    }

    #[test]
    fn test_capacity_must_fit_region() {
        let err =
            MemoryManager::new(region(4), 5, PolicyKind::Fifo.build(), Box::new(NullProtection))
                .unwrap_err();
        assert!(matches!(err, PagingError::InvalidCapacity { capacity: 5, page_count: 4 }));
    }

    #[test]
    fn test_fault_loads_page() {
        let mut manager = manager(2, PolicyKind::Fifo);
        touch(&mut manager, 3);

        assert_eq!(manager.total_trap_count(), 1);
        assert_eq!(manager.total_fault_count(), 1);
        assert_eq!(manager.resident_pages(), vec![PageNumber(3)]);
    }

    #[test]
    fn test_trap_on_resident_page_is_upgrade_not_fault() {
        let mut manager = manager(2, PolicyKind::Fifo);
        touch(&mut manager, 3);
        touch(&mut manager, 3);

        assert_eq!(manager.total_trap_count(), 2);
        assert_eq!(manager.total_fault_count(), 1);
        assert_eq!(manager.resident_pages(), vec![PageNumber(3)]);
    }

    #[test]
    fn test_dirty_page_writes_back_on_eviction() {
        let mut manager = manager(1, PolicyKind::Fifo);
        touch(&mut manager, 0);
        touch(&mut manager, 0); // upgrade marks page 0 dirty
        touch(&mut manager, 1); // evicts page 0

        assert_eq!(manager.total_write_back_count(), 1);
        assert_eq!(manager.eviction_count(PageNumber(0)).unwrap(), 1);
    }

    #[test]
    fn test_clean_page_evicts_without_write_back() {
        let mut manager = manager(1, PolicyKind::Fifo);
        touch(&mut manager, 0);
        touch(&mut manager, 1);

        assert_eq!(manager.total_write_back_count(), 0);
        assert_eq!(manager.eviction_count(PageNumber(0)).unwrap(), 1);
    }

    #[test]
    fn test_fifo_evicts_in_first_touch_order() {
        let mut manager = manager(2, PolicyKind::Fifo);
        for page in [0, 1, 2, 3] {
            touch(&mut manager, page);
        }

        assert_eq!(manager.eviction_count(PageNumber(0)).unwrap(), 1);
        assert_eq!(manager.eviction_count(PageNumber(1)).unwrap(), 1);
        assert_eq!(manager.eviction_count(PageNumber(2)).unwrap(), 0);
        assert_eq!(manager.resident_pages(), vec![PageNumber(2), PageNumber(3)]);
    }

    #[test]
    fn test_resident_set_never_exceeds_capacity() {
        let mut manager = manager(2, PolicyKind::Clock);
        assert_eq!(manager.frame_capacity(), 2);
        for page in [0, 1, 2, 0, 3, 1, 2, 3, 0] {
            touch(&mut manager, page);
            let resident = manager.resident_pages();
            assert!(resident.len() <= manager.frame_capacity());
            let mut deduped = resident.clone();
            deduped.sort();
            deduped.dedup();
            assert_eq!(deduped.len(), resident.len());
        }
    }

    #[test]
    fn test_concrete_fifo_scenario() {
        // Capacity 2, trace 1r 2r 1w 3r. The write to resident page 1
        // arrives as one extra trap.
        let mut manager = manager(2, PolicyKind::Fifo);
        touch(&mut manager, 1);
        touch(&mut manager, 2);
        touch(&mut manager, 1);
        touch(&mut manager, 3);

        assert_eq!(manager.total_trap_count(), 4);
        assert_eq!(manager.total_fault_count(), 3);
        assert_eq!(manager.total_write_back_count(), 1);
        assert_eq!(manager.eviction_count(PageNumber(1)).unwrap(), 1);
        assert_eq!(manager.eviction_count(PageNumber(2)).unwrap(), 0);
        assert_eq!(manager.resident_pages(), vec![PageNumber(2), PageNumber(3)]);
    }

    #[test]
    fn test_concrete_clock_scenario() {
        // Same trace under CLOCK: the scan clears both reference bits,
        // rotates twice and still evicts page 1.
        let mut manager = manager(2, PolicyKind::Clock);
        touch(&mut manager, 1);
        touch(&mut manager, 2);
        touch(&mut manager, 1);
        touch(&mut manager, 3);

        assert_eq!(manager.total_trap_count(), 4);
        assert_eq!(manager.total_fault_count(), 3);
        assert_eq!(manager.total_write_back_count(), 1);
        assert_eq!(manager.eviction_count(PageNumber(1)).unwrap(), 1);
        assert_eq!(manager.eviction_count(PageNumber(2)).unwrap(), 0);
        assert_eq!(manager.resident_pages(), vec![PageNumber(2), PageNumber(3)]);
    }

    #[test]
    fn test_policies_agree_without_re_reference_marking() {
        // Upgrades never re-set reference bits, so CLOCK degenerates to
        // FIFO over any trap sequence delivered through on_fault.
        let trace = [1, 2, 1, 3, 4, 2, 5, 0, 5, 6, 1, 7, 3, 3, 0];
        let mut fifo = manager(3, PolicyKind::Fifo);
        let mut clock = manager(3, PolicyKind::Clock);
        for &page in &trace {
            touch(&mut fifo, page);
            touch(&mut clock, page);
        }

        assert_eq!(fifo.stats(), clock.stats());
        assert_eq!(fifo.resident_pages(), clock.resident_pages());
    }

    #[test]
    fn test_out_of_region_address_is_rejected() {
        let mut manager = manager(2, PolicyKind::Fifo);
        let err = manager.on_fault(VirtAddr(0x10_0000 + 8 * PAGE)).unwrap_err();

        assert!(matches!(err, PagingError::OutOfRegion(_)));
        // The delivery itself was still counted
        assert_eq!(manager.total_trap_count(), 1);
        assert_eq!(manager.total_fault_count(), 0);
    }

    #[derive(Debug)]
    struct FailingProtection;

    impl ProtectionControl for FailingProtection {
        fn set_protection(&self, _page_base: VirtAddr, _mode: Protection) -> PagingResult<()> {
            Err(PagingError::ProtectionControl("permission denied".to_string()))
        }
    }

    #[test]
    fn test_protection_failures_are_counted_not_fatal() {
        let mut manager = MemoryManager::new(
            region(8),
            1,
            PolicyKind::Fifo.build(),
            Box::new(FailingProtection),
        )
        .unwrap();

        touch(&mut manager, 0); // one request: load 0
        touch(&mut manager, 1); // two requests: revoke 0, load 1

        assert_eq!(manager.protection_failure_count(), 3);
        assert_eq!(manager.total_fault_count(), 2);
        assert_eq!(manager.resident_pages(), vec![PageNumber(1)]);
    }
}
