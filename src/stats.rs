use crate::error::{PagingError, PagingResult};
use crate::region::PageNumber;

/// Counters accumulated by one manager instance.
///
/// All counters are monotonically non-decreasing for the lifetime of the
/// instance; the only way to reset them is to rebuild the manager. The
/// struct is cloneable so a harness can snapshot it mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaultStats {
    total_traps: u64,
    total_faults: u64,
    write_backs: u64,
    protection_failures: u64,
    /// Eviction count per page, indexed by page number.
    evictions: Vec<u64>,
}

impl FaultStats {
    pub(crate) fn new(page_count: usize) -> Self {
        Self {
            total_traps: 0,
            total_faults: 0,
            write_backs: 0,
            protection_failures: 0,
            evictions: vec![0; page_count],
        }
    }

    pub(crate) fn record_trap(&mut self) {
        self.total_traps += 1;
    }

    pub(crate) fn record_fault(&mut self) {
        self.total_faults += 1;
    }

    pub(crate) fn record_write_back(&mut self) {
        self.write_backs += 1;
    }

    pub(crate) fn record_protection_failure(&mut self) {
        self.protection_failures += 1;
    }

    pub(crate) fn record_eviction(&mut self, page: PageNumber) {
        self.evictions[page.index()] += 1;
    }

    /// Every delivered trap, faults and write upgrades alike.
    pub fn total_trap_count(&self) -> u64 {
        self.total_traps
    }

    /// Traps that required loading a non-resident page.
    pub fn total_fault_count(&self) -> u64 {
        self.total_faults
    }

    /// Evictions whose victim was dirty.
    pub fn total_write_back_count(&self) -> u64 {
        self.write_backs
    }

    /// Protection-control requests that came back with an error.
    pub fn protection_failure_count(&self) -> u64 {
        self.protection_failures
    }

    /// How many times `page` has been evicted.
    pub fn eviction_count(&self, page: PageNumber) -> PagingResult<u64> {
        match self.evictions.get(page.index()) {
            Some(&count) => Ok(count),
            None => Err(PagingError::PageOutOfRange {
                page,
                page_count: self.evictions.len(),
            }),
        }
    }

    /// Pages with at least one eviction, most evicted first, at most
    /// `limit` entries. Ties break toward the lower page number.
    pub fn most_evicted(&self, limit: usize) -> Vec<(PageNumber, u64)> {
        let mut ranked: Vec<(PageNumber, u64)> = self
            .evictions
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(page, &count)| (PageNumber(page as u32), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(limit);
        ranked
    }
}
