use crate::error::{PagingError, PagingResult};
use crate::manager::MemoryManager;
use crate::policy::PolicyKind;
use crate::region::VirtualRegion;
use crate::sim::memory::ProtectionMap;
use crate::sim::trace::Access;
use crate::stats::FaultStats;

/// Deliveries allowed for one access before the driver gives up.
///
/// A correctly wired manager needs at most two (load, then write
/// upgrade); the bound only exists to turn a mis-wired collaborator
/// into an error instead of a spin.
const MAX_TRAP_DELIVERIES: u32 = 8;

/// A manager wired to an in-process protection map, driven by accesses.
///
/// Each access retries like a faulting instruction: while the map still
/// denies it, the page's address is delivered to the manager as a trap,
/// until the access completes or the retry bound trips.
#[derive(Debug)]
pub struct Simulation {
    manager: MemoryManager,
    protection: ProtectionMap,
}

impl Simulation {
    /// Builds a fresh manager over `region` running `kind`'s policy,
    /// with every page initially revoked.
    pub fn new(
        region: VirtualRegion,
        frame_capacity: usize,
        kind: PolicyKind,
    ) -> PagingResult<Self> {
        let protection = ProtectionMap::new(region);
        let manager = MemoryManager::new(
            region,
            frame_capacity,
            kind.build(),
            Box::new(protection.clone()),
        )?;
        Ok(Self {
            manager,
            protection,
        })
    }

    /// Performs one access, delivering as many traps as it takes.
    pub fn access(&mut self, access: Access) -> PagingResult<()> {
        let address = self.manager.region().page_base(access.page)?;
        let mut deliveries = 0;
        while !self.protection.permits(access.page, access.kind) {
            if deliveries == MAX_TRAP_DELIVERIES {
                return Err(PagingError::AccessStuck {
                    page: access.page,
                    attempts: deliveries,
                });
            }
            self.manager.on_fault(address)?;
            deliveries += 1;
        }
        Ok(())
    }

    /// Runs a whole trace in order, stopping at the first failure.
    pub fn run(&mut self, trace: &[Access]) -> PagingResult<()> {
        for access in trace {
            self.access(*access)?;
        }
        Ok(())
    }

    pub fn manager(&self) -> &MemoryManager {
        &self.manager
    }

    pub fn protection(&self) -> &ProtectionMap {
        &self.protection
    }
}

/// Final counters of both policies over one trace.
#[derive(Debug, Clone)]
pub struct ComparisonReport {
    pub fifo: FaultStats,
    pub clock: FaultStats,
}

/// Runs `trace` through fresh FIFO and CLOCK managers over the same
/// geometry and returns both finals.
pub fn compare(
    region: VirtualRegion,
    frame_capacity: usize,
    trace: &[Access],
) -> PagingResult<ComparisonReport> {
    let mut fifo = Simulation::new(region, frame_capacity, PolicyKind::Fifo)?;
    fifo.run(trace)?;
    let mut clock = Simulation::new(region, frame_capacity, PolicyKind::Clock)?;
    clock.run(trace)?;
    Ok(ComparisonReport {
        fifo: fifo.manager().stats().clone(),
        clock: clock.manager().stats().clone(),
    })
}
