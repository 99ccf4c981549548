use anyhow::Result;
use pagesim::policy::PolicyKind;
use pagesim::region::{PageNumber, VirtAddr, VirtualRegion};
use pagesim::sim::{Access, Simulation};

fn main() -> Result<()> {
    // A small region: 8 pages of 4 KiB over 2 physical frames
    let region = VirtualRegion::new(VirtAddr(0x10_0000), 8 * 4096, 4096)?;
    let mut sim = Simulation::new(region, 2, PolicyKind::Fifo)?;
    println!("Region of {} pages over 2 frames", region.page_count());

    // Read two pages: each faults once and loads read-only
    sim.access(Access::read(1))?;
    sim.access(Access::read(2))?;
    println!(
        "Loaded pages 1 and 2 ({} faults)",
        sim.manager().total_fault_count()
    );

    // Write to resident page 1: one more trap, no new fault
    sim.access(Access::write(1))?;
    println!(
        "Wrote page 1: {} traps so far, still {} faults",
        sim.manager().total_trap_count(),
        sim.manager().total_fault_count()
    );

    // Touch a third page: the pool is full, page 1 leaves dirty
    sim.access(Access::read(3))?;
    println!(
        "Loaded page 3: page 1 evicted {} time(s), {} write-back(s)",
        sim.manager().eviction_count(PageNumber(1))?,
        sim.manager().total_write_back_count()
    );

    // The resident set never outgrows the frame pool
    let resident: Vec<u32> = sim.manager().resident_pages().iter().map(|p| p.0).collect();
    assert!(resident.len() <= 2);
    println!("Resident pages, oldest first: {:?}", resident);

    Ok(())
}
