use anyhow::Result;
use pagesim::region::{VirtAddr, VirtualRegion};
use pagesim::sim::{compare, trace};

fn main() -> Result<()> {
    // 64 pages of 4 KiB squeezed into 8 frames
    let region = VirtualRegion::new(VirtAddr(0x10_0000), 64 * 4096, 4096)?;

    // One seeded workload drives both policies
    let workload = trace::random(2000, 64, 0.25, 7);
    println!("Workload: {} accesses over 64 pages, 8 frames", workload.len());
    println!();

    let report = compare(region, 8, &workload)?;
    for (name, stats) in [("fifo", &report.fifo), ("clock", &report.clock)] {
        println!(
            "{:5} traps: {:5}  faults: {:5}  write-backs: {:5}",
            name,
            stats.total_trap_count(),
            stats.total_fault_count(),
            stats.total_write_back_count()
        );
        for (page, count) in stats.most_evicted(3) {
            println!("      page {:2} evicted {} times", page, count);
        }
    }

    // Resident pages are never re-marked as referenced, so the CLOCK
    // scan degenerates to FIFO and the two reports match exactly.
    assert_eq!(report.fifo, report.clock);
    println!();
    println!("Both policies produced identical counts on this workload");

    Ok(())
}
