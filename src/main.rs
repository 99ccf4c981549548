//! pagesim - page-replacement simulator CLI

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use pagesim::policy::PolicyKind;
use pagesim::region::{VirtAddr, VirtualRegion};
use pagesim::sim::{self, trace, Simulation};
use pagesim::stats::FaultStats;
use std::path::PathBuf;

/// Base address of the simulated region; arbitrary, never dereferenced.
const REGION_BASE: usize = 0x10_0000;

/// pagesim - FIFO vs CLOCK page replacement under a fixed frame pool
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of physical frames
    #[arg(short, long, default_value = "4")]
    frames: usize,

    /// Number of pages in the virtual region
    #[arg(short, long, default_value = "64")]
    pages: u32,

    /// Page size in bytes
    #[arg(long, default_value = "4096")]
    page_size: usize,

    /// Replacement policy: fifo, clock or both
    #[arg(short = 'P', long, default_value = "both")]
    policy: String,

    /// Trace file (one `r <page>` or `w <page>` per line)
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Length of the generated workload when no trace file is given
    #[arg(short = 'n', long, default_value = "1000")]
    length: usize,

    /// Probability that a generated access is a write
    #[arg(long, default_value = "0.3")]
    write_ratio: f64,

    /// Seed for workload generation
    #[arg(short, long, default_value = "42")]
    seed: u64,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    if !(0.0..=1.0).contains(&args.write_ratio) {
        bail!("Write ratio {} is not a probability", args.write_ratio);
    }

    // Build the simulated region
    let region = VirtualRegion::new(
        VirtAddr(REGION_BASE),
        args.pages as usize * args.page_size,
        args.page_size,
    )
    .context("Invalid region geometry")?;

    // Load or generate the workload
    let workload = match &args.trace {
        Some(path) => {
            println!("📄 Loading trace from {}", path.display());
            trace::load(path)
                .with_context(|| format!("Failed to load trace {}", path.display()))?
        }
        None => {
            println!(
                "🎲 Generating {} accesses over {} pages (write ratio {}, seed {})",
                args.length, args.pages, args.write_ratio, args.seed
            );
            trace::random(args.length, args.pages, args.write_ratio, args.seed)
        }
    };

    println!(
        "🧮 Region: {} pages of {} bytes, {} frames",
        args.pages, args.page_size, args.frames
    );
    println!();

    // Run the requested policy (or both) over the same workload
    match args.policy.as_str() {
        "both" => {
            let report =
                sim::compare(region, args.frames, &workload).context("Simulation failed")?;
            print_report("fifo", &report.fifo);
            print_report("clock", &report.clock);
        }
        other => {
            let kind: PolicyKind = other.parse().context("Unknown policy")?;
            let mut simulation = Simulation::new(region, args.frames, kind)?;
            simulation.run(&workload).context("Simulation failed")?;
            print_report(&kind.to_string(), simulation.manager().stats());
        }
    }

    Ok(())
}

/// Prints one policy's final counters.
fn print_report(policy: &str, stats: &FaultStats) {
    println!("== {} ==", policy);
    println!("   traps:               {}", stats.total_trap_count());
    println!("   faults:              {}", stats.total_fault_count());
    println!("   write-backs:         {}", stats.total_write_back_count());
    if stats.protection_failure_count() > 0 {
        println!("   protection failures: {}", stats.protection_failure_count());
    }
    let ranked = stats.most_evicted(5);
    if ranked.is_empty() {
        println!("   no evictions");
    } else {
        println!("   most evicted pages:");
        for (page, count) in ranked {
            println!("     page {:>4}: {} evictions", page, count);
        }
    }
    println!();
}
