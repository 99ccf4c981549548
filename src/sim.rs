//! In-process stand-ins for the facilities the manager consumes.
//!
//! The manager only ever sees two collaborators: something that traps
//! illegal accesses and something that changes page permissions. This
//! module emulates both so the crate runs end to end without touching
//! real page tables:
//!
//! - **ProtectionMap**: per-page permission states, the manager's
//!   `ProtectionControl` backend and the driver's trap oracle
//! - **Access / trace**: workload description, parsing and generation
//! - **Simulation**: delivers traps for each access until the map
//!   permits it, the way a faulting instruction retries
//!
//! No replacement or counting logic lives here; everything observable
//! flows through the manager.

pub mod memory;
pub mod runner;
pub mod trace;

pub use memory::ProtectionMap;
pub use runner::{compare, ComparisonReport, Simulation};
pub use trace::{Access, AccessKind};
