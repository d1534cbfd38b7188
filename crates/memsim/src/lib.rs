//! Contiguous memory allocation simulator.
//!
//! A trace of processes is loaded into a fixed address space one process at
//! a time. Free space is tracked by a [`hole_list::HoleList`] and holes are
//! chosen by a [`FitPolicy`]. When nothing fits, the oldest resident process
//! is swapped out; a process swapped out too often is retired. Every
//! successful load is recorded so that the policies can be compared by
//! process count, hole count, and memory utilization.

pub use hole_list::{FitPolicy, Interval};

pub use self::{
    allocator::{Memory, NoFit},
    config::{DEFAULT_MAX_SWAPS, DEFAULT_MEMORY_SIZE, SimConfig, UnsatisfiablePolicy},
    process::{Process, ProcessId, ProcessQueue},
    simulation::{RunReport, Simulation, SimulationError},
    stats::{LoadRecord, Statistics, Summary},
    trace::{TraceError, parse_trace, read_trace},
};

mod allocator;
mod config;
pub mod logger;
mod process;
mod simulation;
mod stats;
pub mod trace;

/// Lets [`snafu_utils::Report`] print where this crate's errors were raised.
pub fn register_error_locations() {
    snafu_utils::register_location::<TraceError>();
    snafu_utils::register_location::<SimulationError>();
}
