use hole_list::{FitPolicy, HoleList, Interval};
use log::trace;

use crate::process::{Process, ProcessId};

/// No hole is large enough for the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("no hole fits process {id} ({size} units)")]
pub struct NoFit {
    pub id: ProcessId,
    pub size: usize,
}

/// A fixed address space whose free ranges are handed out by a fit policy.
#[derive(Debug, Clone)]
pub struct Memory {
    holes: HoleList,
    policy: FitPolicy,
    capacity: usize,
    usage: usize,
}

impl Memory {
    /// Creates a memory of `capacity` units, all free.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize, policy: FitPolicy) -> Self {
        Self {
            holes: HoleList::new(Interval::with_len(0, capacity)),
            policy,
            capacity,
            usage: 0,
        }
    }

    #[must_use]
    pub fn holes(&self) -> &HoleList {
        &self.holes
    }

    #[must_use]
    pub fn policy(&self) -> FitPolicy {
        self.policy
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of units bound to processes.
    #[must_use]
    pub fn usage(&self) -> usize {
        self.usage
    }

    /// Returns the bound share of the address space as a percentage.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn utilization(&self) -> f64 {
        self.usage as f64 / self.capacity as f64 * 100.0
    }

    /// Picks a hole with the memory's fit policy and binds a range carved
    /// from its low end to `process`.
    ///
    /// # Panics
    ///
    /// Panics if `process` already occupies a range.
    pub fn allocate(&mut self, process: &mut Process) -> Result<Interval, NoFit> {
        let size = process.size();
        let hole = self
            .policy
            .select(&mut self.holes, size)
            .ok_or(NoFit {
                id: process.id(),
                size,
            })?;
        let range = self.holes.remove(hole, size);
        process.bind(range);
        self.usage += size;
        trace!("{} bound to {range}\n{}", process.id(), self.holes);
        Ok(range)
    }

    /// Returns the range held by `process` to the free list.
    ///
    /// Returns the released range, or `None` if the process held nothing.
    pub fn release(&mut self, process: &mut Process) -> Option<Interval> {
        let range = process.unbind()?;
        self.holes.insert(range);
        self.usage -= range.len();
        trace!("{} released {range}\n{}", process.id(), self.holes);
        Some(range)
    }
}
