use std::{collections::VecDeque, fmt};

use hole_list::Interval;

/// The single-character name of a process in a trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProcessId(pub char);

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A process waiting for, or holding, a contiguous range of memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    id: ProcessId,
    size: usize,
    swap_count: u32,
    bound: Option<Interval>,
}

impl Process {
    #[must_use]
    pub fn new(id: ProcessId, size: usize) -> Self {
        Self {
            id,
            size,
            swap_count: 0,
            bound: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// Returns the number of units the process asks for.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns how many times the process has been swapped out.
    #[must_use]
    pub fn swap_count(&self) -> u32 {
        self.swap_count
    }

    /// Returns the range the process currently occupies.
    #[must_use]
    pub fn bound(&self) -> Option<Interval> {
        self.bound
    }

    pub(crate) fn bind(&mut self, range: Interval) {
        assert!(
            self.bound.is_none(),
            "process {} is already bound to {range}",
            self.id
        );
        debug_assert_eq!(range.len(), self.size);
        self.bound = Some(range);
    }

    pub(crate) fn unbind(&mut self) -> Option<Interval> {
        self.bound.take()
    }

    pub(crate) fn record_swap_out(&mut self) -> u32 {
        self.swap_count += 1;
        self.swap_count
    }
}

/// A first-in first-out queue of processes.
#[derive(Debug, Clone, Default)]
pub struct ProcessQueue {
    processes: VecDeque<Process>,
}

impl ProcessQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_back(&mut self, process: Process) {
        self.processes.push_back(process);
    }

    pub fn pop_front(&mut self) -> Option<Process> {
        self.processes.pop_front()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Process> {
        self.processes.iter()
    }

    /// Returns the summed size of every queued process.
    #[must_use]
    pub fn total_size(&self) -> usize {
        self.processes.iter().map(Process::size).sum()
    }
}

impl FromIterator<Process> for ProcessQueue {
    fn from_iter<T: IntoIterator<Item = Process>>(iter: T) -> Self {
        Self {
            processes: iter.into_iter().collect(),
        }
    }
}
