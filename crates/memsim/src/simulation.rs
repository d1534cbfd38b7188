use hole_list::FitPolicy;
use log::{debug, info, warn};
use snafu::{Snafu, ensure};
use snafu_utils::{HasLocation, Location};

use crate::{
    allocator::Memory,
    config::SimConfig,
    process::{Process, ProcessId, ProcessQueue},
    stats::{LoadRecord, Statistics, Summary},
};

#[derive(Debug, Snafu)]
pub enum SimulationError {
    #[snafu(display(
        "process {id} needs {size} units, which do not fit even in empty memory of {capacity} units"
    ))]
    Unsatisfiable {
        #[snafu(implicit)]
        location: Location,
        id: ProcessId,
        size: usize,
        capacity: usize,
    },
}

impl HasLocation for SimulationError {
    fn location(&self) -> Location {
        match self {
            Self::Unsatisfiable { location, .. } => *location,
        }
    }
}

/// Everything one strategy run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub policy: FitPolicy,
    pub loads: Vec<LoadRecord>,
    pub summary: Summary,
}

/// One strategy run over a trace.
///
/// Processes are loaded in arrival order. When no hole fits, the oldest
/// admitted process is swapped out and the load is retried. A swapped-out
/// process goes back to the end of the wait queue unless it has reached the
/// swap limit, in which case it is retired.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimConfig,
    memory: Memory,
    waiting: ProcessQueue,
    admitted: ProcessQueue,
    stats: Statistics,
    retired: Vec<ProcessId>,
    skipped: Vec<ProcessId>,
}

impl Simulation {
    pub fn new<I>(config: SimConfig, policy: FitPolicy, processes: I) -> Self
    where
        I: IntoIterator<Item = Process>,
    {
        Self {
            config,
            memory: Memory::new(config.memory_size, policy),
            waiting: processes.into_iter().collect(),
            admitted: ProcessQueue::new(),
            stats: Statistics::new(),
            retired: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    #[must_use]
    pub fn waiting(&self) -> &ProcessQueue {
        &self.waiting
    }

    #[must_use]
    pub fn admitted(&self) -> &ProcessQueue {
        &self.admitted
    }

    /// Returns the processes retired after reaching the swap limit.
    #[must_use]
    pub fn retired(&self) -> &[ProcessId] {
        &self.retired
    }

    /// Returns the processes dropped because they could never fit.
    #[must_use]
    pub fn skipped(&self) -> &[ProcessId] {
        &self.skipped
    }

    /// Runs until the wait queue is empty, calling `on_load` after every
    /// successful load.
    pub fn run_with<F>(&mut self, mut on_load: F) -> Result<Summary, SimulationError>
    where
        F: FnMut(&LoadRecord),
    {
        info!(
            "{}: {} processes over {} units",
            self.memory.policy(),
            self.waiting.len(),
            self.memory.capacity()
        );
        while let Some(process) = self.waiting.pop_front() {
            if let Some(record) = self.load(process)? {
                on_load(&record);
            }
        }
        let summary = self.stats.summary();
        info!(
            "{}: finished after {} loads, {} retired, {} skipped",
            self.memory.policy(),
            summary.loads,
            self.retired.len(),
            self.skipped.len()
        );
        Ok(summary)
    }

    /// Runs to completion and collects every load record.
    pub fn run(mut self) -> Result<RunReport, SimulationError> {
        let mut loads = Vec::new();
        let summary = self.run_with(|record| loads.push(*record))?;
        Ok(RunReport {
            policy: self.memory.policy(),
            loads,
            summary,
        })
    }

    fn load(&mut self, mut process: Process) -> Result<Option<LoadRecord>, SimulationError> {
        let (id, size) = (process.id(), process.size());
        let capacity = self.memory.capacity();
        if size > capacity && self.config.on_unsatisfiable.is_skip() {
            warn!("{id} needs {size} units but memory holds {capacity}; skipped");
            self.skipped.push(id);
            return Ok(None);
        }

        while self.memory.allocate(&mut process).is_err() {
            ensure!(
                self.swap_out().is_some(),
                UnsatisfiableSnafu { id, size, capacity }
            );
        }

        self.admitted.push_back(process);
        self.check_consistency();
        Ok(Some(self.stats.record(
            id,
            self.admitted.len(),
            self.memory.holes().len(),
            self.memory.utilization(),
        )))
    }

    /// Evicts the oldest admitted process, returning its id.
    fn swap_out(&mut self) -> Option<ProcessId> {
        let mut victim = self.admitted.pop_front()?;
        let id = victim.id();
        self.memory.release(&mut victim);
        let swaps = victim.record_swap_out();
        if swaps >= self.config.max_swaps {
            debug!("{id} swapped out {swaps} times; retired");
            self.retired.push(id);
        } else {
            debug!("{id} swapped out ({swaps}/{})", self.config.max_swaps);
            self.waiting.push_back(victim);
        }
        Some(id)
    }

    fn check_consistency(&self) {
        debug_assert_eq!(self.memory.holes().validate(), Ok(()));
        debug_assert_eq!(self.memory.usage(), self.admitted.total_size());
        debug_assert_eq!(
            self.memory.holes().free_units() + self.memory.usage(),
            self.memory.capacity()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::UnsatisfiablePolicy, trace::parse_trace};

    fn simulation(policy: FitPolicy, trace: &str) -> Simulation {
        Simulation::new(
            SimConfig::default(),
            policy,
            parse_trace(trace).unwrap(),
        )
    }

    fn loaded_ids(report: &RunReport) -> String {
        report.loads.iter().map(|r| r.id.0).collect()
    }

    #[test]
    fn test_loads_without_swapping() {
        let report = simulation(FitPolicy::First, "A 20 B 30").run().unwrap();
        assert_eq!(loaded_ids(&report), "AB");
        let b = report.loads[1];
        assert_eq!((b.processes, b.holes), (2, 1));
        assert!((b.utilization - 50.0 / 128.0 * 100.0).abs() < 1e-9);
        assert_eq!(report.summary.loads, 2);
    }

    #[test]
    fn test_swap_out_retires_after_three_evictions() {
        let mut sim = simulation(FitPolicy::First, "A 100 B 50");
        let summary = sim.run_with(|_| {}).unwrap();
        assert_eq!(summary.loads, 6);
        assert_eq!(sim.retired(), [ProcessId('A')]);
        assert!(sim.waiting().is_empty());

        let admitted: Vec<_> = sim.admitted().iter().collect();
        assert_eq!(admitted.len(), 1);
        assert_eq!(admitted[0].id(), ProcessId('B'));
        assert_eq!(admitted[0].swap_count(), 2);
    }

    #[test]
    fn test_load_order_with_swapping() {
        let report = simulation(FitPolicy::Best, "A 100 B 50").run().unwrap();
        assert_eq!(loaded_ids(&report), "ABABAB");
        assert!(report.loads.iter().all(|r| r.processes == 1));
    }

    #[test]
    fn test_unsatisfiable_aborts() {
        let mut sim = simulation(FitPolicy::First, "A 100 B 200 C 10");
        let mut seen = Vec::new();
        let err = sim.run_with(|r| seen.push(r.id)).unwrap_err();
        assert!(
            matches!(err, SimulationError::Unsatisfiable { id: ProcessId('B'), size: 200, capacity: 128, .. }),
            "{err:?}"
        );
        assert_eq!(seen, [ProcessId('A')]);
    }

    #[test]
    fn test_unsatisfiable_skipped() {
        let config = SimConfig {
            on_unsatisfiable: UnsatisfiablePolicy::Skip,
            ..SimConfig::default()
        };
        let processes = parse_trace("A 100 B 200 C 10").unwrap();
        let mut sim = Simulation::new(config, FitPolicy::First, processes);
        let mut seen = String::new();
        sim.run_with(|r| seen.push(r.id.0)).unwrap();
        assert_eq!(seen, "AC");
        assert_eq!(sim.skipped(), [ProcessId('B')]);
        assert_eq!(sim.admitted().total_size(), 110);
        assert!(sim.admitted().iter().all(|p| p.swap_count() == 0));
        assert!(sim.retired().is_empty());
    }

    #[test]
    fn test_skipping_leaves_residents_alone() {
        let config = SimConfig {
            on_unsatisfiable: UnsatisfiablePolicy::Skip,
            max_swaps: 1,
            ..SimConfig::default()
        };
        let processes = parse_trace("A 60 B 60 X 129 Y 500").unwrap();
        let mut sim = Simulation::new(config, FitPolicy::Best, processes);
        let summary = sim.run_with(|_| {}).unwrap();
        assert_eq!(summary.loads, 2);
        assert_eq!(sim.skipped(), [ProcessId('X'), ProcessId('Y')]);
        assert!(sim.retired().is_empty());
        assert_eq!(sim.memory().usage(), 120);
    }

    #[test]
    fn test_empty_trace() {
        let report = simulation(FitPolicy::Next, "").run().unwrap();
        assert!(report.loads.is_empty());
        assert_eq!(report.summary, Summary::default());
    }

    #[test]
    fn test_custom_memory_size() {
        let config = SimConfig {
            memory_size: 64,
            ..SimConfig::default()
        };
        let processes = parse_trace("A 40 B 40").unwrap();
        let mut sim = Simulation::new(config, FitPolicy::Worst, processes);
        let summary = sim.run_with(|_| {}).unwrap();
        assert_eq!(sim.memory().capacity(), 64);
        assert!(summary.loads >= 2);
        assert!(sim.memory().usage() <= 64);
    }
}
