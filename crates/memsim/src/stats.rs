use std::fmt;

use crate::process::ProcessId;

/// Memory state right after one successful load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadRecord {
    pub id: ProcessId,
    pub processes: usize,
    pub holes: usize,
    pub utilization: f64,
    pub cumulative_utilization: f64,
}

impl fmt::Display for LoadRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} loaded, #processes = {}, #holes = {}, %memusage = {:.2}, cumulative %mem = {:.2}",
            self.id, self.processes, self.holes, self.utilization, self.cumulative_utilization,
        )
    }
}

/// Averages over every load of one strategy run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub loads: usize,
    pub avg_processes: f64,
    pub avg_holes: f64,
    pub avg_utilization: f64,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total loads = {}, average #processes = {:.2}, average #holes = {:.2}, cumulative %mem = {:.2}",
            self.loads, self.avg_processes, self.avg_holes, self.avg_utilization,
        )
    }
}

/// Running totals, updated once per successful load.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    loads: usize,
    processes_total: usize,
    holes_total: usize,
    utilization_total: f64,
}

impl Statistics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one load and returns its record.
    pub fn record(
        &mut self,
        id: ProcessId,
        processes: usize,
        holes: usize,
        utilization: f64,
    ) -> LoadRecord {
        self.loads += 1;
        self.processes_total += processes;
        self.holes_total += holes;
        self.utilization_total += utilization;
        LoadRecord {
            id,
            processes,
            holes,
            utilization,
            cumulative_utilization: self.utilization_total / self.loads_f64(),
        }
    }

    /// Returns the averages so far; all zero before the first load.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn summary(&self) -> Summary {
        if self.loads == 0 {
            return Summary::default();
        }
        let loads = self.loads_f64();
        Summary {
            loads: self.loads,
            avg_processes: self.processes_total as f64 / loads,
            avg_holes: self.holes_total as f64 / loads,
            avg_utilization: self.utilization_total / loads,
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn loads_f64(&self) -> f64 {
        self.loads as f64
    }
}
