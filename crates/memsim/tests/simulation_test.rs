#![cfg(test)]

use std::collections::HashMap;

use memsim::{
    FitPolicy, LoadRecord, Process, ProcessId, SimConfig, Simulation, UnsatisfiablePolicy,
    parse_trace,
};
use proptest::prelude::*;

/// Four residents leave an 8-unit hole at the top; E forces A out, which
/// opens a 30-unit hole at the bottom, and F (8 units) then chooses between
/// the leftover 10-unit hole and the 8-unit one.
const FRAGMENTING: &str = "A 30 B 10 C 30 D 50 E 20 F 8";

fn first_loads(policy: FitPolicy, trace: &str, count: usize) -> Vec<LoadRecord> {
    let mut loads = Vec::new();
    let mut sim = Simulation::new(SimConfig::default(), policy, parse_trace(trace).unwrap());
    sim.run_with(|record| loads.push(*record)).unwrap();
    loads.truncate(count);
    loads
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "{actual} != {expected}");
}

#[test]
fn swap_out_opens_a_hole() {
    let loads = first_loads(FitPolicy::First, FRAGMENTING, 5);
    let d = loads[3];
    assert_eq!((d.id, d.processes, d.holes), (ProcessId('D'), 4, 1));
    assert_close(d.utilization, 93.75);

    let e = loads[4];
    assert_eq!((e.id, e.processes, e.holes), (ProcessId('E'), 4, 2));
    assert_close(e.utilization, 110.0 / 128.0 * 100.0);
}

#[test]
fn best_fit_consumes_exact_hole() {
    let f = first_loads(FitPolicy::Best, FRAGMENTING, 6)[5];
    assert_eq!((f.id, f.processes, f.holes), (ProcessId('F'), 5, 1));
    assert_close(f.utilization, 118.0 / 128.0 * 100.0);
}

#[test]
fn other_policies_split_larger_hole() {
    for policy in [FitPolicy::Worst, FitPolicy::First, FitPolicy::Next] {
        let f = first_loads(policy, FRAGMENTING, 6)[5];
        assert_eq!((f.id, f.processes, f.holes), (ProcessId('F'), 5, 2), "{policy}");
    }
}

#[test]
fn cumulative_utilization_is_running_mean() {
    let loads = first_loads(FitPolicy::First, "A 64 B 32", 2);
    assert_close(loads[0].cumulative_utilization, 50.0);
    assert_close(loads[1].cumulative_utilization, 62.5);
}

#[test]
fn policies_run_independently() {
    let processes = parse_trace(FRAGMENTING).unwrap();
    let reports: Vec<_> = FitPolicy::ALL
        .into_iter()
        .map(|policy| {
            Simulation::new(SimConfig::default(), policy, processes.iter().cloned())
                .run()
                .unwrap()
        })
        .collect();
    let again = Simulation::new(SimConfig::default(), FitPolicy::Best, processes)
        .run()
        .unwrap();
    assert_eq!(reports[0].loads, again.loads);
    assert_eq!(reports[0].summary, again.summary);
    assert_eq!(reports.iter().map(|r| r.policy).collect::<Vec<_>>(), FitPolicy::ALL);
}

fn trace() -> impl Strategy<Value = Vec<Process>> {
    prop::collection::vec(1..=160_usize, 0..30).prop_map(|sizes| {
        sizes
            .into_iter()
            .zip(('A'..='Z').chain('a'..='z'))
            .map(|(size, id)| Process::new(ProcessId(id), size))
            .collect()
    })
}

proptest! {
    #[test]
    fn runs_keep_memory_consistent(processes in trace(), policy in 0..4_usize) {
        let config = SimConfig {
            on_unsatisfiable: UnsatisfiablePolicy::Skip,
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config, FitPolicy::ALL[policy], processes.clone());
        let mut loads_per_id: HashMap<ProcessId, u32> = HashMap::new();
        sim.run_with(|record| {
            *loads_per_id.entry(record.id).or_default() += 1;
            assert!(record.utilization <= 100.0);
            assert!(record.processes >= 1);
        })
        .unwrap();

        let memory = sim.memory();
        prop_assert_eq!(memory.holes().validate(), Ok(()));
        prop_assert_eq!(memory.usage(), sim.admitted().total_size());
        prop_assert_eq!(memory.holes().free_units() + memory.usage(), memory.capacity());
        prop_assert!(sim.waiting().is_empty());

        for count in loads_per_id.values() {
            prop_assert!(*count <= config.max_swaps);
        }
        for id in sim.retired() {
            prop_assert_eq!(loads_per_id[id], config.max_swaps);
            prop_assert!(sim.admitted().iter().all(|p| p.id() != *id));
        }
        for id in sim.skipped() {
            let size = processes.iter().find(|p| p.id() == *id).unwrap().size();
            prop_assert!(size > memory.capacity());
        }
    }

    #[test]
    fn satisfiable_traces_never_abort(sizes in prop::collection::vec(1..=128_usize, 0..30)) {
        let processes: Vec<_> = sizes
            .into_iter()
            .zip('A'..='~')
            .map(|(size, id)| Process::new(ProcessId(id), size))
            .collect();
        for policy in FitPolicy::ALL {
            let report = Simulation::new(SimConfig::default(), policy, processes.clone()).run();
            prop_assert!(report.is_ok());
        }
    }
}
