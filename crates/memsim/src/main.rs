use std::{path::PathBuf, process};

use argh::FromArgs;
use log::LevelFilter;
use memsim::{
    DEFAULT_MAX_SWAPS, DEFAULT_MEMORY_SIZE, FitPolicy, SimConfig, Simulation,
    UnsatisfiablePolicy, logger,
};
use snafu::{ResultExt as _, ensure_whatever};
use snafu_utils::{GenericError, Report};

/// Simulate contiguous memory allocation and compare fit policies.
#[derive(Debug, FromArgs)]
struct Args {
    /// trace file of whitespace-separated `id size` pairs
    #[argh(positional)]
    trace: PathBuf,
    /// fit policy to run: best, worst, next or first (repeatable; all four
    /// by default)
    #[argh(option, short = 'p')]
    policy: Vec<FitPolicy>,
    /// size of the address space in units
    #[argh(option, default = "DEFAULT_MEMORY_SIZE")]
    memory_size: usize,
    /// number of swap-outs after which a process is retired
    #[argh(option, default = "DEFAULT_MAX_SWAPS")]
    max_swaps: u32,
    /// drop processes larger than memory instead of aborting
    #[argh(switch)]
    skip_unsatisfiable: bool,
    /// maximum log level: off, error, warn, info, debug or trace
    #[argh(option, default = "LevelFilter::Warn")]
    log_level: LevelFilter,
    /// disable colored output
    #[argh(switch)]
    no_color: bool,
}

fn main() {
    let args: Args = argh::from_env();
    if args.no_color {
        ansi_term::set_enabled(false);
    }

    if let Err(err) = run(&args) {
        let report = Report::new(err);
        eprintln!("{report}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), GenericError> {
    logger::init(args.log_level).whatever_context("failed to install logger")?;
    memsim::register_error_locations();

    ensure_whatever!(args.memory_size > 0, "memory size must be positive");
    let config = SimConfig {
        memory_size: args.memory_size,
        max_swaps: args.max_swaps,
        on_unsatisfiable: if args.skip_unsatisfiable {
            UnsatisfiablePolicy::Skip
        } else {
            UnsatisfiablePolicy::Abort
        },
    };

    let processes = memsim::read_trace(&args.trace).with_whatever_context(|_| {
        format!("failed to load trace, path={}", args.trace.display())
    })?;

    let policies = if args.policy.is_empty() {
        FitPolicy::ALL.to_vec()
    } else {
        args.policy.clone()
    };

    for (i, policy) in policies.into_iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("Start {policy} ...");

        let mut sim = Simulation::new(config, policy, processes.iter().cloned());
        let summary = sim
            .run_with(|record| println!("{record}"))
            .with_whatever_context(|_| format!("{policy} run failed"))?;
        println!("{summary}");
    }

    Ok(())
}
