//! Process trace input.
//!
//! A trace is a whitespace-separated sequence of `id size` pairs, where `id`
//! is a single character and `size` a positive number of units:
//!
//! ```text
//! A 20
//! B 40  C 8
//! ```

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use snafu::{OptionExt as _, ResultExt as _, Snafu};
use snafu_utils::{HasLocation, Location};

use crate::process::{Process, ProcessId};

#[derive(Debug, Snafu)]
pub enum TraceError {
    #[snafu(display("failed to read trace file {}", path.display()))]
    Read {
        #[snafu(implicit)]
        location: Location,
        path: PathBuf,
        source: io::Error,
    },
    #[snafu(display("process id `{token}` is not a single character (entry {entry})"))]
    InvalidId {
        #[snafu(implicit)]
        location: Location,
        entry: usize,
        token: String,
    },
    #[snafu(display("process {id} has no size (entry {entry})"))]
    MissingSize {
        #[snafu(implicit)]
        location: Location,
        entry: usize,
        id: ProcessId,
    },
    #[snafu(display("process {id} has invalid size `{token}` (entry {entry})"))]
    InvalidSize {
        #[snafu(implicit)]
        location: Location,
        entry: usize,
        id: ProcessId,
        token: String,
    },
}

impl HasLocation for TraceError {
    fn location(&self) -> Location {
        match self {
            Self::Read { location, .. }
            | Self::InvalidId { location, .. }
            | Self::MissingSize { location, .. }
            | Self::InvalidSize { location, .. } => *location,
        }
    }
}

/// Parses a whole trace. Any malformed entry fails the whole trace.
pub fn parse_trace(input: &str) -> Result<Vec<Process>, TraceError> {
    let mut tokens = input.split_whitespace();
    let mut processes = Vec::new();
    while let Some(token) = tokens.next() {
        let entry = processes.len() + 1;
        let id = parse_id(token).context(InvalidIdSnafu { entry, token })?;
        let size = tokens.next().context(MissingSizeSnafu { entry, id })?;
        let size = parse_size(size).context(InvalidSizeSnafu {
            entry,
            id,
            token: size,
        })?;
        processes.push(Process::new(id, size));
    }
    Ok(processes)
}

/// Reads and parses the trace stored at `path`.
pub fn read_trace(path: &Path) -> Result<Vec<Process>, TraceError> {
    let input = fs::read_to_string(path).context(ReadSnafu { path })?;
    parse_trace(&input)
}

fn parse_id(token: &str) -> Option<ProcessId> {
    let mut chars = token.chars();
    let id = chars.next()?;
    chars.next().is_none().then_some(ProcessId(id))
}

fn parse_size(token: &str) -> Option<usize> {
    token.parse().ok().filter(|&size| size > 0)
}
