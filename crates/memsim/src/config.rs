/// Size of the simulated address space, in units.
pub const DEFAULT_MEMORY_SIZE: usize = 128;

/// Number of swap-outs after which a process is retired.
pub const DEFAULT_MAX_SWAPS: u32 = 3;

/// What to do with a process that does not fit even in empty memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, derive_more::IsVariant)]
pub enum UnsatisfiablePolicy {
    /// Stop the run with [`SimulationError::Unsatisfiable`].
    ///
    /// [`SimulationError::Unsatisfiable`]: crate::SimulationError::Unsatisfiable
    #[default]
    Abort,
    /// Drop the process with a warning and keep going.
    Skip,
}

/// Parameters shared by every strategy run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub memory_size: usize,
    pub max_swaps: u32,
    pub on_unsatisfiable: UnsatisfiablePolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            max_swaps: DEFAULT_MAX_SWAPS,
            on_unsatisfiable: UnsatisfiablePolicy::Abort,
        }
    }
}
