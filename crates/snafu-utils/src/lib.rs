use std::{error::Error, fmt};

use ansi_term::{Color, WithFg};
use snafu::{GenerateImplicitData, Snafu};

/// The source location an error was raised at.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Location(&'static std::panic::Location<'static>);

impl Default for Location {
    #[track_caller]
    fn default() -> Self {
        Self(std::panic::Location::caller())
    }
}

impl GenerateImplicitData for Location {
    #[track_caller]
    fn generate() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Errors that remember where they were raised.
///
/// [`Report`] prints the location of every error in a chain that implements
/// this trait and is registered in [`location_of`].
pub trait HasLocation {
    fn location(&self) -> Location;
}

#[derive(Debug, Snafu)]
#[snafu(whatever, display("{message}"))]
pub struct GenericError {
    message: String,
    #[snafu(implicit)]
    location: Location,
    #[snafu(source(from(Box<dyn Error + Send + Sync>, Some)))]
    source: Option<Box<dyn Error + Send + Sync>>,
}

impl HasLocation for GenericError {
    fn location(&self) -> Location {
        self.location
    }
}

type LocationProbe = fn(&(dyn Error + 'static)) -> Option<Location>;

/// Probes used by [`Report`] to find the location of an error in a chain.
static LOCATION_PROBES: std::sync::RwLock<Vec<LocationProbe>> =
    std::sync::RwLock::new(Vec::new());

/// Registers `E` so that [`Report`] prints its location.
pub fn register_location<E>()
where
    E: Error + HasLocation + 'static,
{
    let probe: LocationProbe = |err| err.downcast_ref::<E>().map(HasLocation::location);
    if let Ok(mut probes) = LOCATION_PROBES.write() {
        probes.push(probe);
    }
}

/// Returns the location `err` was raised at, if its type is known.
#[must_use]
pub fn location_of(err: &(dyn Error + 'static)) -> Option<Location> {
    if let Some(generic) = err.downcast_ref::<GenericError>() {
        return Some(generic.location);
    }
    let probes = LOCATION_PROBES.read().ok()?;
    probes.iter().find_map(|probe| probe(err))
}

/// Prints an error and its chain of sources.
pub struct Report<E> {
    error: E,
}

impl<E> fmt::Debug for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl<E> fmt::Display for Report<E>
where
    E: Error + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Error: {}", WithFg::new(Color::Red, &self.error))?;
        if let Some(loc) = location_of(&self.error) {
            writeln!(f, "  at {}", WithFg::new(Color::DarkGray, loc))?;
        }
        let mut source = self.error.source();
        if source.is_some() {
            writeln!(f)?;
            writeln!(f, "Caused by:")?;
        }
        let mut index = 0;
        while let Some(s) = source {
            writeln!(f, "{index:4}: {}", WithFg::new(Color::Red, s))?;
            if let Some(loc) = location_of(s) {
                writeln!(f, "      at {}", WithFg::new(Color::DarkGray, loc))?;
            }
            source = s.source();
            index += 1;
        }
        Ok(())
    }
}

impl<E> Report<E> {
    pub fn new(error: E) -> Self {
        Self { error }
    }
}
