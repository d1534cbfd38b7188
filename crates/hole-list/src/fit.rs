//! Hole selection policies.
//!
//! Every policy looks for a hole with at least the requested number of
//! units. Best, worst and first fit walk the list in address order and
//! differ only in which candidate they keep; next fit resumes from the
//! list's cursor and leaves the cursor on the hole it picks.

use core::{fmt, str::FromStr};

use crate::{HoleId, HoleList};

/// A policy for choosing which hole satisfies an allocation request.
///
/// # Examples
///
/// ```
/// use hole_list::{FitPolicy, HoleList, Interval};
///
/// let mut holes = HoleList::empty();
/// holes.insert(Interval::new(0, 4));
/// holes.insert(Interval::new(10, 19));
///
/// let best = FitPolicy::Best.select(&mut holes, 4).unwrap();
/// let worst = FitPolicy::Worst.select(&mut holes, 4).unwrap();
/// assert_eq!(holes.get(best), Some(Interval::new(0, 4)));
/// assert_eq!(holes.get(worst), Some(Interval::new(10, 19)));
/// assert_eq!(FitPolicy::First.select(&mut holes, 11), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FitPolicy {
    /// The smallest sufficient hole; the lowest address wins ties.
    Best,
    /// The largest sufficient hole; the lowest address wins ties.
    Worst,
    /// The first sufficient hole at or after the cursor, wrapping around.
    Next,
    /// The lowest-addressed sufficient hole.
    First,
}

impl FitPolicy {
    /// All policies, in the order a full comparison runs them.
    pub const ALL: [Self; 4] = [Self::Best, Self::Worst, Self::Next, Self::First];

    /// Returns the hole this policy picks for a request of `size` units, or
    /// `None` if no hole is large enough.
    ///
    /// Only [`FitPolicy::Next`] changes the list: it moves the cursor past
    /// every hole it rejects, visiting each hole at most once. When nothing
    /// fits, the cursor is left where the full lap ended.
    pub fn select(self, holes: &mut HoleList, size: usize) -> Option<HoleId> {
        match self {
            Self::Best => pick_by(holes, size, |candidate, kept| candidate < kept),
            Self::Worst => pick_by(holes, size, |candidate, kept| candidate > kept),
            Self::First => candidates(holes, size).next().map(|(id, _)| id),
            Self::Next => next_fit(holes, size),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Best => "best fit",
            Self::Worst => "worst fit",
            Self::Next => "next fit",
            Self::First => "first fit",
        }
    }
}

impl fmt::Display for FitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The error returned when a string names no known [`FitPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown fit policy `{input}` (expected best, worst, next or first)")]
pub struct ParseFitPolicyError {
    input: String,
}

impl FromStr for FitPolicy {
    type Err = ParseFitPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let name = lower
            .strip_suffix("-fit")
            .or_else(|| lower.strip_suffix("fit"))
            .unwrap_or(&lower);
        match name {
            "best" => Ok(Self::Best),
            "worst" => Ok(Self::Worst),
            "next" => Ok(Self::Next),
            "first" => Ok(Self::First),
            _ => Err(ParseFitPolicyError {
                input: s.to_owned(),
            }),
        }
    }
}

fn candidates(holes: &HoleList, size: usize) -> impl Iterator<Item = (HoleId, usize)> + '_ {
    holes
        .iter()
        .map(|(id, interval)| (id, interval.len()))
        .filter(move |&(_, len)| len >= size)
}

/// Keeps the first candidate in address order and replaces it only when
/// `prefer(candidate_len, kept_len)` holds, so ties go to the lower address.
fn pick_by<F>(holes: &HoleList, size: usize, prefer: F) -> Option<HoleId>
where
    F: Fn(usize, usize) -> bool,
{
    candidates(holes, size)
        .reduce(|kept, candidate| {
            if prefer(candidate.1, kept.1) {
                candidate
            } else {
                kept
            }
        })
        .map(|(id, _)| id)
}

fn next_fit(holes: &mut HoleList, size: usize) -> Option<HoleId> {
    for _ in 0..holes.len() {
        let cursor = holes.cursor()?;
        if holes.get(cursor).is_some_and(|hole| hole.len() >= size) {
            return Some(cursor);
        }
        holes.advance_cursor();
    }
    None
}
