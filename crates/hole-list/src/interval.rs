use core::fmt;

/// A closed address range `[start, end]`.
///
/// Unlike `Range<usize>`, both bounds are inclusive, so an `Interval` always
/// covers at least one unit.
///
/// # Examples
///
/// ```
/// use hole_list::Interval;
///
/// let iv = Interval::new(10, 19);
/// assert_eq!(iv.len(), 10);
/// assert!(iv.contains(19));
/// assert!(iv.is_followed_by(&Interval::new(20, 25)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    start: usize,
    end: usize,
}

impl Interval {
    /// Creates the interval `[start, end]`.
    ///
    /// # Panics
    ///
    /// Panics if `start > end`.
    #[must_use]
    #[track_caller]
    pub const fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "invalid interval: start > end");
        Self { start, end }
    }

    /// Creates the interval of `len` units beginning at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `len` is zero.
    #[must_use]
    #[track_caller]
    pub const fn with_len(start: usize, len: usize) -> Self {
        assert!(len > 0, "invalid interval: zero length");
        Self::new(start, start + len - 1)
    }

    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the number of units covered, `end - start + 1`.
    #[must_use]
    #[expect(clippy::len_without_is_empty)]
    pub const fn len(&self) -> usize {
        self.end - self.start + 1
    }

    #[must_use]
    pub const fn contains(&self, addr: usize) -> bool {
        self.start <= addr && addr <= self.end
    }

    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Returns `true` if `other` begins exactly one unit after `self` ends.
    #[must_use]
    pub const fn is_followed_by(&self, other: &Self) -> bool {
        self.end + 1 == other.start
    }

    pub(crate) const fn set_start(&mut self, start: usize) {
        debug_assert!(start <= self.end);
        self.start = start;
    }

    pub(crate) const fn set_end(&mut self, end: usize) {
        debug_assert!(self.start <= end);
        self.end = end;
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
