//! Free-space bookkeeping for contiguous allocation.
//!
//! A [`HoleList`] stores the free address ranges ("holes") of a fixed address
//! space as closed [`Interval`]s. Holes are kept sorted by start address and
//! are coalesced as soon as they touch, so the list never holds two
//! overlapping or adjacent holes.
//!
//! # Features
//!
//! - **Stable handles**: holes live in an arena and are addressed by
//!   [`HoleId`]; a handle to a deleted hole is detected, never reused
//! - **Low-end carving**: [`HoleList::remove`] splits a request off the low
//!   end of a hole, deleting the hole on an exact fit
//! - **Coalescing**: [`HoleList::insert`] merges a freed range with its left
//!   neighbor, its right neighbor, or both
//! - **Rotating cursor**: the list owns the starting point used by next-fit
//!   and keeps it on a live hole across every mutation
//! - **Fit policies**: [`FitPolicy`] selects a hole by best, worst, next, or
//!   first fit
//!
//! # Examples
//!
//! ```
//! use hole_list::{FitPolicy, HoleList, Interval};
//!
//! let mut holes = HoleList::new(Interval::new(0, 127));
//!
//! let hole = FitPolicy::First.select(&mut holes, 10).unwrap();
//! let a = holes.remove(hole, 10);
//! assert_eq!(a, Interval::new(0, 9));
//! assert_eq!(holes.intervals(), [Interval::new(10, 127)]);
//!
//! // Freeing the range coalesces it back into a single hole.
//! holes.insert(a);
//! assert_eq!(holes.intervals(), [Interval::new(0, 127)]);
//! ```
//!
//! # Performance
//!
//! - Insert: O(n) worst case, where n is the number of holes
//! - Remove: O(1)
//! - Fit selection: O(n)

pub use self::{
    fit::{FitPolicy, ParseFitPolicyError},
    interval::Interval,
    list::{HoleId, HoleList, InvariantError, Iter},
};

pub mod fit;
mod interval;
mod list;
