use core::{fmt, iter::FusedIterator};

use crate::Interval;

/// A handle to a hole stored in a [`HoleList`].
///
/// Handles stay valid while the hole they name is alive, even if it grows or
/// shrinks. Once the hole is deleted (exact-fit removal or absorption during
/// a merge), the handle becomes stale and [`HoleList::get`] returns `None`
/// for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HoleId {
    index: usize,
    generation: u32,
}

/// A broken [`HoleList`] invariant reported by [`HoleList::validate`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[non_exhaustive]
pub enum InvariantError {
    #[display("holes out of order or overlapping: {prev} before {next}")]
    Overlapping { prev: Interval, next: Interval },
    #[display("adjacent holes not merged: {prev} and {next}")]
    Adjacent { prev: Interval, next: Interval },
    #[display("broken back link at hole {hole}")]
    BrokenLink { hole: Interval },
    #[display("tail does not point at the last hole")]
    TailMismatch,
    #[display("recorded length {recorded} differs from live holes {actual}")]
    LengthMismatch { recorded: usize, actual: usize },
    #[display("cursor missing on a non-empty list")]
    MissingCursor,
    #[display("cursor does not point at a live hole")]
    DanglingCursor,
}

#[derive(Debug, Clone, Copy)]
struct Node {
    interval: Interval,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// An address-ordered list of disjoint, non-adjacent free intervals.
///
/// Nodes live in a slot arena and are linked in both directions by index.
/// Exactly one hole is the *cursor* while the list is non-empty; it is the
/// starting point of a next-fit search (see [`FitPolicy::Next`]).
///
/// [`FitPolicy::Next`]: crate::FitPolicy::Next
///
/// # Examples
///
/// ```
/// use hole_list::{HoleList, Interval};
///
/// let mut holes = HoleList::empty();
/// holes.insert(Interval::new(0, 4));
/// holes.insert(Interval::new(10, 14));
/// assert_eq!(holes.len(), 2);
///
/// // Touching both neighbors collapses three ranges into one hole.
/// holes.insert(Interval::new(5, 9));
/// assert_eq!(holes.intervals(), [Interval::new(0, 14)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct HoleList {
    slots: Vec<Slot>,
    free_slots: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    cursor: Option<usize>,
    len: usize,
}

impl HoleList {
    /// Creates a list with no holes. The cursor is undefined until the first
    /// insertion.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a list holding a single hole that spans `space`.
    #[must_use]
    pub fn new(space: Interval) -> Self {
        let mut this = Self::empty();
        this.insert(space);
        this
    }

    /// Returns the number of holes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the lowest-addressed hole.
    #[must_use]
    pub fn first(&self) -> Option<HoleId> {
        self.head.map(|index| self.id(index))
    }

    /// Returns the highest-addressed hole.
    #[must_use]
    pub fn last(&self) -> Option<HoleId> {
        self.tail.map(|index| self.id(index))
    }

    /// Returns the hole that follows `id` in address order, without wrapping.
    #[must_use]
    pub fn next(&self, id: HoleId) -> Option<HoleId> {
        let index = self.resolve(id)?;
        self.node(index).next.map(|next| self.id(next))
    }

    /// Returns the interval currently covered by `id`, or `None` if the
    /// handle is stale.
    #[must_use]
    pub fn get(&self, id: HoleId) -> Option<Interval> {
        self.resolve(id).map(|index| self.node(index).interval)
    }

    /// Returns the next-fit cursor, or `None` when the list is empty.
    #[must_use]
    pub fn cursor(&self) -> Option<HoleId> {
        self.cursor.map(|index| self.id(index))
    }

    /// Moves the cursor onto `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale.
    #[track_caller]
    pub fn set_cursor(&mut self, id: HoleId) {
        let index = self.resolve_or_panic(id);
        self.cursor = Some(index);
    }

    /// Steps the cursor one hole forward, wrapping from the last hole to the
    /// first. Does nothing on an empty list.
    pub fn advance_cursor(&mut self) {
        if let Some(cursor) = self.cursor {
            self.cursor = self.node(cursor).next.or(self.head);
        }
    }

    /// Returns an iterator over the holes in ascending address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Returns all holes in ascending address order.
    #[must_use]
    pub fn intervals(&self) -> Vec<Interval> {
        self.iter().map(|(_, interval)| interval).collect()
    }

    /// Returns the total number of free units.
    #[must_use]
    pub fn free_units(&self) -> usize {
        self.iter().map(|(_, interval)| interval.len()).sum()
    }

    /// Returns a freed range to the list, coalescing it with its neighbors.
    ///
    /// The range is merged into the hole that ends right before it if there
    /// is one; that hole then also absorbs the hole starting right after the
    /// range. Otherwise the range is merged into the hole that starts right
    /// after it, or linked in as a new hole. Returns the handle of the hole
    /// that now contains `range`.
    ///
    /// If the merge deletes the hole under the cursor, the cursor moves to
    /// the surviving hole.
    ///
    /// # Panics
    ///
    /// Panics if `range` overlaps a hole already in the list.
    #[track_caller]
    pub fn insert(&mut self, range: Interval) -> HoleId {
        let Some(head) = self.head else {
            let index = self.alloc_node(range, None, None);
            self.head = Some(index);
            self.tail = Some(index);
            self.cursor = Some(index);
            self.len = 1;
            return self.id(index);
        };

        let first = self.node(head).interval;
        if range.is_followed_by(&first) {
            self.node_mut(head).interval.set_start(range.start());
            return self.id(head);
        }
        if range.end() + 1 < first.start() {
            let index = self.alloc_node(range, None, Some(head));
            self.node_mut(head).prev = Some(index);
            self.head = Some(index);
            self.len += 1;
            return self.id(index);
        }

        let mut parent = head;
        while let Some(next) = self.node(parent).next {
            if self.node(next).interval.start() > range.start() {
                break;
            }
            parent = next;
        }
        let Node {
            interval: parent_interval,
            next,
            ..
        } = *self.node(parent);
        let next_interval = next.map(|next| self.node(next).interval);
        assert!(
            parent_interval.end() < range.start()
                && next_interval.is_none_or(|n| range.end() < n.start()),
            "range {range} overlaps free space"
        );

        if parent_interval.is_followed_by(&range) {
            self.node_mut(parent).interval.set_end(range.end());
            if let (Some(next), Some(next_interval)) = (next, next_interval) {
                if range.is_followed_by(&next_interval) {
                    self.absorb_next(parent, next);
                }
            }
            return self.id(parent);
        }

        if let (Some(next), Some(next_interval)) = (next, next_interval) {
            if range.is_followed_by(&next_interval) {
                self.node_mut(next).interval.set_start(range.start());
                return self.id(next);
            }
        }

        let index = self.alloc_node(range, Some(parent), next);
        self.node_mut(parent).next = Some(index);
        match next {
            Some(next) => self.node_mut(next).prev = Some(index),
            None => self.tail = Some(index),
        }
        self.len += 1;
        self.id(index)
    }

    /// Carves `size` units off the low end of hole `id` and returns them.
    ///
    /// The hole keeps its remainder if it was larger than `size`. On an exact
    /// fit the hole is deleted; if it was the cursor, the cursor moves to the
    /// following hole (wrapping to the first), or becomes undefined if the
    /// list is now empty.
    ///
    /// # Panics
    ///
    /// Panics if `id` is stale, if `size` is zero, or if `size` exceeds the
    /// length of the hole.
    #[track_caller]
    pub fn remove(&mut self, id: HoleId, size: usize) -> Interval {
        let index = self.resolve_or_panic(id);
        let hole = self.node(index).interval;
        assert!(
            size > 0 && size <= hole.len(),
            "cannot carve {size} units from hole {hole}"
        );

        let carved = Interval::with_len(hole.start(), size);
        if hole.len() > size {
            self.node_mut(index).interval.set_start(carved.end() + 1);
        } else {
            self.unlink(index);
        }
        carved
    }

    /// Checks every structural invariant of the list.
    ///
    /// Holes must be sorted, disjoint and non-adjacent, the links must be
    /// consistent in both directions, the recorded length must equal the
    /// number of live holes, and the cursor must sit on a live hole exactly
    /// when the list is non-empty.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut count = 0;
        let mut prev: Option<usize> = None;
        let mut cursor_seen = false;
        let mut current = self.head;
        while let Some(index) = current {
            let node = self.node(index);
            if node.prev != prev {
                return Err(InvariantError::BrokenLink {
                    hole: node.interval,
                });
            }
            if let Some(prev) = prev {
                let prev = self.node(prev).interval;
                if prev.end() >= node.interval.start() {
                    return Err(InvariantError::Overlapping {
                        prev,
                        next: node.interval,
                    });
                }
                if prev.is_followed_by(&node.interval) {
                    return Err(InvariantError::Adjacent {
                        prev,
                        next: node.interval,
                    });
                }
            }
            cursor_seen |= self.cursor == Some(index);
            count += 1;
            prev = Some(index);
            current = node.next;
        }

        if self.tail != prev {
            return Err(InvariantError::TailMismatch);
        }
        let live = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        if self.len != count || live != count {
            return Err(InvariantError::LengthMismatch {
                recorded: self.len,
                actual: live.max(count),
            });
        }
        match self.cursor {
            None if count > 0 => Err(InvariantError::MissingCursor),
            Some(_) if !cursor_seen => Err(InvariantError::DanglingCursor),
            _ => Ok(()),
        }
    }

    fn id(&self, index: usize) -> HoleId {
        HoleId {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn resolve(&self, id: HoleId) -> Option<usize> {
        let slot = self.slots.get(id.index)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }

    #[track_caller]
    fn resolve_or_panic(&self, id: HoleId) -> usize {
        match self.resolve(id) {
            Some(index) => index,
            None => panic!("stale hole handle: {id:?}"),
        }
    }

    fn node(&self, index: usize) -> &Node {
        match &self.slots[index].node {
            Some(node) => node,
            None => unreachable!("dangling hole index {index}"),
        }
    }

    fn node_mut(&mut self, index: usize) -> &mut Node {
        match &mut self.slots[index].node {
            Some(node) => node,
            None => unreachable!("dangling hole index {index}"),
        }
    }

    fn alloc_node(&mut self, interval: Interval, prev: Option<usize>, next: Option<usize>) -> usize {
        let node = Node {
            interval,
            prev,
            next,
        };
        if let Some(index) = self.free_slots.pop() {
            self.slots[index].node = Some(node);
            index
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            self.slots.len() - 1
        }
    }

    fn free_node(&mut self, index: usize) {
        let slot = &mut self.slots[index];
        slot.node = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(index);
    }

    /// Merges `next` into `parent` and deletes `next`.
    fn absorb_next(&mut self, parent: usize, next: usize) {
        let Node {
            interval: absorbed,
            next: after,
            ..
        } = *self.node(next);
        let parent_node = self.node_mut(parent);
        parent_node.interval.set_end(absorbed.end());
        parent_node.next = after;
        match after {
            Some(after) => self.node_mut(after).prev = Some(parent),
            None => self.tail = Some(parent),
        }
        if self.cursor == Some(next) {
            self.cursor = Some(parent);
        }
        self.free_node(next);
        self.len -= 1;
    }

    fn unlink(&mut self, index: usize) {
        let Node { prev, next, .. } = *self.node(index);
        match prev {
            Some(prev) => self.node_mut(prev).next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.node_mut(next).prev = prev,
            None => self.tail = prev,
        }
        if self.cursor == Some(index) {
            self.cursor = next.or(self.head);
        }
        self.free_node(index);
        self.len -= 1;
    }
}

impl fmt::Display for HoleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Holes: {}", self.len)?;
        for (id, interval) in self {
            let mark = if self.cursor() == Some(id) { '*' } else { ' ' };
            write!(
                f,
                "\n{mark} start={} end={}",
                interval.start(),
                interval.end()
            )?;
        }
        Ok(())
    }
}

/// An iterator over the holes of a [`HoleList`] in address order.
///
/// This struct is created by [`HoleList::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    list: &'a HoleList,
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = (HoleId, Interval);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.next?;
        let node = self.list.node(index);
        self.next = node.next;
        self.remaining -= 1;
        Some((self.list.id(index), node.interval))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a HoleList {
    type Item = (HoleId, Interval);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
