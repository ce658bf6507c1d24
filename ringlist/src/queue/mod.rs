//! String queues built on [`CircList`].
//!
//! Every [`Queue`] keeps its elements in a shared [`ElementArena`], so
//! moving elements between queues (splicing, merging) relinks them in place.
//! Values compare bytewise, the way `strcmp` orders them.
//!
//! ```
//! use ringlist::{ElementArena, Queue};
//!
//! let mut arena = ElementArena::new();
//! let mut queue = Queue::new(&mut arena).unwrap();
//!
//! for value in ["1", "2", "3", "4", "5", "6", "7"] {
//!     queue.insert_tail(&mut arena, value).unwrap();
//! }
//! queue.reverse_k(&mut arena, 3);
//!
//! let values: Vec<&str> = queue.values(&arena).collect();
//! assert_eq!(values, ["3", "2", "1", "6", "5", "4", "7"]);
//! ```

use core::cmp::Ordering;
use core::fmt;

use crate::sort::{SortOrder, SortStats, TimSort};
use crate::{Arena, CircList, Full, Link, Linked, Storage};

mod context;

pub use context::{QueueContext, merge_queues};

/// A queued string value with its embedded link.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Element {
    value: String,
    link: Link<u32>,
}

impl Element {
    /// Creates a detached element.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            link: Link::UNLINKED,
        }
    }

    /// Returns the stored value.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the element, returning its value.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }

    /// Copies the value into `buf` as a NUL-terminated byte string.
    ///
    /// At most `buf.len() - 1` bytes are copied, the rest of the value is
    /// dropped, and a NUL always follows the copied bytes. Returns the
    /// number of value bytes written. An empty buffer is left untouched.
    pub fn copy_value_into(&self, buf: &mut [u8]) -> usize {
        let Some(room) = buf.len().checked_sub(1) else {
            return 0;
        };

        let bytes = self.value.as_bytes();
        let n = bytes.len().min(room);
        buf[..n].copy_from_slice(&bytes[..n]);
        buf[n] = 0;
        n
    }
}

impl Linked<u32> for Element {
    #[inline]
    fn link(&self) -> &Link<u32> {
        &self.link
    }

    #[inline]
    fn link_mut(&mut self) -> &mut Link<u32> {
        &mut self.link
    }
}

/// Storage shared by every queue of a program.
pub type ElementArena = Arena<Element>;

/// The list type every queue is built on.
pub type ElementList = CircList<Element, ElementArena>;

/// Error returned by queue operations that allocate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    /// The arena has no free slot.
    StorageFull,
}

impl fmt::Display for QueueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StorageFull => write!(f, "element storage is full"),
        }
    }
}

impl std::error::Error for QueueError {}

impl<T> From<Full<T>> for QueueError {
    fn from(_: Full<T>) -> Self {
        Self::StorageFull
    }
}

/// A queue of strings over an [`ElementArena`].
///
/// Besides its own sentinel, a queue holds a second, always empty, scratch
/// list that block operations cut into and splice back from.
#[derive(Debug)]
pub struct Queue {
    list: ElementList,
    scratch: ElementList,
}

impl Queue {
    /// Allocates an empty queue.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StorageFull`] if the arena cannot take the two
    /// sentinels. Nothing is left allocated in that case.
    pub fn new(arena: &mut ElementArena) -> Result<Self, QueueError> {
        let list = ElementList::try_new(arena, Element::default())?;
        match ElementList::try_new(arena, Element::default()) {
            Ok(scratch) => Ok(Self { list, scratch }),
            Err(full) => {
                list.free(arena);
                Err(full.into())
            }
        }
    }

    /// Releases every element and the queue's sentinels.
    pub fn free(self, arena: &mut ElementArena) {
        self.list.free(arena);
        self.scratch.free(arena);
    }

    /// Returns the underlying list.
    #[inline]
    pub fn list(&self) -> &ElementList {
        &self.list
    }

    // ========================================================================
    // Insertion and removal
    // ========================================================================

    /// Inserts a copy of `value` at the head.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StorageFull`] and leaves the queue unchanged if
    /// the arena is full.
    pub fn insert_head(&mut self, arena: &mut ElementArena, value: &str) -> Result<(), QueueError> {
        let idx = arena.try_insert(Element::new(value))?;
        self.list.push_front(arena, idx);
        Ok(())
    }

    /// Inserts a copy of `value` at the tail.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StorageFull`] and leaves the queue unchanged if
    /// the arena is full.
    pub fn insert_tail(&mut self, arena: &mut ElementArena, value: &str) -> Result<(), QueueError> {
        let idx = arena.try_insert(Element::new(value))?;
        self.list.push_back(arena, idx);
        Ok(())
    }

    /// Removes the head element and hands it to the caller.
    #[inline]
    pub fn remove_head(&mut self, arena: &mut ElementArena) -> Option<Element> {
        self.list.pop_front(arena)
    }

    /// Removes the tail element and hands it to the caller.
    #[inline]
    pub fn remove_tail(&mut self, arena: &mut ElementArena) -> Option<Element> {
        self.list.pop_back(arena)
    }

    /// Moves every element of `other` to the tail of this queue. O(1).
    pub fn append(&mut self, arena: &mut ElementArena, other: &mut Queue) {
        self.list.splice_tail(arena, &mut other.list);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Counts the elements. O(n).
    #[inline]
    pub fn size(&self, arena: &ElementArena) -> usize {
        self.list.len(arena)
    }

    /// Returns `true` if the queue has no elements.
    #[inline]
    pub fn is_empty(&self, arena: &ElementArena) -> bool {
        self.list.is_empty(arena)
    }

    /// Iterates over the values, head to tail.
    ///
    /// The iterator borrows only the arena, so the queue itself can be moved
    /// while it is alive.
    pub fn values<'a>(
        &self,
        arena: &'a ElementArena,
    ) -> impl DoubleEndedIterator<Item = &'a str> + use<'a> {
        self.list.iter(arena).map(Element::value)
    }

    fn value<'a>(&self, arena: &'a ElementArena, idx: u32) -> &'a str {
        self.list.get(arena, idx).map_or("", Element::value)
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Deletes the middle element, the one at index `n / 2` (0-based).
    ///
    /// Returns `false` if the queue is empty.
    pub fn delete_mid(&mut self, arena: &mut ElementArena) -> bool {
        let Some(first) = self.list.first(arena) else {
            return false;
        };

        let mut slow = first;
        let mut fast = first;
        while let Some(next) = self.list.next_of(arena, fast) {
            fast = next;
            slow = self.list.next_of(arena, slow).unwrap_or(slow);
            match self.list.next_of(arena, fast) {
                Some(next) => fast = next,
                None => break,
            }
        }

        self.list.remove(arena, slow);
        true
    }

    /// Deletes every element whose value equals a neighbour's.
    ///
    /// Meant for sorted queues: each run of two or more equal values is
    /// removed entirely, not collapsed to one. Returns `false` if the queue
    /// is empty.
    pub fn delete_dup(&mut self, arena: &mut ElementArena) -> bool {
        let Some(mut start) = self.list.first(arena) else {
            return false;
        };

        loop {
            let mut end = start;
            while let Some(next) = self.list.next_of(arena, end) {
                if self.value(arena, next) != self.value(arena, start) {
                    break;
                }
                end = next;
            }

            let after = self.list.next_of(arena, end);
            if end != start {
                let anchor = self
                    .list
                    .prev_of(arena, start)
                    .unwrap_or_else(|| self.list.head());
                self.list.cut_after(arena, &mut self.scratch, anchor, end);
                self.scratch.clear(arena);
            }

            match after {
                Some(next) => start = next,
                None => break,
            }
        }
        true
    }

    // ========================================================================
    // Reordering
    // ========================================================================

    /// Swaps every two adjacent elements. A trailing odd element stays put.
    pub fn swap(&mut self, arena: &mut ElementArena) {
        let mut cur = self.list.first(arena);
        while let Some(a) = cur {
            let Some(b) = self.list.next_of(arena, a) else {
                break;
            };
            self.list.unlink(arena, b);
            self.list.insert_before(arena, a, b);
            cur = self.list.next_of(arena, a);
        }
    }

    /// Reverses the queue in place.
    #[inline]
    pub fn reverse(&mut self, arena: &mut ElementArena) {
        self.list.reverse(arena);
    }

    /// Reverses each consecutive block of `k` elements.
    ///
    /// A trailing block shorter than `k` keeps its order. `k < 2` does
    /// nothing.
    pub fn reverse_k(&mut self, arena: &mut ElementArena, k: usize) {
        if k < 2 {
            return;
        }
        if k == 2 {
            self.swap(arena);
            return;
        }

        let mut anchor = self.list.head();
        loop {
            let Some(block_first) = self.list.next_of(arena, anchor) else {
                break;
            };

            let mut end = block_first;
            let mut count = 1;
            while count < k {
                match self.list.next_of(arena, end) {
                    Some(next) => end = next,
                    None => break,
                }
                count += 1;
            }
            if count < k {
                break;
            }

            self.list.cut_after(arena, &mut self.scratch, anchor, end);
            self.scratch.reverse(arena);
            self.list.splice_after(arena, &mut self.scratch, anchor);
            anchor = block_first;
        }
    }

    // ========================================================================
    // Sorting and pruning
    // ========================================================================

    /// Sorts the values bytewise, ascending or descending. Stable.
    pub fn sort(&mut self, arena: &mut ElementArena, descend: bool) -> SortStats {
        self.sort_by(arena, SortOrder::from_descend(descend), str::cmp)
    }

    /// Sorts the values in `order` of `cmp`. Stable.
    pub fn sort_by<F>(&mut self, arena: &mut ElementArena, order: SortOrder, mut cmp: F) -> SortStats
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        TimSort::default().sort_by_order(&mut self.list, arena, order, |a: &Element, b: &Element| {
            cmp(a.value(), b.value())
        })
    }

    /// Deletes every element that has a strictly smaller element anywhere
    /// to its right, leaving a non-decreasing queue. Returns the new size.
    pub fn ascend(&mut self, arena: &mut ElementArena) -> usize {
        self.ascend_by(arena, str::cmp)
    }

    /// Deletes every element that has a strictly greater element anywhere
    /// to its right, leaving a non-increasing queue. Returns the new size.
    pub fn descend(&mut self, arena: &mut ElementArena) -> usize {
        self.descend_by(arena, str::cmp)
    }

    /// [`ascend`](Self::ascend) under a custom comparator.
    ///
    /// Makes one pass from the tail, comparing each element against the
    /// smallest value kept so far: exactly `n - 1` comparisons.
    pub fn ascend_by<F>(&mut self, arena: &mut ElementArena, cmp: F) -> usize
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.prune_from_tail(arena, cmp)
    }

    /// [`descend`](Self::descend) under a custom comparator.
    pub fn descend_by<F>(&mut self, arena: &mut ElementArena, mut cmp: F) -> usize
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        self.prune_from_tail(arena, |a, b| cmp(b, a))
    }

    /// Walks tail to head, removing each element ordered after the best
    /// value kept so far.
    fn prune_from_tail<F>(&mut self, arena: &mut ElementArena, mut cmp: F) -> usize
    where
        F: FnMut(&str, &str) -> Ordering,
    {
        let Some(last) = self.list.last(arena) else {
            return 0;
        };

        let mut kept = 1;
        let mut best = last;
        let mut cur = self.list.prev_of(arena, last);
        while let Some(idx) = cur {
            cur = self.list.prev_of(arena, idx);
            if cmp(self.value(arena, idx), self.value(arena, best)) == Ordering::Greater {
                self.list.remove(arena, idx);
            } else {
                best = idx;
                kept += 1;
            }
        }
        kept
    }
}
