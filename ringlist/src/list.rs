//! Circular doubly-linked list with a sentinel node.
//!
//! Nodes live in external storage and embed their links via [`Linked`]. The
//! list itself is only the index of its sentinel slot: `head.next` is the
//! first element, `head.prev` the last, and an empty list is a sentinel
//! linked to itself. Traversal stops when it arrives back at the sentinel;
//! no link inside a list is ever `NONE`.
//!
//! # Storage Invariant
//!
//! A list instance must always be used with the storage its sentinel was
//! allocated in. Every index reachable from the sentinel is occupied in that
//! storage for as long as it stays linked.
//!
//! # Example
//!
//! ```
//! use ringlist::{Arena, CircList, Link, Linked, Storage};
//!
//! #[derive(Debug, Default)]
//! struct Node {
//!     value: u64,
//!     link: Link<u32>,
//! }
//!
//! impl Linked<u32> for Node {
//!     fn link(&self) -> &Link<u32> { &self.link }
//!     fn link_mut(&mut self) -> &mut Link<u32> { &mut self.link }
//! }
//!
//! let mut storage: Arena<Node> = Arena::new();
//! let mut list = CircList::try_new(&mut storage, Node::default()).unwrap();
//!
//! for value in [1, 2, 3] {
//!     let idx = storage.try_insert(Node { value, ..Default::default() }).unwrap();
//!     list.push_back(&mut storage, idx);
//! }
//!
//! let first = list.first(&storage).unwrap();
//! list.move_to_tail(&mut storage, first);
//!
//! let values: Vec<u64> = list.iter(&storage).map(|n| n.value).collect();
//! assert_eq!(values, [2, 3, 1]);
//! ```

use core::fmt;
use core::marker::PhantomData;

use crate::{Full, Index, Link, Linked, Storage};

/// A sentinel-headed circular list over external storage.
///
/// # Type Parameters
///
/// - `T`: Node type, embedding a [`Link`]
/// - `S`: Storage type (e.g., [`Arena<T>`](crate::Arena))
/// - `Idx`: Index type (default `u32`)
pub struct CircList<T, S, Idx: Index = u32> {
    head: Idx,
    _marker: PhantomData<fn() -> (T, S)>,
}

impl<T, S, Idx: Index> fmt::Debug for CircList<T, S, Idx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CircList").field("head", &self.head).finish()
    }
}

impl<T, S, Idx> CircList<T, S, Idx>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    // ========================================================================
    // Raw link access
    // ========================================================================

    #[inline]
    pub(crate) fn link(storage: &S, idx: Idx) -> Link<Idx> {
        // Safety: indices reachable from a list are occupied (list invariant)
        *unsafe { storage.get_unchecked(idx) }.link()
    }

    #[inline]
    pub(crate) fn link_mut<'a>(storage: &'a mut S, idx: Idx) -> &'a mut Link<Idx>
    where
        T: 'a,
    {
        // Safety: indices reachable from a list are occupied (list invariant)
        unsafe { storage.get_unchecked_mut(idx) }.link_mut()
    }

    /// Link lookup for indices supplied by the caller.
    #[inline]
    fn checked_link(storage: &S, idx: Idx) -> Link<Idx> {
        *storage.get(idx).expect("invalid index").link()
    }

    /// Links the single node `new` between two adjacent nodes.
    #[inline]
    fn link_between(storage: &mut S, new: Idx, prev: Idx, next: Idx) {
        Self::link_mut(storage, next).prev = new;
        *Self::link_mut(storage, new) = Link { next, prev };
        Self::link_mut(storage, prev).next = new;
    }

    /// Links the chain `first..=last` between two adjacent nodes.
    #[inline]
    fn splice_between(storage: &mut S, first: Idx, last: Idx, prev: Idx, next: Idx) {
        Self::link_mut(storage, first).prev = prev;
        Self::link_mut(storage, prev).next = first;
        Self::link_mut(storage, last).next = next;
        Self::link_mut(storage, next).prev = last;
    }

    #[inline]
    fn reset_head(&self, storage: &mut S) {
        let head = self.head;
        *Self::link_mut(storage, head) = Link {
            next: head,
            prev: head,
        };
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Creates an empty list, storing `sentinel` as its head node.
    ///
    /// The sentinel's payload is never read by the list.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(sentinel))` if storage is full.
    pub fn try_new(storage: &mut S, sentinel: T) -> Result<Self, Full<T>> {
        let head = storage.try_insert(sentinel)?;
        let list = Self {
            head,
            _marker: PhantomData,
        };
        list.reset_head(storage);
        Ok(list)
    }

    /// Releases every element and then the sentinel itself.
    pub fn free(mut self, storage: &mut S) {
        self.clear(storage);
        storage.remove(self.head);
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns the sentinel's index.
    #[inline]
    pub const fn head(&self) -> Idx {
        self.head
    }

    /// Returns `true` if the list has no elements.
    #[inline]
    pub fn is_empty(&self, storage: &S) -> bool {
        Self::link(storage, self.head).next == self.head
    }

    /// Returns `true` if the list has exactly one element.
    #[inline]
    pub fn is_singular(&self, storage: &S) -> bool {
        let link = Self::link(storage, self.head);
        link.next != self.head && link.next == link.prev
    }

    /// Returns the first element's index, or `None` if empty.
    #[inline]
    pub fn first(&self, storage: &S) -> Option<Idx> {
        let next = Self::link(storage, self.head).next;
        (next != self.head).then_some(next)
    }

    /// Returns the last element's index, or `None` if empty.
    #[inline]
    pub fn last(&self, storage: &S) -> Option<Idx> {
        let prev = Self::link(storage, self.head).prev;
        (prev != self.head).then_some(prev)
    }

    /// Returns the element after `idx`, or `None` at the end of the list.
    #[inline]
    pub fn next_of(&self, storage: &S, idx: Idx) -> Option<Idx> {
        let next = Self::checked_link(storage, idx).next;
        (next != self.head && next.is_some()).then_some(next)
    }

    /// Returns the element before `idx`, or `None` at the start of the list.
    #[inline]
    pub fn prev_of(&self, storage: &S, idx: Idx) -> Option<Idx> {
        let prev = Self::checked_link(storage, idx).prev;
        (prev != self.head && prev.is_some()).then_some(prev)
    }

    /// Counts the elements by walking the ring. O(n).
    pub fn len(&self, storage: &S) -> usize {
        self.keys(storage).count()
    }

    /// Returns a reference to the element at `idx`.
    ///
    /// The sentinel is not an element, so its index yields `None`.
    #[inline]
    pub fn get<'a>(&self, storage: &'a S, idx: Idx) -> Option<&'a T> {
        if idx == self.head {
            None
        } else {
            storage.get(idx)
        }
    }

    /// Returns a mutable reference to the element at `idx`.
    #[inline]
    pub fn get_mut<'a>(&self, storage: &'a mut S, idx: Idx) -> Option<&'a mut T> {
        if idx == self.head {
            None
        } else {
            storage.get_mut(idx)
        }
    }

    // ========================================================================
    // Single node operations
    // ========================================================================

    /// Links the detached node `new` directly after `node`.
    ///
    /// `node` may be the sentinel, which makes `new` the first element.
    ///
    /// # Panics
    ///
    /// Panics if `node` or `new` is not valid in storage.
    #[inline]
    pub fn insert_after(&mut self, storage: &mut S, node: Idx, new: Idx) {
        let new_link = Self::checked_link(storage, new);
        debug_assert!(!new_link.is_linked(), "node {new:?} is already linked");
        let next = Self::checked_link(storage, node).next;
        Self::link_between(storage, new, node, next);
    }

    /// Links the detached node `new` directly before `node`.
    ///
    /// `node` may be the sentinel, which makes `new` the last element.
    ///
    /// # Panics
    ///
    /// Panics if `node` or `new` is not valid in storage.
    #[inline]
    pub fn insert_before(&mut self, storage: &mut S, node: Idx, new: Idx) {
        let new_link = Self::checked_link(storage, new);
        debug_assert!(!new_link.is_linked(), "node {new:?} is already linked");
        let prev = Self::checked_link(storage, node).prev;
        Self::link_between(storage, new, prev, node);
    }

    /// Links a detached node as the first element.
    #[inline]
    pub fn push_front(&mut self, storage: &mut S, new: Idx) {
        let head = self.head;
        self.insert_after(storage, head, new);
    }

    /// Links a detached node as the last element.
    #[inline]
    pub fn push_back(&mut self, storage: &mut S, new: Idx) {
        let head = self.head;
        self.insert_before(storage, head, new);
    }

    /// Unlinks a node without releasing it from storage.
    ///
    /// The node's links are reset so it can be linked again elsewhere.
    /// Returns `false` if the node was not linked.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not valid in storage or is the sentinel.
    #[inline]
    pub fn unlink(&mut self, storage: &mut S, node: Idx) -> bool {
        assert!(node != self.head, "cannot unlink the sentinel");
        let link = Self::checked_link(storage, node);
        if !link.is_linked() {
            return false;
        }

        Self::link_mut(storage, link.prev).next = link.next;
        Self::link_mut(storage, link.next).prev = link.prev;
        *Self::link_mut(storage, node) = Link::UNLINKED;
        true
    }

    /// Unlinks a node and releases it, returning its value.
    ///
    /// Returns `None` if `idx` is the sentinel or not occupied.
    #[inline]
    pub fn remove(&mut self, storage: &mut S, idx: Idx) -> Option<T> {
        if idx == self.head || storage.get(idx).is_none() {
            return None;
        }

        self.unlink(storage, idx);
        storage.remove(idx)
    }

    /// Removes and returns the first element.
    #[inline]
    pub fn pop_front(&mut self, storage: &mut S) -> Option<T> {
        let first = self.first(storage)?;
        self.remove(storage, first)
    }

    /// Removes and returns the last element.
    #[inline]
    pub fn pop_back(&mut self, storage: &mut S) -> Option<T> {
        let last = self.last(storage)?;
        self.remove(storage, last)
    }

    /// Moves a node, linked anywhere, to the end of this list.
    #[inline]
    pub fn move_to_tail(&mut self, storage: &mut S, node: Idx) {
        self.unlink(storage, node);
        self.push_back(storage, node);
    }

    /// Moves a node, linked anywhere, to the front of this list.
    #[inline]
    pub fn move_to_head(&mut self, storage: &mut S, node: Idx) {
        self.unlink(storage, node);
        self.push_front(storage, node);
    }

    // ========================================================================
    // Bulk operations
    // ========================================================================

    /// Moves every element of `other` to the front of this list. O(1).
    ///
    /// `other` is left empty.
    #[inline]
    pub fn splice(&mut self, storage: &mut S, other: &mut Self) {
        let head = self.head;
        self.splice_after(storage, other, head);
    }

    /// Moves every element of `other` to the back of this list. O(1).
    ///
    /// `other` is left empty.
    #[inline]
    pub fn splice_tail(&mut self, storage: &mut S, other: &mut Self) {
        let last = Self::link(storage, self.head).prev;
        self.splice_after(storage, other, last);
    }

    /// Moves every element of `other` in after `anchor`. O(1).
    ///
    /// `anchor` is any node of this list, including the sentinel.
    pub fn splice_after(&mut self, storage: &mut S, other: &mut Self, anchor: Idx) {
        debug_assert!(other.head != self.head, "cannot splice a list into itself");
        let src = Self::link(storage, other.head);
        if src.next == other.head {
            return;
        }

        let next = Self::checked_link(storage, anchor).next;
        Self::splice_between(storage, src.next, src.prev, anchor, next);
        other.reset_head(storage);
    }

    /// Moves the elements from the first one through `node` (inclusive)
    /// into `into`. O(1).
    ///
    /// Does nothing if this list is empty, or if it holds a single element
    /// other than `node`. Passing the sentinel as `node` moves nothing.
    ///
    /// `into` must be empty.
    pub fn cut_position(&mut self, storage: &mut S, into: &mut Self, node: Idx) {
        if node == self.head {
            return;
        }
        if self.is_singular(storage) && self.first(storage) != Some(node) {
            return;
        }

        let head = self.head;
        self.cut_after(storage, into, head, node);
    }

    /// Moves the nodes strictly after `anchor` through `node` (inclusive)
    /// into `into`. O(1).
    ///
    /// `anchor` acts as a stand-in head: it may be the sentinel or any
    /// element, and `node` must follow it in this list. `into` must be
    /// empty.
    pub fn cut_after(&mut self, storage: &mut S, into: &mut Self, anchor: Idx, node: Idx) {
        debug_assert!(into.is_empty(storage), "cut target must be empty");
        debug_assert!(node != self.head, "cannot cut through the sentinel");
        if node == anchor {
            return;
        }

        let first = Self::checked_link(storage, anchor).next;
        if first == self.head {
            return;
        }

        let after = Self::checked_link(storage, node).next;
        let into_head = into.head;
        Self::splice_between(storage, first, node, into_head, into_head);
        Self::link_mut(storage, anchor).next = after;
        Self::link_mut(storage, after).prev = anchor;
    }

    /// Reverses the list in place. O(n), no allocation.
    pub fn reverse(&mut self, storage: &mut S) {
        let mut cur = self.head;
        loop {
            let link = Self::link_mut(storage, cur);
            core::mem::swap(&mut link.next, &mut link.prev);
            // After the swap, `prev` holds the old successor.
            cur = link.prev;
            if cur == self.head {
                break;
            }
        }
    }

    /// Releases every element, returning how many were removed.
    pub fn clear(&mut self, storage: &mut S) -> usize {
        let mut removed = 0;
        while self.pop_front(storage).is_some() {
            removed += 1;
        }
        removed
    }

    // ========================================================================
    // Chain conversion (sort engine)
    // ========================================================================

    /// Detaches all elements as a `NONE`-terminated chain.
    ///
    /// Returns `(first, last)`; `first.prev` and `last.next` are `NONE` and
    /// the list is left empty.
    pub(crate) fn detach_chain(&mut self, storage: &mut S) -> Option<(Idx, Idx)> {
        let head = Self::link(storage, self.head);
        if head.next == self.head {
            return None;
        }

        Self::link_mut(storage, head.next).prev = Idx::NONE;
        Self::link_mut(storage, head.prev).next = Idx::NONE;
        self.reset_head(storage);
        Some((head.next, head.prev))
    }

    /// Links a detached chain `first..=last` back as the whole list.
    pub(crate) fn attach_chain(&mut self, storage: &mut S, first: Idx, last: Idx) {
        debug_assert!(self.is_empty(storage), "attach target must be empty");
        let head = self.head;
        Self::splice_between(storage, first, last, head, head);
    }

    // ========================================================================
    // Iteration
    // ========================================================================

    /// Returns an iterator over element indices, front to back.
    #[inline]
    pub fn keys<'a>(&self, storage: &'a S) -> Keys<'a, T, S, Idx> {
        let head = Self::link(storage, self.head);
        Keys {
            storage,
            front: head.next,
            back: head.prev,
            remaining: head.next != self.head,
            _marker: PhantomData,
        }
    }

    /// Returns an iterator over references to elements, front to back.
    #[inline]
    pub fn iter<'a>(&self, storage: &'a S) -> Iter<'a, T, S, Idx> {
        Iter {
            keys: self.keys(storage),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// Iterator over element indices.
pub struct Keys<'a, T, S, Idx> {
    storage: &'a S,
    front: Idx,
    back: Idx,
    remaining: bool,
    _marker: PhantomData<fn() -> T>,
}

impl<T, S, Idx> Iterator for Keys<'_, T, S, Idx>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    type Item = Idx;

    #[inline]
    fn next(&mut self) -> Option<Idx> {
        if !self.remaining {
            return None;
        }

        let idx = self.front;
        if idx == self.back {
            self.remaining = false;
        } else {
            self.front = CircList::<T, S, Idx>::link(self.storage, idx).next;
        }
        Some(idx)
    }
}

impl<T, S, Idx> DoubleEndedIterator for Keys<'_, T, S, Idx>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<Idx> {
        if !self.remaining {
            return None;
        }

        let idx = self.back;
        if idx == self.front {
            self.remaining = false;
        } else {
            self.back = CircList::<T, S, Idx>::link(self.storage, idx).prev;
        }
        Some(idx)
    }
}

/// Iterator over references to elements.
pub struct Iter<'a, T, S, Idx> {
    keys: Keys<'a, T, S, Idx>,
}

impl<'a, T: 'a, S, Idx> Iterator for Iter<'a, T, S, Idx>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        let idx = self.keys.next()?;
        // Safety: keys only yields linked, occupied indices
        Some(unsafe { self.keys.storage.get_unchecked(idx) })
    }
}

impl<'a, T: 'a, S, Idx> DoubleEndedIterator for Iter<'a, T, S, Idx>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
{
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        let idx = self.keys.next_back()?;
        // Safety: keys only yields linked, occupied indices
        Some(unsafe { self.keys.storage.get_unchecked(idx) })
    }
}
