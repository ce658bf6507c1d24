//! Slot storage with stable indices.
//!
//! Lists never own their nodes. Nodes live in a [`Storage`], and a list is
//! nothing more than the index of its sentinel slot. Moving a node from one
//! list to another is a relink, never a copy, and the node's index stays
//! valid until the node is removed from storage.

use crate::Index;

/// Slot storage with stable indices.
///
/// # Requirements
///
/// Implementations must provide:
/// - **Stable indices**: an index remains valid until explicitly removed
/// - **O(1)** insert, remove, get operations
/// - **Slot reuse**: removed slots can be reused by future inserts
///
/// # Implementations
///
/// - [`Arena<T>`] - growable or bounded, index-based free list (this crate)
/// - `slab::Slab<T>` - growable, heap allocated (feature `slab`)
pub trait Storage<T> {
    /// Index type for this storage.
    type Index: Index;

    /// Inserts a value, returning its stable index.
    ///
    /// # Errors
    ///
    /// Returns `Err(Full(value))` if no slot is available. The storage is
    /// left unchanged.
    fn try_insert(&mut self, value: T) -> Result<Self::Index, Full<T>>;

    /// Removes and returns the value at `index`, if present.
    fn remove(&mut self, index: Self::Index) -> Option<T>;

    /// Returns a reference to the value at `index`, if present.
    fn get(&self, index: Self::Index) -> Option<&T>;

    /// Returns a mutable reference to the value at `index`, if present.
    fn get_mut(&mut self, index: Self::Index) -> Option<&mut T>;

    /// Returns a reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `index` must be valid and occupied.
    unsafe fn get_unchecked(&self, index: Self::Index) -> &T;

    /// Returns a mutable reference without checking occupancy.
    ///
    /// # Safety
    ///
    /// `index` must be valid and occupied.
    unsafe fn get_unchecked_mut(&mut self, index: Self::Index) -> &mut T;
}

/// Error returned when a storage has no free slot.
///
/// Carries the rejected value so insertion is all-or-nothing: the caller
/// gets its value back and nothing was linked anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
    /// Returns the value that could not be inserted.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::fmt::Display for Full<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "storage is full")
    }
}

impl<T: core::fmt::Debug> std::error::Error for Full<T> {}

// =============================================================================
// Arena - slot vector with an index-based free list
// =============================================================================

#[derive(Debug)]
enum Slot<T, Idx> {
    Occupied(T),
    Vacant { next_free: Idx },
}

/// Slot arena with an intrusive free list.
///
/// Vacant slots are chained through their own index field, so reuse is O(1)
/// and needs no side allocation. An arena is either growable (up to the
/// number of slots the index type can address) or bounded to a fixed slot
/// count, in which case [`Storage::try_insert`] reports [`Full`] once every
/// slot is taken.
///
/// # Example
///
/// ```
/// use ringlist::{Arena, Storage};
///
/// let mut arena: Arena<&str> = Arena::bounded(2);
/// let a = arena.try_insert("a").unwrap();
/// let _b = arena.try_insert("b").unwrap();
/// assert!(arena.try_insert("c").is_err());
///
/// assert_eq!(arena.remove(a), Some("a"));
/// // The freed slot is handed out again.
/// assert_eq!(arena.try_insert("c").unwrap(), a);
/// ```
#[derive(Debug)]
pub struct Arena<T, Idx: Index = u32> {
    slots: Vec<Slot<T, Idx>>,
    /// Most recently freed slot, or `NONE`.
    free_head: Idx,
    len: usize,
    /// Maximum number of slots this arena will ever create.
    limit: usize,
}

impl<T, Idx: Index> Default for Arena<T, Idx> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, Idx: Index> Arena<T, Idx> {
    /// Creates an empty growable arena.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty growable arena with room for `capacity` slots
    /// before reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        let limit = Idx::NONE.as_usize();
        Self {
            slots: Vec::with_capacity(capacity.min(limit)),
            free_head: Idx::NONE,
            len: 0,
            limit,
        }
    }

    /// Creates an arena that never holds more than `limit` values.
    ///
    /// The limit is also capped by the number of slots `Idx` can address.
    pub fn bounded(limit: usize) -> Self {
        let limit = limit.min(Idx::NONE.as_usize());
        Self {
            slots: Vec::with_capacity(limit),
            free_head: Idx::NONE,
            len: 0,
            limit,
        }
    }

    /// Returns the number of occupied slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no slots are occupied.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the maximum number of values the arena can hold.
    #[inline]
    pub const fn limit(&self) -> usize {
        self.limit
    }

    /// Returns `true` if another insert would fail.
    #[inline]
    pub const fn is_full(&self) -> bool {
        self.len == self.limit
    }

    /// Drops every stored value and forgets all slots.
    ///
    /// Any list still naming indices in this arena is left dangling, so
    /// only call this once those lists are gone.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = Idx::NONE;
        self.len = 0;
    }
}

impl<T, Idx: Index> Storage<T> for Arena<T, Idx> {
    type Index = Idx;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<Idx, Full<T>> {
        let idx = if self.free_head.is_some() {
            let idx = self.free_head;
            let slot = &mut self.slots[idx.as_usize()];
            match core::mem::replace(slot, Slot::Occupied(value)) {
                Slot::Vacant { next_free } => self.free_head = next_free,
                Slot::Occupied(_) => unreachable!("free list names an occupied slot"),
            }
            idx
        } else if self.slots.len() < self.limit {
            self.slots.push(Slot::Occupied(value));
            Idx::from_usize(self.slots.len() - 1)
        } else {
            return Err(Full(value));
        };

        self.len += 1;
        Ok(idx)
    }

    #[inline]
    fn remove(&mut self, index: Idx) -> Option<T> {
        let slot = self.slots.get_mut(index.as_usize())?;
        if let Slot::Vacant { .. } = slot {
            return None;
        }

        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        self.free_head = index;
        self.len -= 1;

        match core::mem::replace(slot, vacant) {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn get(&self, index: Idx) -> Option<&T> {
        match self.slots.get(index.as_usize())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    fn get_mut(&mut self, index: Idx) -> Option<&mut T> {
        match self.slots.get_mut(index.as_usize())? {
            Slot::Occupied(value) => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    #[inline]
    unsafe fn get_unchecked(&self, index: Idx) -> &T {
        debug_assert!(self.get(index).is_some(), "index {index:?} not occupied");
        // Safety: caller guarantees index is in bounds and occupied
        match unsafe { self.slots.get_unchecked(index.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => unsafe { core::hint::unreachable_unchecked() },
        }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, index: Idx) -> &mut T {
        debug_assert!(self.get(index).is_some(), "index {index:?} not occupied");
        // Safety: caller guarantees index is in bounds and occupied
        match unsafe { self.slots.get_unchecked_mut(index.as_usize()) } {
            Slot::Occupied(value) => value,
            Slot::Vacant { .. } => unsafe { core::hint::unreachable_unchecked() },
        }
    }
}

// =============================================================================
// slab::Slab implementation
// =============================================================================

#[cfg(feature = "slab")]
impl<T> Storage<T> for slab::Slab<T> {
    type Index = usize;

    #[inline]
    fn try_insert(&mut self, value: T) -> Result<usize, Full<T>> {
        Ok(self.insert(value))
    }

    #[inline]
    fn remove(&mut self, index: usize) -> Option<T> {
        self.try_remove(index)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&T> {
        self.get(index)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.get_mut(index)
    }

    #[inline]
    unsafe fn get_unchecked(&self, index: usize) -> &T {
        unsafe { self.get(index).unwrap_unchecked() }
    }

    #[inline]
    unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        unsafe { self.get_mut(index).unwrap_unchecked() }
    }
}
