//! Stable, in-place sorting for [`CircList`](crate::CircList).
//!
//! Both sorters relink nodes and never move or allocate them. The list is
//! first detached into a `NONE`-terminated chain, sorted as a sequence of
//! runs, and linked back under the original sentinel.
//!
//! - [`TimSort`]: adaptive. Takes natural ascending runs, pads short ones by
//!   insertion up to a minimum length, and merges pending runs under a
//!   balancing rule so merges stay close to a balanced tree.
//! - [`merge_sort`]: plain top-down split at the middle, recurse, merge.
//!
//! Comparators return [`Ordering`]. State such as a comparison counter is
//! captured by the closure.
//!
//! ```
//! use ringlist::{Arena, CircList, Link, Linked, SortOrder, Storage, TimSort};
//!
//! #[derive(Debug, Default)]
//! struct Node {
//!     key: i32,
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
//! for key in [3, 1, 2] {
//!     let idx = storage.try_insert(Node { key, ..Default::default() }).unwrap();
//!     list.push_back(&mut storage, idx);
//! }
//!
//! let mut comparisons = 0;
//! TimSort::default().sort_by_order(&mut list, &mut storage, SortOrder::Descending, |a, b| {
//!     comparisons += 1;
//!     a.key.cmp(&b.key)
//! });
//!
//! let keys: Vec<i32> = list.iter(&storage).map(|n| n.key).collect();
//! assert_eq!(keys, [3, 2, 1]);
//! assert!(comparisons > 0);
//! ```

use core::cmp::Ordering;

mod merge_sort;
mod run;
mod timsort;

pub use merge_sort::merge_sort;
pub use timsort::{DEFAULT_MIN_RUN, SortStats, TimSort};

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl SortOrder {
    /// Maps a `descend` flag to an order.
    #[inline]
    pub const fn from_descend(descend: bool) -> Self {
        if descend {
            Self::Descending
        } else {
            Self::Ascending
        }
    }

    /// Wraps an ascending comparator so it sorts in this order.
    ///
    /// Descending swaps the arguments rather than negating the result, so
    /// equal elements still compare equal and the sort stays stable.
    #[inline]
    pub fn apply<T, F>(self, mut cmp: F) -> impl FnMut(&T, &T) -> Ordering
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        move |a: &T, b: &T| match self {
            Self::Ascending => cmp(a, b),
            Self::Descending => cmp(b, a),
        }
    }
}
