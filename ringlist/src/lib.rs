//! Intrusive circular lists over slot storage.
//!
//! This crate separates storage from structure. Nodes live in a
//! [`Storage`] (an [`Arena`] by default) and embed their own [`Link`]. A
//! [`CircList`] is just the index of a sentinel node:
//!
//! ```text
//! Storage (Arena)  - owns nodes, hands out stable indices
//! CircList         - sentinel index; links nodes through their Link field
//! ```
//!
//! Benefits:
//! - **Stable indices**: a node keeps its index while moving between lists
//! - **O(1) relinking**: insert, unlink, splice and cut never touch payloads
//! - **Shared storage**: many lists can live in one arena
//! - **No allocation on failure paths**: a full arena hands the value back
//!
//! # Quick Start
//!
//! ```
//! use ringlist::{Arena, CircList, Link, Linked, Storage, TimSort};
//!
//! #[derive(Debug, Default)]
//! struct Order {
//!     price: u64,
//!     link: Link<u32>,
//! }
//!
//! impl Linked<u32> for Order {
//!     fn link(&self) -> &Link<u32> { &self.link }
//!     fn link_mut(&mut self) -> &mut Link<u32> { &mut self.link }
//! }
//!
//! let mut storage: Arena<Order> = Arena::with_capacity(16);
//! let mut book = CircList::try_new(&mut storage, Order::default()).unwrap();
//!
//! for price in [30, 10, 20] {
//!     let idx = storage.try_insert(Order { price, ..Default::default() }).unwrap();
//!     book.push_back(&mut storage, idx);
//! }
//!
//! TimSort::default().sort_by(&mut book, &mut storage, |a, b| a.price.cmp(&b.price));
//!
//! let prices: Vec<u64> = book.iter(&storage).map(|o| o.price).collect();
//! assert_eq!(prices, [10, 20, 30]);
//! ```
//!
//! # Critical Invariant: Same Storage Instance
//!
//! All operations on a list must use the storage its sentinel was allocated
//! in. This is the caller's responsibility (same discipline as the `slab`
//! crate). Public primitives validate the indices they are handed and panic
//! on an unoccupied one; traversal trusts the links.
//!
//! # Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`sort`] | [`TimSort`] (adaptive, run based) and [`merge_sort`] |
//! | [`queue`] | String [`Queue`] with block reversal, dedup, pruning and k-way merge |
//!
//! # Feature Flags
//!
//! - `slab` - Enable [`Storage`] impl for `slab::Slab`

#![warn(missing_docs)]

mod index;
mod link;
pub mod list;
pub mod queue;
pub mod sort;
pub mod storage;

pub use index::Index;
pub use link::{Link, Linked};
pub use list::CircList;
pub use queue::{
    Element, ElementArena, ElementList, Queue, QueueContext, QueueError, merge_queues,
};
pub use sort::{SortOrder, SortStats, TimSort, merge_sort};
pub use storage::{Arena, Full, Storage};
