//! Embedded link records for intrusive lists.
//!
//! A node type embeds a [`Link`] and exposes it through [`Linked`]. The list
//! code only ever touches that field, so the same record type can carry any
//! payload, and a record can sit in several lists at once by embedding one
//! `Link` per membership.

use crate::Index;

/// The `next`/`prev` pair embedded in every list node.
///
/// Inside a list both fields always name occupied slots (the list is
/// circular through its sentinel). A node outside any list has both fields
/// set to `Idx::NONE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link<Idx> {
    /// Following node, or the sentinel after the last element.
    pub next: Idx,
    /// Preceding node, or the sentinel before the first element.
    pub prev: Idx,
}

impl<Idx: Index> Link<Idx> {
    /// A link that belongs to no list.
    pub const UNLINKED: Self = Self {
        next: Idx::NONE,
        prev: Idx::NONE,
    };

    /// Returns `true` if either neighbor is set.
    #[inline]
    pub fn is_linked(&self) -> bool {
        self.next.is_some() || self.prev.is_some()
    }
}

impl<Idx: Index> Default for Link<Idx> {
    fn default() -> Self {
        Self::UNLINKED
    }
}

/// Trait for types that can participate in a [`CircList`](crate::CircList).
///
/// # Example
///
/// ```
/// use ringlist::{Link, Linked};
///
/// struct Order {
///     id: u64,
///     qty: u64,
///     link: Link<u32>,
/// }
///
/// impl Linked<u32> for Order {
///     fn link(&self) -> &Link<u32> {
///         &self.link
///     }
///     fn link_mut(&mut self) -> &mut Link<u32> {
///         &mut self.link
///     }
/// }
/// ```
pub trait Linked<Idx: Index> {
    /// Returns the embedded link.
    fn link(&self) -> &Link<Idx>;

    /// Returns the embedded link mutably.
    fn link_mut(&mut self) -> &mut Link<Idx>;
}
