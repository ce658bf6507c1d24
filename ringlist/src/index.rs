//! Slot indices with a reserved "none" value.
//!
//! Lists link their nodes by index into a [`Storage`](crate::Storage)
//! rather than by pointer. A node that is not linked into any list carries
//! `Idx::NONE` in both of its link fields, which is how a detached node is
//! told apart from the sentinel of an empty list (whose links point back at
//! itself).

/// A copyable index type with a sentinel "none" value.
///
/// # Example
///
/// ```
/// use ringlist::Index;
///
/// let idx: u32 = 5;
/// assert!(idx.is_some());
/// assert!(u32::NONE.is_none());
/// assert_eq!(u16::from_usize(7).as_usize(), 7);
/// ```
pub trait Index: Copy + Eq + core::fmt::Debug {
    /// Sentinel value meaning "no slot".
    ///
    /// Never handed out by a storage, so it also bounds how many slots a
    /// storage keyed by this type can address.
    const NONE: Self;

    /// Returns `true` if this is the sentinel value.
    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Returns `true` if this is not the sentinel value.
    #[inline]
    fn is_some(self) -> bool {
        !self.is_none()
    }

    /// Converts the index to a slot position.
    fn as_usize(self) -> usize;

    /// Converts a slot position to an index.
    fn from_usize(val: usize) -> Self;
}

macro_rules! impl_index_for_unsigned {
    ($($ty:ty),*) => {
        $(
            impl Index for $ty {
                const NONE: Self = <$ty>::MAX;

                #[inline]
                fn as_usize(self) -> usize {
                    self as usize
                }

                #[inline]
                fn from_usize(val: usize) -> Self {
                    val as Self
                }
            }
        )*
    };
}

impl_index_for_unsigned!(u8, u16, u32, u64, usize);
