//! Top-down merge sort.

use core::cmp::Ordering;

use super::run::{Run, Sorter};
use crate::{CircList, Index, Linked, Storage};

/// Sorts `list` ascending according to `cmp` by recursive halving.
///
/// Each level finds the middle with a slow/fast walk, sorts both halves and
/// merges them with the same stable merge [`TimSort`](super::TimSort) uses.
/// Not adaptive: sorted input still costs `O(n log n)` comparisons.
///
/// Recursion depth is `log2(n)`.
pub fn merge_sort<T, S, Idx, F>(list: &mut CircList<T, S, Idx>, storage: &mut S, cmp: F)
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
    F: FnMut(&T, &T) -> Ordering,
{
    let Some((first, _)) = list.detach_chain(storage) else {
        return;
    };

    let sorted = Sorter::new(storage, cmp).split_sort(first);
    list.attach_chain(storage, sorted.first, sorted.last);
}

impl<T, S, Idx, F> Sorter<'_, T, S, Idx, F>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
    F: FnMut(&T, &T) -> Ordering,
{
    /// Sorts the chain starting at `first` into a single run.
    fn split_sort(&mut self, first: Idx) -> Run<Idx> {
        let second = self.next(first);
        if second.is_none() {
            return Run {
                first,
                last: first,
                len: 1,
            };
        }

        // `slow` ends on the last node of the left half.
        let mut slow = first;
        let mut fast = second;
        loop {
            fast = self.next(fast);
            if fast.is_none() {
                break;
            }
            fast = self.next(fast);
            slow = self.next(slow);
            if fast.is_none() {
                break;
            }
        }

        let right = self.next(slow);
        self.set_next(slow, Idx::NONE);
        self.set_prev(right, Idx::NONE);

        let left = self.split_sort(first);
        let right = self.split_sort(right);
        self.merge(left, right)
    }
}
