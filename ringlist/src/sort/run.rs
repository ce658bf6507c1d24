//! Runs and the two primitives every sorter is built from.
//!
//! A run is a sorted, `NONE`-terminated chain: `first.prev` and `last.next`
//! are both `NONE`. Runs are carved off the front of the unsorted chain by
//! [`Sorter::next_run`] and combined by [`Sorter::merge`].

use core::cmp::Ordering;
use core::marker::PhantomData;

use crate::{CircList, Index, Link, Linked, Storage};

/// A sorted chain of `len` nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Run<Idx> {
    pub first: Idx,
    pub last: Idx,
    pub len: usize,
}

/// Storage and comparator for the duration of one sort.
pub(crate) struct Sorter<'a, T, S, Idx, F> {
    storage: &'a mut S,
    cmp: F,
    _marker: PhantomData<fn(&T) -> Idx>,
}

impl<'a, T, S, Idx, F> Sorter<'a, T, S, Idx, F>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
    F: FnMut(&T, &T) -> Ordering,
{
    pub fn new(storage: &'a mut S, cmp: F) -> Self {
        Self {
            storage,
            cmp,
            _marker: PhantomData,
        }
    }

    #[inline]
    fn link(&self, idx: Idx) -> Link<Idx> {
        CircList::<T, S, Idx>::link(&*self.storage, idx)
    }

    #[inline]
    pub fn next(&self, idx: Idx) -> Idx {
        self.link(idx).next
    }

    #[inline]
    pub fn prev(&self, idx: Idx) -> Idx {
        self.link(idx).prev
    }

    #[inline]
    pub fn set_next(&mut self, idx: Idx, next: Idx) {
        CircList::<T, S, Idx>::link_mut(self.storage, idx).next = next;
    }

    #[inline]
    pub fn set_prev(&mut self, idx: Idx, prev: Idx) {
        CircList::<T, S, Idx>::link_mut(self.storage, idx).prev = prev;
    }

    #[inline]
    fn compare(&mut self, a: Idx, b: Idx) -> Ordering {
        let storage = &*self.storage;
        // Safety: sorters only visit nodes of the detached chain
        let (a, b) = unsafe { (storage.get_unchecked(a), storage.get_unchecked(b)) };
        (self.cmp)(a, b)
    }

    /// Splits the next run off the front of the chain starting at `rest`.
    ///
    /// Takes the longest non-decreasing prefix, then, while the run is
    /// shorter than `min_run`, pulls the following nodes in one at a time
    /// by insertion. An inserted node lands after every node comparing
    /// equal to it. `rest` is advanced to the remainder (or `NONE`).
    pub fn next_run(&mut self, rest: &mut Idx, min_run: usize) -> Option<Run<Idx>> {
        let mut first = *rest;
        if first.is_none() {
            return None;
        }

        let mut last = first;
        let mut len = 1;
        let mut cur = self.next(first);

        while cur.is_some() && self.compare(last, cur) != Ordering::Greater {
            last = cur;
            len += 1;
            cur = self.next(cur);
        }

        while len < min_run && cur.is_some() {
            let node = cur;
            cur = self.next(node);

            let mut pos = last;
            while pos.is_some() && self.compare(pos, node) == Ordering::Greater {
                pos = self.prev(pos);
            }

            if pos.is_none() {
                self.set_prev(node, Idx::NONE);
                self.set_next(node, first);
                self.set_prev(first, node);
                first = node;
            } else if pos == last {
                self.set_next(last, node);
                self.set_prev(node, last);
                last = node;
            } else {
                let after = self.next(pos);
                self.set_next(pos, node);
                self.set_prev(node, pos);
                self.set_next(node, after);
                self.set_prev(after, node);
            }
            len += 1;
        }

        self.set_next(last, Idx::NONE);
        if cur.is_some() {
            self.set_prev(cur, Idx::NONE);
        }
        *rest = cur;

        Some(Run { first, last, len })
    }

    /// Merges two runs into one, `a` being the earlier of the two.
    ///
    /// A node from `b` is taken only when it is strictly less than the
    /// current node of `a`, so ties keep their original order.
    pub fn merge(&mut self, a: Run<Idx>, b: Run<Idx>) -> Run<Idx> {
        let mut x = a.first;
        let mut y = b.first;
        let mut first = Idx::NONE;
        let mut tail = Idx::NONE;

        while x.is_some() && y.is_some() {
            let take = if self.compare(y, x) == Ordering::Less {
                let take = y;
                y = self.next(y);
                take
            } else {
                let take = x;
                x = self.next(x);
                take
            };

            if tail.is_none() {
                first = take;
                self.set_prev(take, Idx::NONE);
            } else {
                self.set_next(tail, take);
                self.set_prev(take, tail);
            }
            tail = take;
        }

        let (rest, last) = if x.is_some() { (x, a.last) } else { (y, b.last) };
        self.set_next(tail, rest);
        self.set_prev(rest, tail);

        Run {
            first,
            last,
            len: a.len + b.len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Arena;

    #[derive(Debug, Default)]
    struct Item {
        key: u32,
        tag: u32,
        link: Link<u32>,
    }

    impl Linked<u32> for Item {
        fn link(&self) -> &Link<u32> {
            &self.link
        }
        fn link_mut(&mut self) -> &mut Link<u32> {
            &mut self.link
        }
    }

    type Chain = CircList<Item, Arena<Item>>;

    /// Builds a detached chain of `(key, tag)` items, returning its first node.
    fn chain(storage: &mut Arena<Item>, items: &[(u32, u32)]) -> u32 {
        let mut list = Chain::try_new(storage, Item::default()).unwrap();
        for &(key, tag) in items {
            let idx = storage
                .try_insert(Item {
                    key,
                    tag,
                    ..Default::default()
                })
                .unwrap();
            list.push_back(storage, idx);
        }
        list.detach_chain(storage).unwrap().0
    }

    fn collect(storage: &Arena<Item>, run: Run<u32>) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        let mut cur = run.first;
        let mut prev = u32::NONE;
        while cur.is_some() {
            let item = storage.get(cur).unwrap();
            assert_eq!(item.link.prev, prev, "broken back-link");
            out.push((item.key, item.tag));
            prev = cur;
            cur = item.link.next;
        }
        assert_eq!(prev, run.last);
        assert_eq!(out.len(), run.len);
        out
    }

    fn by_key(a: &Item, b: &Item) -> Ordering {
        a.key.cmp(&b.key)
    }

    #[test]
    fn natural_run_stops_at_descent() {
        let mut storage: Arena<Item> = Arena::new();
        let mut rest = chain(&mut storage, &[(1, 0), (2, 0), (2, 1), (5, 0), (3, 0), (4, 0)]);

        let run = Sorter::new(&mut storage, by_key).next_run(&mut rest, 1).unwrap();
        assert_eq!(collect(&storage, run), [(1, 0), (2, 0), (2, 1), (5, 0)]);

        assert!(storage.get(rest).unwrap().link.prev.is_none());
        let tail = Sorter::new(&mut storage, by_key).next_run(&mut rest, 1).unwrap();
        assert_eq!(collect(&storage, tail), [(3, 0), (4, 0)]);
        assert!(rest.is_none());
    }

    #[test]
    fn short_run_is_padded_by_insertion() {
        let mut storage: Arena<Item> = Arena::new();
        let mut rest = chain(
            &mut storage,
            &[(5, 0), (3, 0), (9, 0), (1, 0), (3, 1), (7, 0), (0, 0)],
        );

        let run = Sorter::new(&mut storage, by_key).next_run(&mut rest, 5).unwrap();
        assert_eq!(
            collect(&storage, run),
            [(1, 0), (3, 0), (3, 1), (5, 0), (9, 0)]
        );

        let run = Sorter::new(&mut storage, by_key).next_run(&mut rest, 5).unwrap();
        assert_eq!(collect(&storage, run), [(0, 0), (7, 0)]);
        assert!(rest.is_none());
    }

    #[test]
    fn next_run_on_exhausted_chain() {
        let mut storage: Arena<Item> = Arena::new();
        let mut rest = u32::NONE;
        assert!(Sorter::new(&mut storage, by_key).next_run(&mut rest, 4).is_none());
    }

    #[test]
    fn merge_interleaves_and_prefers_earlier_run() {
        let mut storage: Arena<Item> = Arena::new();
        let mut rest = chain(&mut storage, &[(1, 0), (2, 0), (4, 0), (2, 1), (3, 1), (4, 1)]);

        let mut sorter = Sorter::new(&mut storage, by_key);
        let a = sorter.next_run(&mut rest, 1).unwrap();
        let b = sorter.next_run(&mut rest, 1).unwrap();
        let merged = sorter.merge(a, b);

        assert_eq!(
            collect(&storage, merged),
            [(1, 0), (2, 0), (2, 1), (3, 1), (4, 0), (4, 1)]
        );
    }

    #[test]
    fn merge_appends_remainder_of_earlier_run() {
        let mut storage: Arena<Item> = Arena::new();
        let mut rest = chain(&mut storage, &[(1, 0), (7, 0), (8, 0), (9, 0)]);

        let mut sorter = Sorter::new(&mut storage, by_key);
        let a = sorter.next_run(&mut rest, 1).unwrap();
        assert_eq!(a.len, 4);

        // Split the single run by hand into [1] and [7, 8, 9].
        let second = sorter.next(a.first);
        sorter.set_next(a.first, u32::NONE);
        sorter.set_prev(second, u32::NONE);
        let left = Run {
            first: a.first,
            last: a.first,
            len: 1,
        };
        let right = Run {
            first: second,
            last: a.last,
            len: 3,
        };

        let merged = sorter.merge(right, left);
        assert_eq!(collect(&storage, merged), [(1, 0), (7, 0), (8, 0), (9, 0)]);
    }
}
