//! Adaptive run-based merge sort.

use core::cmp::Ordering;

use tracing::trace;

use super::SortOrder;
use super::run::{Run, Sorter};
use crate::{CircList, Index, Linked, Storage};

/// Minimum run length used by [`TimSort::default`].
pub const DEFAULT_MIN_RUN: usize = 10;

/// Counters describing one completed sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Runs split off the input.
    pub runs: usize,
    /// Pairwise merges performed, including the final reduction.
    pub merges: usize,
    /// Most runs waiting on the stack at any one time.
    pub max_pending: usize,
}

/// Stable, adaptive merge sort over a [`CircList`].
///
/// The input is consumed as a sequence of runs, each the longest
/// non-decreasing prefix of what remains, extended by insertion to at least
/// `min_run` nodes. Runs are pushed on a stack, and after every push the
/// top of the stack is merged until the sizes satisfy
///
/// ```text
/// runs[i - 2].len > runs[i - 1].len + runs[i].len
/// runs[i - 1].len > runs[i].len
/// ```
///
/// for the newest runs. That keeps the stack depth logarithmic in the input
/// length and merges close to balanced. Whatever is left on the stack is
/// reduced by merging neighbours pairwise. Only adjacent runs are merged,
/// so elements comparing equal keep their relative order.
///
/// Sorting relinks nodes in place and allocates only the run stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimSort {
    min_run: usize,
}

impl Default for TimSort {
    fn default() -> Self {
        Self::new()
    }
}

impl TimSort {
    /// Creates a sorter with [`DEFAULT_MIN_RUN`].
    pub const fn new() -> Self {
        Self {
            min_run: DEFAULT_MIN_RUN,
        }
    }

    /// Creates a sorter padding runs to `min_run` nodes (at least 1).
    pub const fn with_min_run(min_run: usize) -> Self {
        Self {
            min_run: if min_run == 0 { 1 } else { min_run },
        }
    }

    /// Returns the minimum run length.
    #[inline]
    pub const fn min_run(&self) -> usize {
        self.min_run
    }

    /// Sorts `list` in ascending order of `T`'s [`Ord`].
    pub fn sort<T, S, Idx>(&self, list: &mut CircList<T, S, Idx>, storage: &mut S) -> SortStats
    where
        Idx: Index,
        T: Linked<Idx> + Ord,
        S: Storage<T, Index = Idx>,
    {
        self.sort_by(list, storage, T::cmp)
    }

    /// Sorts `list` in the given order of `cmp`.
    pub fn sort_by_order<T, S, Idx, F>(
        &self,
        list: &mut CircList<T, S, Idx>,
        storage: &mut S,
        order: SortOrder,
        cmp: F,
    ) -> SortStats
    where
        Idx: Index,
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        self.sort_by(list, storage, order.apply(cmp))
    }

    /// Sorts `list` ascending according to `cmp`.
    pub fn sort_by<T, S, Idx, F>(
        &self,
        list: &mut CircList<T, S, Idx>,
        storage: &mut S,
        cmp: F,
    ) -> SortStats
    where
        Idx: Index,
        T: Linked<Idx>,
        S: Storage<T, Index = Idx>,
        F: FnMut(&T, &T) -> Ordering,
    {
        let mut stats = SortStats::default();
        let Some((mut rest, _)) = list.detach_chain(storage) else {
            return stats;
        };

        let sorted = {
            let mut sorter = Sorter::new(storage, cmp);
            let mut pending: Vec<Run<Idx>> = Vec::new();

            while let Some(run) = sorter.next_run(&mut rest, self.min_run) {
                pending.push(run);
                stats.runs += 1;
                stats.max_pending = stats.max_pending.max(pending.len());
                collapse(&mut sorter, &mut pending, &mut stats);
            }

            reduce(&mut sorter, &mut pending, &mut stats)
        };

        if let Some(run) = sorted {
            list.attach_chain(storage, run.first, run.last);
        }

        trace!(
            runs = stats.runs,
            merges = stats.merges,
            max_pending = stats.max_pending,
            min_run = self.min_run,
            "sorted list"
        );
        stats
    }
}

/// Returns the index of the pending pair to merge next, if the newest runs
/// break the stack invariant.
fn merge_point<Idx>(runs: &[Run<Idx>]) -> Option<usize> {
    let n = runs.len();
    if n < 2 {
        return None;
    }

    let len = |i: usize| runs[i].len;
    let unbalanced = len(n - 2) <= len(n - 1)
        || (n >= 3 && len(n - 3) <= len(n - 2) + len(n - 1))
        || (n >= 4 && len(n - 4) <= len(n - 3) + len(n - 2));

    if !unbalanced {
        None
    } else if n >= 3 && len(n - 3) < len(n - 1) {
        Some(n - 3)
    } else {
        Some(n - 2)
    }
}

/// Merges pending runs until the stack invariant holds again.
fn collapse<T, S, Idx, F>(
    sorter: &mut Sorter<'_, T, S, Idx, F>,
    runs: &mut Vec<Run<Idx>>,
    stats: &mut SortStats,
) where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
    F: FnMut(&T, &T) -> Ordering,
{
    while let Some(at) = merge_point(runs) {
        let right = runs.remove(at + 1);
        runs[at] = sorter.merge(runs[at], right);
        stats.merges += 1;
    }
}

/// Merges neighbouring runs pairwise, pass after pass, down to one run.
fn reduce<T, S, Idx, F>(
    sorter: &mut Sorter<'_, T, S, Idx, F>,
    runs: &mut Vec<Run<Idx>>,
    stats: &mut SortStats,
) -> Option<Run<Idx>>
where
    Idx: Index,
    T: Linked<Idx>,
    S: Storage<T, Index = Idx>,
    F: FnMut(&T, &T) -> Ordering,
{
    while runs.len() > 1 {
        let mut write = 0;
        let mut read = 0;
        while read < runs.len() {
            runs[write] = if read + 1 < runs.len() {
                stats.merges += 1;
                sorter.merge(runs[read], runs[read + 1])
            } else {
                runs[read]
            };
            read += 2;
            write += 1;
        }
        runs.truncate(write);
    }
    runs.pop()
}
