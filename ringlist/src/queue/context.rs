//! Merging many queues into one.

use tracing::debug;

use super::{ElementArena, Queue, QueueError};

/// A queue tracked together with its element count and an id.
///
/// The count is maintained by the context's own insert and by
/// [`merge_queues`]. Changes made through [`queue_mut`](Self::queue_mut) are
/// picked up by [`resync`](Self::resync).
#[derive(Debug)]
pub struct QueueContext {
    queue: Queue,
    size: usize,
    id: usize,
}

impl QueueContext {
    /// Wraps `queue`, counting its current elements.
    pub fn new(arena: &ElementArena, queue: Queue, id: usize) -> Self {
        let size = queue.size(arena);
        Self { queue, size, id }
    }

    /// Returns the tracked queue.
    #[inline]
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Returns the tracked queue mutably.
    #[inline]
    pub fn queue_mut(&mut self) -> &mut Queue {
        &mut self.queue
    }

    /// Returns the recorded element count.
    #[inline]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns the context's id.
    #[inline]
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Inserts at the tail, keeping the count current.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::StorageFull`] if the arena is full.
    pub fn insert_tail(&mut self, arena: &mut ElementArena, value: &str) -> Result<(), QueueError> {
        self.queue.insert_tail(arena, value)?;
        self.size += 1;
        Ok(())
    }

    /// Recounts the queue's elements.
    pub fn resync(&mut self, arena: &ElementArena) -> usize {
        self.size = self.queue.size(arena);
        self.size
    }

    /// Unwraps the queue.
    pub fn into_queue(self) -> Queue {
        self.queue
    }
}

/// Merges every context's queue into the first one and sorts it.
///
/// Each queue is expected to be sorted already, though the result is
/// correct either way. Afterwards the first context holds all elements and
/// the combined count; every other context is empty with a count of zero.
/// The emptied queues themselves stay owned by their contexts.
///
/// Returns the size of the merged queue, or 0 for no contexts.
pub fn merge_queues(arena: &mut ElementArena, contexts: &mut [QueueContext], descend: bool) -> usize {
    let queues = contexts.len();
    let Some((target, rest)) = contexts.split_first_mut() else {
        return 0;
    };

    for ctx in rest {
        target.queue.append(arena, &mut ctx.queue);
        ctx.size = 0;
    }

    let stats = target.queue.sort(arena, descend);
    let size = target.resync(arena);
    debug!(
        queues,
        size,
        target_id = target.id,
        runs = stats.runs,
        merges = stats.merges,
        "merged queues"
    );
    size
}
