use std::collections::VecDeque;
use std::hash::Hash;

use hashbrown::HashSet;

/// FIFO queue paired with a membership set so re-enqueuing a coordinate that
/// is already waiting is a no-op. Every pipeline stage owns one.
pub struct DedupQueue<T> {
    queue: VecDeque<T>,
    members: HashSet<T>,
}

impl<T: Copy + Eq + Hash> DedupQueue<T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    /// Enqueues unless already present. Returns whether the item was added.
    pub fn push(&mut self, item: T) -> bool {
        if !self.members.insert(item) {
            return false;
        }
        self.queue.push_back(item);
        true
    }

    pub fn pop(&mut self) -> Option<T> {
        let item = self.queue.pop_front()?;
        self.members.remove(&item);
        Some(item)
    }

    /// Removes a waiting item without dequeuing the rest.
    pub fn cancel(&mut self, item: T) -> bool {
        if !self.members.remove(&item) {
            return false;
        }
        self.queue.retain(|q| *q != item);
        true
    }

    #[inline]
    pub fn contains(&self, item: T) -> bool {
        self.members.contains(&item)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Empties the queue into a Vec, preserving order. Used by stages that
    /// must fully drain each tick.
    pub fn drain_all(&mut self) -> Vec<T> {
        self.members.clear();
        self.queue.drain(..).collect()
    }
}

impl<T: Copy + Eq + Hash> Default for DedupQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
