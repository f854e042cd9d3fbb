//! Collections shared by the grammar passes.

use bit_vec::BitVec;
use std::collections::VecDeque;

type BuildHasher = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

pub type Map<K, V> = indexmap::IndexMap<K, V, BuildHasher>;
pub type Set<T> = indexmap::IndexSet<T, BuildHasher>;

/// A FIFO work-list over the dense positions `0..len`.
///
/// A position is queued at most once while pending, and may be pushed again
/// after it has been popped.
#[derive(Debug)]
pub struct WorkList {
    queue: VecDeque<usize>,
    pending: BitVec,
}

impl WorkList {
    pub fn new(len: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            pending: BitVec::from_elem(len, false),
        }
    }

    pub fn push(&mut self, pos: usize) {
        if !self.pending[pos] {
            self.pending.set(pos, true);
            self.queue.push_back(pos);
        }
    }

    pub fn pop(&mut self) -> Option<usize> {
        let pos = self.queue.pop_front()?;
        self.pending.set(pos, false);
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_positions_are_not_duplicated() {
        let mut work = WorkList::new(4);
        for pos in [1, 2, 1, 3, 2] {
            work.push(pos);
        }
        assert_eq!(work.pop(), Some(1));
        work.push(1);
        work.push(3);
        assert_eq!(work.pop(), Some(2));
        assert_eq!(work.pop(), Some(3));
        assert_eq!(work.pop(), Some(1));
        assert_eq!(work.pop(), None);
    }
}
