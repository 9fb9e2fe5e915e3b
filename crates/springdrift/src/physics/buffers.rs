//! Role-tagged particle state buffers and the parallel kernel dispatch
//!
//! A [`BufferSet`] owns two or three equally sized slots. One slot is the
//! *front* (the most recently completed state); the others are addressed
//! relative to it. Rotation moves the front index and never copies particle
//! data.
//!
//! Every kernel pass goes through [`BufferSet::dispatch`]: one task per
//! particle index, each task reading any number of shared slots and writing
//! exactly its own element of a single destination slot. `dispatch` returns
//! only after every task has finished, which is the barrier between passes.

use rayon::prelude::*;

/// How many slots a scheme needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Buffering {
    /// Ping-pong between source and destination
    Double,
    /// Circular `previous -> current -> next`
    Triple,
}

impl Buffering {
    pub fn slot_count(self) -> usize {
        match self {
            Buffering::Double => 2,
            Buffering::Triple => 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BufferSet<P> {
    slots: Vec<Vec<P>>,
    front: usize,
}

impl<P: Clone + Send + Sync> BufferSet<P> {
    /// Allocate every slot as a copy of `initial`.
    pub fn new(initial: &[P], buffering: Buffering) -> Self {
        Self {
            slots: vec![initial.to_vec(); buffering.slot_count()],
            front: 0,
        }
    }

    pub fn buffering(&self) -> Buffering {
        if self.slots.len() == 3 {
            Buffering::Triple
        } else {
            Buffering::Double
        }
    }

    /// Number of particles in each slot
    pub fn len(&self) -> usize {
        self.slots[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slot index holding the latest completed state
    pub fn current_index(&self) -> usize {
        self.front
    }

    /// Slot index the next pass writes into
    pub fn next_index(&self) -> usize {
        (self.front + 1) % self.slots.len()
    }

    /// Slot index holding the state before the current one.
    ///
    /// With double buffering this is the same slot as [`Self::next_index`].
    pub fn previous_index(&self) -> usize {
        (self.front + self.slots.len() - 1) % self.slots.len()
    }

    /// Slot `offset` positions after the front
    pub fn index_after_front(&self, offset: usize) -> usize {
        (self.front + offset) % self.slots.len()
    }

    /// The only view exposed outside a step
    pub fn current(&self) -> &[P] {
        &self.slots[self.front]
    }

    pub fn slot(&self, index: usize) -> &[P] {
        &self.slots[index]
    }

    /// Promote the `next` slot to `current`.
    pub fn advance(&mut self) {
        self.front = self.next_index();
    }

    /// Run `kernel` once per particle index in parallel.
    ///
    /// `kernel(i, sources)` receives the slots listed in `reads` (in the same
    /// order) and returns the new record for index `i` of slot `write`.
    /// `write` must not appear in `reads`.
    pub fn dispatch<const R: usize, F>(&mut self, reads: [usize; R], write: usize, kernel: F)
    where
        F: Fn(usize, [&[P]; R]) -> P + Sync,
    {
        debug_assert!(
            !reads.contains(&write),
            "kernel pass would read the slot it writes"
        );

        let mut destination = std::mem::take(&mut self.slots[write]);
        {
            let sources: [&[P]; R] = reads.map(|index| self.slots[index].as_slice());
            destination
                .par_iter_mut()
                .enumerate()
                .for_each(|(index, record)| *record = kernel(index, sources));
        }
        self.slots[write] = destination;
    }

    /// Apply `edit` to the same element of every slot.
    ///
    /// Used for out-of-step edits (pinning, moving) that must stay consistent
    /// whichever slot the scheme reads next.
    pub fn edit_all_slots(&mut self, index: usize, mut edit: impl FnMut(&mut P)) {
        for slot in &mut self.slots {
            edit(&mut slot[index]);
        }
    }

    /// Overwrite every slot with copies of `state` and make slot 0 current.
    pub fn refill(&mut self, state: &[P]) {
        for slot in &mut self.slots {
            slot.clear();
            slot.extend_from_slice(state);
        }
        self.front = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_buffer_roles() {
        let mut buffers = BufferSet::new(&[0_u32; 4], Buffering::Double);
        assert_eq!(buffers.current_index(), 0);
        assert_eq!(buffers.next_index(), 1);
        assert_eq!(buffers.previous_index(), 1);

        buffers.advance();
        assert_eq!(buffers.current_index(), 1);
        assert_eq!(buffers.next_index(), 0);
    }

    #[test]
    fn test_triple_buffer_rotation() {
        let mut buffers = BufferSet::new(&[0_u32; 4], Buffering::Triple);
        assert_eq!(
            (buffers.previous_index(), buffers.current_index(), buffers.next_index()),
            (2, 0, 1)
        );

        buffers.advance();
        assert_eq!(
            (buffers.previous_index(), buffers.current_index(), buffers.next_index()),
            (0, 1, 2)
        );

        buffers.advance();
        buffers.advance();
        assert_eq!(buffers.current_index(), 0);
    }

    #[test]
    fn test_dispatch_reads_sources_and_writes_destination() {
        let mut buffers = BufferSet::new(&[1_u64, 2, 3, 4, 5], Buffering::Triple);
        let (previous, current, next) = (
            buffers.previous_index(),
            buffers.current_index(),
            buffers.next_index(),
        );

        buffers.dispatch([current], previous, |i, [src]| src[i] * 10);
        buffers.dispatch([previous, current], next, |i, [a, b]| a[i] + b[i] + i as u64);

        assert_eq!(buffers.slot(previous), &[10, 20, 30, 40, 50]);
        assert_eq!(buffers.slot(current), &[1, 2, 3, 4, 5]);
        assert_eq!(buffers.slot(next), &[11, 23, 35, 47, 59]);

        buffers.advance();
        assert_eq!(buffers.current(), &[11, 23, 35, 47, 59]);
    }

    #[test]
    fn test_dispatch_tasks_see_pre_pass_state_only() {
        // Each task reads its neighbour; results must not depend on task order.
        let mut buffers = BufferSet::new(&(0..1000_u64).collect::<Vec<_>>(), Buffering::Double);
        let (current, next) = (buffers.current_index(), buffers.next_index());
        buffers.dispatch([current], next, |i, [src]| src[(i + 1) % src.len()]);
        buffers.advance();

        let expected: Vec<u64> = (0..1000).map(|i| (i + 1) % 1000).collect();
        assert_eq!(buffers.current(), expected.as_slice());
    }

    #[test]
    fn test_edit_all_slots_and_refill() {
        let mut buffers = BufferSet::new(&[0_i32; 3], Buffering::Triple);
        buffers.edit_all_slots(1, |value| *value = 7);
        for slot in 0..3 {
            assert_eq!(buffers.slot(slot), &[0, 7, 0]);
        }

        buffers.advance();
        buffers.refill(&[4, 5, 6]);
        assert_eq!(buffers.current_index(), 0);
        assert_eq!(buffers.slot(2), &[4, 5, 6]);
        assert_eq!(buffers.buffering(), Buffering::Triple);
    }
}
