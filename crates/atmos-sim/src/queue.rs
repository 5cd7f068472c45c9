//! The mutation queue.

use atmos_core::MutationRecord;

/// FIFO buffer of host writes awaiting the next tick.
///
/// Drained in submission order at the start of refresh, so two
/// mutations to the same cell compose in the order they were queued.
#[derive(Debug, Default)]
pub struct MutationQueue {
    records: Vec<MutationRecord>,
}

impl MutationQueue {
    /// An empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: MutationRecord) {
        self.records.push(record);
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Remove and yield every record in submission order.
    pub fn drain(&mut self) -> impl Iterator<Item = MutationRecord> + '_ {
        self.records.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atmos_core::{Mutation, TilePos};

    #[test]
    fn drains_in_submission_order() {
        let mut queue = MutationQueue::new();
        queue.push(MutationRecord::environment(
            TilePos::new(0, 0),
            Mutation::AddHeat(1.0),
        ));
        queue.push(MutationRecord::environment(
            TilePos::new(0, 0),
            Mutation::AddHeat(2.0),
        ));
        let heats: Vec<f32> = queue
            .drain()
            .map(|r| match r.mutation {
                Mutation::AddHeat(j) => j,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(heats, vec![1.0, 2.0]);
        assert!(queue.is_empty());
    }
}
