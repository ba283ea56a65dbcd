//! Sample memo table.
//!
//! Every probe a search pays for is remembered here, so later searches
//! against the same chain start from a tighter bracket. The table is
//! append-only for the process lifetime: its size is bounded by the number of
//! distinct probes, typically a few dozen per chain.

use crate::types::Sample;

/// An ordered, deduplicated set of [`Sample`]s for one chain.
///
/// Samples are kept sorted ascending by id. Because ids strictly increase
/// with timestamps within a chain, the same order serves both id and
/// timestamp lookups.
#[derive(Debug, Default)]
pub struct TimeIndex {
    samples: Vec<Sample>,
}

impl TimeIndex {
    /// Create an empty index.
    pub const fn new() -> Self {
        Self { samples: Vec::new() }
    }

    /// Insert a sample, keeping ascending id order.
    ///
    /// Idempotent: inserting an id that is already present is a no-op.
    /// Returns whether the sample was actually inserted.
    pub fn insert(&mut self, sample: Sample) -> bool {
        match self.samples.binary_search_by_key(&sample.id, |s| s.id) {
            Ok(_) => false,
            Err(pos) => {
                self.samples.insert(pos, sample);
                true
            }
        }
    }

    /// Index of the last sample with `timestamp <= target`, or `None` when
    /// the target predates everything in the index.
    pub fn floor_before(&self, timestamp: u64) -> Option<usize> {
        self.samples.partition_point(|s| s.timestamp <= timestamp).checked_sub(1)
    }

    /// The sample at `index`.
    pub fn get(&self, index: usize) -> Option<Sample> {
        self.samples.get(index).copied()
    }

    /// Whether a sample with this id is present.
    pub fn contains(&self, id: u64) -> bool {
        self.samples.binary_search_by_key(&id, |s| s.id).is_ok()
    }

    /// The earliest sample.
    pub fn first(&self) -> Option<Sample> {
        self.samples.first().copied()
    }

    /// The latest sample.
    pub fn last(&self) -> Option<Sample> {
        self.samples.last().copied()
    }

    /// Number of samples held.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the index holds no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(pairs: &[(u64, u64)]) -> TimeIndex {
        let mut index = TimeIndex::new();
        for (id, ts) in pairs {
            index.insert(Sample::new(*id, *ts));
        }
        index
    }

    #[test]
    fn inserts_keep_sorted_order() {
        let index = index_of(&[(5, 500), (1, 100), (3, 300), (2, 200), (4, 400)]);
        let ids: Vec<_> = (0..index.len()).map(|i| index.get(i).unwrap().id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn duplicate_insert_is_noop() {
        let mut index = index_of(&[(1, 100), (2, 200)]);
        assert!(!index.insert(Sample::new(2, 200)));
        assert_eq!(index.len(), 2);
        // Same id with a conflicting timestamp must not displace the original.
        assert!(!index.insert(Sample::new(2, 999)));
        assert_eq!(index.get(1), Some(Sample::new(2, 200)));
    }

    #[test]
    fn floor_before_brackets() {
        let index = index_of(&[(0, 100), (1, 140), (2, 180), (3, 220), (4, 260)]);
        assert_eq!(index.floor_before(99), None);
        assert_eq!(index.floor_before(100), Some(0));
        assert_eq!(index.floor_before(200), Some(2));
        assert_eq!(index.floor_before(260), Some(4));
        assert_eq!(index.floor_before(1_000), Some(4));
    }

    #[test]
    fn floor_before_on_empty() {
        assert_eq!(TimeIndex::new().floor_before(0), None);
    }

    #[test]
    fn contains_and_bounds() {
        let index = index_of(&[(10, 1), (30, 2)]);
        assert!(index.contains(10));
        assert!(!index.contains(20));
        assert_eq!(index.first(), Some(Sample::new(10, 1)));
        assert_eq!(index.last(), Some(Sample::new(30, 2)));
    }
}
