use serde::{Deserialize, Serialize};

/// A single point on a chain's id/time curve.
///
/// `id` is a block number on EVM chains and a slot on SVM chains. Ids are only
/// comparable within one chain, where they strictly increase with `timestamp`.
/// Not every id has a sample: SVM slots can be skipped entirely, and such
/// holes are represented by the absence of a sample, never by a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    /// Block number or slot.
    pub id: u64,
    /// Unix timestamp of the block or slot, in seconds.
    pub timestamp: u64,
}

impl Sample {
    /// Create a new instance of [`Self`].
    pub const fn new(id: u64, timestamp: u64) -> Self {
        Self { id, timestamp }
    }
}

/// Caller-supplied id hints seeding a timestamp resolution.
///
/// Hints are used opportunistically: an accurate hint tightens the initial
/// bracket and saves probes, an inaccurate one is simply outgrown by the
/// search. They are always verified against the chain before being trusted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchBounds {
    /// Lowest id the result is expected at.
    pub low: Option<u64>,
    /// Highest id the result is expected at.
    pub high: Option<u64>,
}

impl SearchBounds {
    /// Bounds spanning `low..=high`.
    pub const fn new(low: u64, high: u64) -> Self {
        Self { low: Some(low), high: Some(high) }
    }

    /// Iterator over the ids supplied as hints.
    pub fn ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.low.into_iter().chain(self.high)
    }
}
