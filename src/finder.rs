//! Timestamp to id resolution.
//!
//! Chains only answer point queries ("what is the timestamp of id N?"), so
//! finding "the id the chain was at, at wall-clock time T" is a search over
//! an expensive oracle. [`BlockFinder`] keeps every answer it pays for in a
//! [`TimeIndex`] memo table and narrows with interpolation rather than
//! bisection: block timestamps are near-linear in id, so a proportional
//! estimate typically lands within a few ids of the target.

use crate::{
    accessor::{AccessorError, ChainAccessor, produced_at_or_below},
    config::ResolutionConfig,
    index::TimeIndex,
    metrics::FinderMetrics,
    types::{Sample, SearchBounds},
};
use futures_util::future::try_join_all;
use tokio::sync::RwLock;
use tracing::{debug, trace};

/// Errors returned while resolving a timestamp.
#[derive(Debug, thiserror::Error)]
pub enum FinderError {
    /// The target timestamp predates the chain's first produced id. Permanent
    /// for the given input; never retried internally.
    #[error("timestamp {timestamp} is before the genesis of the chain")]
    BeforeGenesis {
        /// The timestamp that was requested.
        timestamp: u64,
    },
    /// The accessor failed. Propagated unmodified; retries are the provider
    /// pool's responsibility.
    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

impl FinderError {
    /// Whether retrying the resolution with the same inputs can succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::BeforeGenesis { .. } => false,
            Self::Accessor(err) => err.is_transient(),
        }
    }
}

/// Resolves wall-clock timestamps to chain ids.
///
/// The finder owns the sample memo table for its accessor; multiple finders
/// over different chains are fully independent. Concurrent resolutions
/// against one finder are safe: index mutation is serialized behind a lock
/// that is never held across an accessor call.
#[derive(Debug)]
pub struct BlockFinder<A> {
    accessor: A,
    index: RwLock<TimeIndex>,
    config: ResolutionConfig,
    metrics: FinderMetrics,
}

impl<A: ChainAccessor> BlockFinder<A> {
    /// Create a new finder over `accessor`.
    pub fn new(accessor: A, config: ResolutionConfig) -> Self {
        Self {
            accessor,
            index: RwLock::new(TimeIndex::new()),
            config,
            metrics: FinderMetrics::default(),
        }
    }

    /// Resolve the latest id whose timestamp is at or before `timestamp`.
    ///
    /// Hints seed the memo table and are verified before use. Dropping the
    /// returned future cancels the search at the next accessor call; the
    /// memo table keeps whatever samples were already paid for.
    pub async fn resolve(
        &self,
        timestamp: u64,
        hints: SearchBounds,
    ) -> Result<Sample, FinderError> {
        let mut probes = 0usize;

        // Fast path: the target may be at or after the tip.
        let newest = self.index.read().await.last();
        if newest.is_none_or(|s| s.timestamp < timestamp) {
            let head = self.accessor.head(self.config.commitment).await?;
            probes += 1;
            self.index.write().await.insert(head);
            if head.timestamp <= timestamp {
                self.record(probes);
                return Ok(head);
            }
        }

        probes += self.seed_hints(hints).await?;
        probes += self.expand_left(timestamp).await?;

        // The memo table now brackets the target: expansion guarantees a
        // sample at or before it, and the fast path inserted one after it.
        let (floor, ceiling) = {
            let index = self.index.read().await;
            match index.floor_before(timestamp) {
                Some(at) => (index.get(at), index.get(at + 1)),
                None => (None, None),
            }
        };
        let Some(floor) = floor else {
            return Err(FinderError::BeforeGenesis { timestamp });
        };
        if floor.timestamp == timestamp {
            self.record(probes);
            return Ok(floor);
        }
        let Some(ceiling) = ceiling else {
            self.record(probes);
            return Ok(floor);
        };

        let result = self.narrow(timestamp, floor, ceiling, &mut probes).await?;
        self.record(probes);
        Ok(result)
    }

    /// Interpolation narrowing between a bracketing pair.
    ///
    /// The bracket's id width strictly shrinks every iteration because the
    /// estimate is clamped strictly inside it, so the adjacent-id base case
    /// is always reached. The steps are inherently sequential: each probe
    /// decides which half still brackets the target.
    async fn narrow(
        &self,
        timestamp: u64,
        floor: Sample,
        ceiling: Sample,
        probes: &mut usize,
    ) -> Result<Sample, FinderError> {
        // `low`/`high` bracket the target in id space. `low` may carry a
        // hole-advanced id (see below), so the last produced floor sample is
        // tracked separately as the result.
        let mut result = floor;
        let (mut low, mut high) = (floor, ceiling);

        loop {
            debug_assert!(low.timestamp <= timestamp && timestamp < high.timestamp);
            if high.id == low.id + 1 {
                trace!(id = result.id, timestamp, "Bracket adjacent, floor found");
                return Ok(result);
            }

            let span_ts = (high.timestamp - low.timestamp) as f64;
            let span_id = (high.id - low.id) as f64;
            let offset = ((timestamp - low.timestamp) as f64 / span_ts * span_id).round() as u64;
            let estimate = (low.id + offset).clamp(low.id + 1, high.id - 1);

            *probes += 1;
            match produced_at_or_below(&self.accessor, estimate, low.id + 1).await? {
                Some(probe) => {
                    self.index.write().await.insert(probe);
                    trace!(
                        id = probe.id,
                        probe_timestamp = probe.timestamp,
                        timestamp,
                        "Interpolation probe"
                    );
                    if probe.timestamp == timestamp {
                        return Ok(probe);
                    }
                    if probe.timestamp < timestamp {
                        result = probe;
                        low = probe;
                    } else {
                        high = probe;
                    }
                }
                // Every id in (low, estimate] is a hole. The floor cannot be
                // in there, so the bracket advances past them; the synthetic
                // id is never cached.
                None => low = Sample::new(estimate, low.timestamp),
            }
        }
    }

    /// Fetch and cache hint samples that are not already memoized.
    ///
    /// Hints are independent of each other, so they are fetched concurrently
    /// and joined before the search continues. A hint landing on a hole is
    /// skipped rather than walked: hints are best-effort.
    async fn seed_hints(&self, hints: SearchBounds) -> Result<usize, FinderError> {
        let missing: Vec<u64> = {
            let index = self.index.read().await;
            hints.ids().filter(|id| !index.contains(*id)).collect()
        };
        if missing.is_empty() {
            return Ok(0);
        }

        let fetched = missing.len();
        let samples =
            try_join_all(missing.into_iter().map(|id| self.accessor.sample_at(id))).await?;
        let mut index = self.index.write().await;
        for sample in samples.into_iter().flatten() {
            index.insert(sample);
        }
        Ok(fetched)
    }

    /// Probe backward until the memo table holds a sample at or before the
    /// target timestamp.
    ///
    /// The step is sized from the configured production cadence, padded by
    /// the cushion, and grows by a linear multiplier each round: large enough
    /// to escape a bad cadence estimate, without the overshoot of doubling.
    async fn expand_left(&self, timestamp: u64) -> Result<usize, FinderError> {
        let Some(earliest) = self.index.read().await.first() else {
            return Ok(0);
        };
        if earliest.timestamp <= timestamp {
            return Ok(0);
        }

        let gap = (earliest.timestamp - timestamp) as f64;
        let step = ((gap / self.config.avg_id_time.as_secs_f64()) * self.config.step_cushion)
            .ceil()
            .max(1.0) as u64;

        let mut probes = 0usize;
        let mut multiple = 1u64;
        loop {
            let target_id = earliest.id.saturating_sub(step.saturating_mul(multiple));
            probes += 1;
            let Some(probe) = produced_at_or_below(&self.accessor, target_id, 0).await? else {
                // Nothing produced at or below the probe id: the chain's
                // genesis is above it, and genesis is already known to be
                // after the target.
                return Err(FinderError::BeforeGenesis { timestamp });
            };
            self.index.write().await.insert(probe);
            debug!(id = probe.id, probe_timestamp = probe.timestamp, timestamp, "Backward probe");

            if probe.timestamp <= timestamp {
                return Ok(probes);
            }
            if probe.id == 0 || target_id == 0 {
                return Err(FinderError::BeforeGenesis { timestamp });
            }
            multiple += 1;
        }
    }

    fn record(&self, probes: usize) {
        if probes == 0 {
            self.metrics.memo_hits.increment(1);
        } else {
            self.metrics.probes.increment(probes as u64);
        }
    }

    /// Number of samples currently memoized.
    pub async fn memoized(&self) -> usize {
        self.index.read().await.len()
    }
}
