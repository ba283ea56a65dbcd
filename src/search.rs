//! Monotonic boundary searches.
//!
//! Three questions share the shape "first id where a non-decreasing on-chain
//! value crosses a target": which block a deposit landed in, which block a
//! relay was filled in, and which slot carries a given block height. The
//! bound-update rules differ subtly per question and are deliberately kept as
//! separate instantiations instead of one parameterized search.

use crate::{
    accessor::{AccessorError, ChainAccessor, produced_at_or_below},
    config::ResolutionConfig,
    metrics::SearchMetrics,
    types::RelayKey,
};
use alloy::primitives::U256;
use std::ops::RangeInclusive;
use tracing::trace;

/// Errors returned by the boundary searches.
///
/// A boundary that never crosses inside the range is not an error: it is the
/// `Ok(None)` outcome, which callers branch on as a legitimate business
/// result ("not yet deposited", "not yet filled").
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The deposit id is outside the range where on-chain ordering is
    /// guaranteed, so a binary search over it would be meaningless. Rejected
    /// before any RPC call; permanent for the given input.
    #[error("deposit id {0} is above the safe ordering ceiling")]
    UnsafeDepositId(U256),
    /// The supplied range has its endpoints inverted.
    #[error("invalid search range: low {low} is above high {high}")]
    InvalidRange {
        /// The low end of the range.
        low: u64,
        /// The high end of the range.
        high: u64,
    },
    /// The accessor failed. Propagated unmodified.
    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

impl SearchError {
    /// Whether retrying the search with the same inputs can succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::UnsafeDepositId(_) | Self::InvalidRange { .. } => false,
            Self::Accessor(err) => err.is_transient(),
        }
    }
}

/// Boundary searches over one chain's monotonic counters.
#[derive(Debug)]
pub struct BoundarySearch<A> {
    accessor: A,
    config: ResolutionConfig,
    metrics: SearchMetrics,
}

impl<A: ChainAccessor> BoundarySearch<A> {
    /// Create a new search handle over `accessor`.
    pub fn new(accessor: A, config: ResolutionConfig) -> Self {
        Self { accessor, config, metrics: SearchMetrics::default() }
    }

    /// Find the first id at which the spoke pool's deposit count exceeds
    /// `deposit_id`, i.e. the id the deposit was included at.
    ///
    /// Returns `None` when the count does not cross `deposit_id` inside the
    /// range. The crossing must be bracketed by the endpoints: a deposit
    /// made before `range.start()` is reported as `None`, not as the range
    /// start.
    pub async fn find_deposit_block(
        &self,
        deposit_id: U256,
        range: RangeInclusive<u64>,
    ) -> Result<Option<u64>, SearchError> {
        if deposit_id > U256::from(self.config.max_safe_deposit_id) {
            return Err(SearchError::UnsafeDepositId(deposit_id));
        }
        let deposit_id = deposit_id.to::<u64>();
        let (mut low, mut high) = Self::endpoints(&range)?;

        // Plausibility first: both endpoint counts in one concurrent round
        // trip, and no further probing when the crossing is not in range.
        let (count_low, count_high) =
            tokio::try_join!(self.accessor.counter_at(low), self.accessor.counter_at(high))?;
        self.metrics.probes.increment(2);
        if count_low > deposit_id || count_high <= deposit_id {
            self.metrics.implausible_ranges.increment(1);
            trace!(deposit_id, count_low, count_high, "Deposit not bracketed by range");
            return Ok(None);
        }

        // First id where the count exceeds the target: a too-high count keeps
        // the probe id as the upper bound, a too-low one steps past it.
        while low < high {
            let mid = low + (high - low) / 2;
            self.metrics.probes.increment(1);
            if self.accessor.counter_at(mid).await? > deposit_id {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        Ok(Some(low))
    }

    /// Find the first id at which the relay identified by `key` reports
    /// [`FillStatus::Filled`](crate::types::FillStatus::Filled).
    ///
    /// Returns `None` when the relay was already filled before the range
    /// started or is not filled by its end.
    pub async fn find_fill_block(
        &self,
        key: RelayKey,
        range: RangeInclusive<u64>,
    ) -> Result<Option<u64>, SearchError> {
        let (mut low, mut high) = Self::endpoints(&range)?;

        let (at_low, at_high) = tokio::try_join!(
            self.accessor.fill_status_at(key, low),
            self.accessor.fill_status_at(key, high)
        )?;
        self.metrics.probes.increment(2);
        if at_low.is_filled() || !at_high.is_filled() {
            self.metrics.implausible_ranges.increment(1);
            trace!(%key, ?at_low, ?at_high, "Fill not bracketed by range");
            return Ok(None);
        }

        while low < high {
            let mid = low + (high - low) / 2;
            self.metrics.probes.increment(1);
            if self.accessor.fill_status_at(key, mid).await?.is_filled() {
                high = mid;
            } else {
                low = mid + 1;
            }
        }
        Ok(Some(low))
    }

    /// Find the slot whose block carries `height`.
    ///
    /// SVM RPCs expose the block height of a slot but no height-to-slot
    /// mapping, so the slot is recovered by searching the height curve.
    /// Skipped slots make the curve sparse: the converged slot can itself be
    /// a hole whose effective height comes from the nearest produced slot
    /// below it, so this search ends by walking down to that slot and
    /// verifying its height exactly — a different tail than the deposit and
    /// fill searches, kept separate on purpose.
    pub async fn slot_for_block_height(
        &self,
        height: u64,
        range: RangeInclusive<u64>,
    ) -> Result<Option<u64>, SearchError> {
        let (mut low, mut high) = Self::endpoints(&range)?;
        let floor = low;

        let (height_low, height_high) =
            tokio::try_join!(self.accessor.counter_at(low), self.accessor.counter_at(high))?;
        self.metrics.probes.increment(2);
        if height_low > height || height_high < height {
            self.metrics.implausible_ranges.increment(1);
            trace!(height, height_low, height_high, "Height not bracketed by range");
            return Ok(None);
        }

        // First slot whose effective height reaches the target.
        while low < high {
            let mid = low + (high - low) / 2;
            self.metrics.probes.increment(1);
            if self.accessor.counter_at(mid).await? < height {
                low = mid + 1;
            } else {
                high = mid;
            }
        }

        let Some(slot) = produced_at_or_below(&self.accessor, low, floor).await? else {
            return Ok(None);
        };
        self.metrics.probes.increment(1);
        Ok((self.accessor.counter_at(slot.id).await? == height).then_some(slot.id))
    }

    fn endpoints(range: &RangeInclusive<u64>) -> Result<(u64, u64), SearchError> {
        let (low, high) = (*range.start(), *range.end());
        if low > high {
            return Err(SearchError::InvalidRange { low, high });
        }
        Ok((low, high))
    }
}
