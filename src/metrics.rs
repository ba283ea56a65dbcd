//! Resolution metrics.

use metrics::Counter;
use metrics_derive::Metrics;

/// Metrics for a [`BlockFinder`](crate::finder::BlockFinder).
#[derive(Metrics)]
#[metrics(scope = "chainstate_finder")]
pub struct FinderMetrics {
    /// Samples fetched from the accessor while resolving timestamps.
    pub probes: Counter,
    /// Resolutions answered entirely from the sample index.
    pub memo_hits: Counter,
}

/// Metrics for the boundary searches.
#[derive(Metrics)]
#[metrics(scope = "chainstate_search")]
pub struct SearchMetrics {
    /// Oracle values fetched from the accessor while searching boundaries.
    pub probes: Counter,
    /// Searches whose range pre-check failed, skipping the probe loop.
    pub implausible_ranges: Counter,
}
