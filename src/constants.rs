//! Resolution constants.

use std::time::Duration;

/// Average SVM slot production cadence.
pub const DEFAULT_SVM_SLOT_TIME: Duration = Duration::from_millis(400);

/// Average EVM block cadence used when no chain-specific figure is configured.
pub const DEFAULT_EVM_BLOCK_TIME: Duration = Duration::from_secs(12);

/// Padding applied to backward step estimates so the first probe usually
/// lands at or past the target. Must be at least 1.
pub const DEFAULT_STEP_CUSHION: f64 = 1.5;

/// Highest deposit id that is guaranteed to be assigned in strictly
/// increasing order on chain. Ids above it come from unsafe deposit paths and
/// cannot be binary searched.
pub const MAX_SAFE_DEPOSIT_ID: u64 = u32::MAX as u64;

/// Default number of events fetched per page when draining a relay's history.
pub const DEFAULT_EVENT_PAGE_LIMIT: usize = 1_000;
