//! Resolution configuration.
use crate::{
    accessor::CommitmentLevel,
    constants::{
        DEFAULT_EVENT_PAGE_LIMIT, DEFAULT_EVM_BLOCK_TIME, DEFAULT_STEP_CUSHION,
        DEFAULT_SVM_SLOT_TIME, MAX_SAFE_DEPOSIT_ID,
    },
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the chain-state resolution layer of one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionConfig {
    /// Average wall-clock time between produced ids.
    ///
    /// Only used to size the first backward step of a time resolution; the
    /// search verifies every probe, so an inaccurate figure costs extra
    /// probes, never a wrong answer.
    pub avg_id_time: Duration,
    /// Multiplier padding backward step estimates. Must be at least 1.
    pub step_cushion: f64,
    /// Deposit ids above this are not guaranteed ordered on chain and are
    /// rejected before any search.
    pub max_safe_deposit_id: u64,
    /// Number of events fetched per page when draining a relay's history.
    pub event_page_limit: usize,
    /// Commitment level head queries are resolved at.
    pub commitment: CommitmentLevel,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self::evm()
    }
}

impl ResolutionConfig {
    /// Defaults for an EVM chain.
    pub fn evm() -> Self {
        Self {
            avg_id_time: DEFAULT_EVM_BLOCK_TIME,
            step_cushion: DEFAULT_STEP_CUSHION,
            max_safe_deposit_id: MAX_SAFE_DEPOSIT_ID,
            event_page_limit: DEFAULT_EVENT_PAGE_LIMIT,
            commitment: CommitmentLevel::Latest,
        }
    }

    /// Defaults for an SVM chain.
    pub fn svm() -> Self {
        Self {
            avg_id_time: DEFAULT_SVM_SLOT_TIME,
            commitment: CommitmentLevel::Confirmed,
            ..Self::evm()
        }
    }

    /// Sets the average time between produced ids.
    pub fn with_avg_id_time(mut self, avg_id_time: Duration) -> Self {
        self.avg_id_time = avg_id_time;
        self
    }

    /// Sets the backward step cushion.
    pub fn with_step_cushion(mut self, step_cushion: f64) -> Self {
        self.step_cushion = step_cushion;
        self
    }

    /// Sets the commitment level for head queries.
    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = commitment;
        self
    }
}
