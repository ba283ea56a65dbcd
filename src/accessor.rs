//! Read-only chain access boundary.
//!
//! Everything the resolution layer knows about a chain comes through
//! [`ChainAccessor`]. Implementations sit on top of a provider pool that
//! already handles retries, rate limits and quorum verification, so errors
//! surfacing here are either permanent or already-retried transient failures
//! and the search logic propagates them unmodified.

use crate::types::{EventPage, FillStatus, PageOptions, RelayKey, Sample};
use alloy::transports::{RpcError, TransportErrorKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{ops::RangeInclusive, sync::Arc};

/// Commitment level a head query is resolved at.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentLevel {
    /// The newest id the node has seen.
    #[default]
    Latest,
    /// Voted on by a supermajority, unlikely to roll back.
    Confirmed,
    /// Finalized, cannot roll back.
    Finalized,
}

/// Errors surfaced by a [`ChainAccessor`].
#[derive(Debug, thiserror::Error)]
pub enum AccessorError {
    /// Transport-level failure. The provider pool has already exhausted its
    /// retries by the time this surfaces.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// The node returned a response the accessor could not decode.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl AccessorError {
    /// Whether retrying the call with the same inputs can succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }
}

/// Read-only access to one chain.
#[async_trait]
pub trait ChainAccessor: Send + Sync + std::fmt::Debug {
    /// The sample produced at `id`, or `None` when the id is a hole (no block
    /// or slot was produced there).
    async fn sample_at(&self, id: u64) -> Result<Option<Sample>, AccessorError>;

    /// The most recent produced sample at the given commitment level.
    async fn head(&self, commitment: CommitmentLevel) -> Result<Sample, AccessorError>;

    /// Value of the chain's monotonic counter as of `id`.
    ///
    /// For EVM spoke pools this is the deposit count; for SVM chains it is
    /// the block height of the slot. Ids that are holes resolve to the
    /// counter at the nearest produced id below them.
    async fn counter_at(&self, id: u64) -> Result<u64, AccessorError>;

    /// Fill status of the relay identified by `key` as of `id`.
    async fn fill_status_at(&self, key: RelayKey, id: u64) -> Result<FillStatus, AccessorError>;

    /// One page of spoke pool events correlated to `key`, newest first.
    ///
    /// Pages below `range.start()` may be returned; the caller stops paging
    /// once the floor is passed and discards out-of-range events.
    async fn events_for_key(
        &self,
        key: RelayKey,
        range: RangeInclusive<u64>,
        page: PageOptions,
    ) -> Result<EventPage, AccessorError>;
}

#[async_trait]
impl<A: ChainAccessor + ?Sized> ChainAccessor for Arc<A> {
    async fn sample_at(&self, id: u64) -> Result<Option<Sample>, AccessorError> {
        (**self).sample_at(id).await
    }

    async fn head(&self, commitment: CommitmentLevel) -> Result<Sample, AccessorError> {
        (**self).head(commitment).await
    }

    async fn counter_at(&self, id: u64) -> Result<u64, AccessorError> {
        (**self).counter_at(id).await
    }

    async fn fill_status_at(&self, key: RelayKey, id: u64) -> Result<FillStatus, AccessorError> {
        (**self).fill_status_at(key, id).await
    }

    async fn events_for_key(
        &self,
        key: RelayKey,
        range: RangeInclusive<u64>,
        page: PageOptions,
    ) -> Result<EventPage, AccessorError> {
        (**self).events_for_key(key, range, page).await
    }
}

/// The produced sample at `id`, or the nearest produced sample below it.
///
/// A hole is retried at `id - 1` rather than treated as an error, down to
/// `floor` inclusive. Returns `None` when every id in `floor..=id` is a hole.
pub async fn produced_at_or_below<A: ChainAccessor + ?Sized>(
    accessor: &A,
    id: u64,
    floor: u64,
) -> Result<Option<Sample>, AccessorError> {
    let mut cursor = id;
    loop {
        if let Some(sample) = accessor.sample_at(cursor).await? {
            return Ok(Some(sample));
        }
        if cursor <= floor {
            return Ok(None);
        }
        cursor -= 1;
    }
}
