//! Event-sourced relay status resolution.

use crate::{
    accessor::{AccessorError, ChainAccessor},
    config::ResolutionConfig,
    types::{FillStatus, PageOptions, RelayKey, SpokeEvent, SpokeEventKind},
};
use std::ops::RangeInclusive;
use tracing::trace;

/// Errors returned while resolving a relay's status.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// An event kind that cannot legally appear in a fill status query.
    ///
    /// Fatal on purpose: defaulting to `Unfilled` here would misreport
    /// settlement state for a relay that may well be filled.
    #[error("event `{name}` at id {id} cannot alter fill status")]
    UnexpectedEvent {
        /// The on-chain name of the offending event.
        name: &'static str,
        /// The id the event was emitted in.
        id: u64,
    },
    /// The accessor failed. Propagated unmodified.
    #[error(transparent)]
    Accessor(#[from] AccessorError),
}

impl StatusError {
    /// Whether retrying the resolution with the same inputs can succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::UnexpectedEvent { .. } => false,
            Self::Accessor(err) => err.is_transient(),
        }
    }
}

/// Reduces a relay's event history to its current [`FillStatus`].
///
/// A fill can never be validly followed by a slow fill request for the same
/// relay, so the chronologically last event alone decides the status; no
/// transition history is tracked.
#[derive(Debug)]
pub struct RelayStatusResolver<A> {
    accessor: A,
    page_limit: usize,
}

impl<A: ChainAccessor> RelayStatusResolver<A> {
    /// Create a new resolver over `accessor`.
    pub fn new(accessor: A, config: &ResolutionConfig) -> Self {
        Self { accessor, page_limit: config.event_page_limit }
    }

    /// Current settlement state of the relay identified by `key`, considering
    /// events up to and including `as_of`.
    pub async fn resolve(&self, key: RelayKey, as_of: u64) -> Result<FillStatus, StatusError> {
        let mut events = self.fetch_events(key, 0..=as_of).await?;

        // Pagination order is undefined or descending; the "last" event is
        // only meaningful after an explicit sort. Duplicates from overlapping
        // pages collapse to one occurrence.
        events.sort_by_key(|event| event.id);
        events.dedup();
        events.retain(|event| event.kind.relay_key().is_none_or(|k| k == key));

        // Only fills and slow fill requests can appear here; anything else
        // means the query or the decoder is broken.
        if let Some(event) = events.iter().find(|event| event.kind.relay_key().is_none()) {
            return Err(StatusError::UnexpectedEvent {
                name: event.kind.name(),
                id: event.id,
            });
        }

        let Some(last) = events.last() else {
            trace!(%key, as_of, "No settlement events, relay unfilled");
            return Ok(FillStatus::Unfilled);
        };
        match &last.kind {
            SpokeEventKind::FilledRelay { .. } => Ok(FillStatus::Filled),
            SpokeEventKind::RequestedSlowFill { .. } => Ok(FillStatus::RequestedSlowFill),
            kind @ SpokeEventKind::FundsDeposited { .. } => {
                Err(StatusError::UnexpectedEvent { name: kind.name(), id: last.id })
            }
        }
    }

    /// Drain the accessor's backward pagination until the range floor is
    /// passed or history is exhausted.
    async fn fetch_events(
        &self,
        key: RelayKey,
        range: RangeInclusive<u64>,
    ) -> Result<Vec<SpokeEvent>, StatusError> {
        let mut events = Vec::new();
        let mut cursor = None;
        loop {
            let page = self
                .accessor
                .events_for_key(
                    key,
                    range.clone(),
                    PageOptions { limit: self.page_limit, before: cursor },
                )
                .await?;

            let floor_passed = page.events.iter().any(|event| event.id < *range.start());
            let exhausted = page.events.is_empty() || page.next.is_none();
            events.extend(page.events.into_iter().filter(|event| range.contains(&event.id)));

            if floor_passed || exhausted {
                return Ok(events);
            }
            cursor = page.next;
        }
    }
}
