use crate::types::RelayKey;
use alloy::primitives::U256;
use serde::{Deserialize, Serialize};

/// An on-chain spoke pool event, attributed to the id it was emitted in.
///
/// Events arrive from paginated queries in undefined or descending order and
/// may repeat across page boundaries; consumers sort and deduplicate before
/// interpreting them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokeEvent {
    /// Block number or slot the event was emitted in.
    pub id: u64,
    /// Decoded payload.
    pub kind: SpokeEventKind,
}

impl SpokeEvent {
    /// Create a new instance of [`Self`].
    pub const fn new(id: u64, kind: SpokeEventKind) -> Self {
        Self { id, kind }
    }
}

/// Decoded spoke pool event payloads.
///
/// The set is closed: accessors decoding an event kind outside of it fail at
/// the boundary instead of smuggling an opaque catch-all variant into the
/// resolution logic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpokeEventKind {
    /// A deposit was made on the origin chain.
    FundsDeposited {
        /// Sequential id the origin spoke pool assigned to the deposit.
        deposit_id: U256,
    },
    /// A relayer filled the relay on the destination chain.
    FilledRelay {
        /// Correlation key of the filled relay.
        relay_key: RelayKey,
    },
    /// A slow fill was requested for the relay.
    RequestedSlowFill {
        /// Correlation key of the relay the request is for.
        relay_key: RelayKey,
    },
}

impl SpokeEventKind {
    /// The on-chain event name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::FundsDeposited { .. } => "FundsDeposited",
            Self::FilledRelay { .. } => "FilledRelay",
            Self::RequestedSlowFill { .. } => "RequestedSlowFill",
        }
    }

    /// The relay key the event settles against, if the kind carries one.
    pub const fn relay_key(&self) -> Option<RelayKey> {
        match self {
            Self::FilledRelay { relay_key } | Self::RequestedSlowFill { relay_key } => {
                Some(*relay_key)
            }
            Self::FundsDeposited { .. } => None,
        }
    }
}

/// Opaque cursor continuing a backward event page walk.
///
/// Cursors are only meaningful to the accessor that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCursor(pub u64);

/// Pagination parameters for an event query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageOptions {
    /// Maximum number of events per page.
    pub limit: usize,
    /// Resume after this cursor, or start from the newest event when `None`.
    pub before: Option<EventCursor>,
}

/// One page of events, ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPage {
    /// The events in this page.
    pub events: Vec<SpokeEvent>,
    /// Cursor for the next (older) page, `None` when history is exhausted.
    pub next: Option<EventCursor>,
}
