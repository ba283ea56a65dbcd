//! Deterministic in-memory chain for exercising the resolution layer.
#![allow(dead_code)]

use async_trait::async_trait;
use chainstate::{
    accessor::{AccessorError, ChainAccessor, CommitmentLevel},
    types::{
        EventCursor, EventPage, FillStatus, PageOptions, RelayKey, Sample, SpokeEvent,
        SpokeEventKind,
    },
};
use std::{
    collections::{BTreeMap, HashMap},
    ops::RangeInclusive,
    sync::atomic::{AtomicUsize, Ordering},
};

/// A synthetic chain with a known id/time curve, counter curve, fill status
/// transitions and event history. Ids absent from `samples` are holes.
///
/// Every accessor call is counted, so tests can assert how much RPC traffic
/// a search actually paid for.
#[derive(Debug, Default)]
pub struct MockChain {
    samples: BTreeMap<u64, u64>,
    counters: BTreeMap<u64, u64>,
    fills: HashMap<RelayKey, BTreeMap<u64, FillStatus>>,
    events: Vec<SpokeEvent>,
    broken_samples: Vec<u64>,
    calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// A chain with the given `(id, timestamp)` samples.
    pub fn with_blocks(mut self, blocks: &[(u64, u64)]) -> Self {
        self.samples.extend(blocks.iter().copied());
        self
    }

    /// A chain of `count` ids starting at `start_ts`, `step` seconds apart.
    pub fn linear(count: u64, start_ts: u64, step: u64) -> Self {
        Self::new().with_blocks(
            &(0..count).map(|id| (id, start_ts + id * step)).collect::<Vec<_>>(),
        )
    }

    /// Sets the monotonic counter to `value` from `id` onward.
    pub fn with_counter_points(mut self, points: &[(u64, u64)]) -> Self {
        self.counters.extend(points.iter().copied());
        self
    }

    /// Records that `key` transitioned to `status` at `id`.
    pub fn with_fill_transition(mut self, key: RelayKey, id: u64, status: FillStatus) -> Self {
        self.fills.entry(key).or_default().insert(id, status);
        self
    }

    /// Appends an event to the chain's history.
    pub fn with_event(mut self, event: SpokeEvent) -> Self {
        self.events.push(event);
        self
    }

    /// Makes `sample_at(id)` fail with a transport error.
    pub fn with_broken_sample(mut self, id: u64) -> Self {
        self.broken_samples.push(id);
        self
    }

    /// Number of accessor calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// The counter value at `id`, bypassing the accessor (for brute-force
    /// comparisons that must not affect call counts).
    pub fn counter_value(&self, id: u64) -> u64 {
        self.counters.range(..=id).next_back().map(|(_, v)| *v).unwrap_or_default()
    }

    /// The fill status of `key` at `id`, bypassing the accessor.
    pub fn fill_value(&self, key: RelayKey, id: u64) -> FillStatus {
        self.fills
            .get(&key)
            .and_then(|transitions| transitions.range(..=id).next_back())
            .map(|(_, status)| *status)
            .unwrap_or_default()
    }

    fn tick(&self) {
        self.calls.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl ChainAccessor for MockChain {
    async fn sample_at(&self, id: u64) -> Result<Option<Sample>, AccessorError> {
        self.tick();
        if self.broken_samples.contains(&id) {
            return Err(alloy::transports::TransportErrorKind::custom_str("mock transport down")
                .into());
        }
        Ok(self.samples.get(&id).map(|ts| Sample::new(id, *ts)))
    }

    async fn head(&self, _commitment: CommitmentLevel) -> Result<Sample, AccessorError> {
        self.tick();
        self.samples
            .last_key_value()
            .map(|(id, ts)| Sample::new(*id, *ts))
            .ok_or_else(|| AccessorError::Malformed("mock chain has no samples".into()))
    }

    async fn counter_at(&self, id: u64) -> Result<u64, AccessorError> {
        self.tick();
        Ok(self.counter_value(id))
    }

    async fn fill_status_at(&self, key: RelayKey, id: u64) -> Result<FillStatus, AccessorError> {
        self.tick();
        Ok(self.fill_value(key, id))
    }

    async fn events_for_key(
        &self,
        _key: RelayKey,
        range: RangeInclusive<u64>,
        page: PageOptions,
    ) -> Result<EventPage, AccessorError> {
        self.tick();
        // Newest first, capped at the range ceiling. Events below the floor
        // are returned as a real paginated endpoint would return them; the
        // caller is responsible for stopping and discarding.
        let mut all: Vec<SpokeEvent> =
            self.events.iter().filter(|event| event.id <= *range.end()).cloned().collect();
        all.sort_by_key(|event| std::cmp::Reverse(event.id));

        let start = page.before.map(|cursor| cursor.0 as usize).unwrap_or(0);
        let events: Vec<SpokeEvent> =
            all.iter().skip(start).take(page.limit).cloned().collect();
        let consumed = start + events.len();
        let next = (consumed < all.len()).then_some(EventCursor(consumed as u64));
        Ok(EventPage { events, next })
    }
}

/// Initialize test logging from `RUST_LOG`. Safe to call more than once.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// A relay key for tests.
pub fn key(byte: u8) -> RelayKey {
    RelayKey::repeat_byte(byte)
}

/// A fill event for the relay keyed by `byte`.
pub fn fill_event(id: u64, byte: u8) -> SpokeEvent {
    SpokeEvent::new(id, SpokeEventKind::FilledRelay { relay_key: key(byte) })
}

/// A slow fill request event for the relay keyed by `byte`.
pub fn slow_fill_event(id: u64, byte: u8) -> SpokeEvent {
    SpokeEvent::new(id, SpokeEventKind::RequestedSlowFill { relay_key: key(byte) })
}
