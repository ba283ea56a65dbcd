//! A collection of resolution handles for different chains.

use crate::{
    accessor::ChainAccessor,
    config::ResolutionConfig,
    finder::{BlockFinder, FinderError},
    search::{BoundarySearch, SearchError},
    status::{RelayStatusResolver, StatusError},
    types::{FillStatus, RelayKey, Sample, SearchBounds},
};
use alloy::primitives::{ChainId, U256, map::HashMap};
use futures_util::future::try_join_all;
use std::{ops::RangeInclusive, sync::Arc};

/// Chain-state resolution for a single chain.
///
/// Bundles the accessor with the finder, searches and status resolver that
/// share it. Each instance owns its own sample memo table, so handles for
/// different chains (and independent handles in tests) never interfere.
#[derive(Debug)]
pub struct ChainState {
    chain_id: ChainId,
    finder: BlockFinder<Arc<dyn ChainAccessor>>,
    search: BoundarySearch<Arc<dyn ChainAccessor>>,
    resolver: RelayStatusResolver<Arc<dyn ChainAccessor>>,
}

impl ChainState {
    /// Create a new handle for one chain.
    pub fn new(
        chain_id: ChainId,
        accessor: Arc<dyn ChainAccessor>,
        config: ResolutionConfig,
    ) -> Self {
        Self {
            chain_id,
            finder: BlockFinder::new(accessor.clone(), config.clone()),
            search: BoundarySearch::new(accessor.clone(), config.clone()),
            resolver: RelayStatusResolver::new(accessor, &config),
        }
    }

    /// The chain this handle resolves against.
    pub const fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// The latest id whose timestamp is at or before `timestamp`.
    pub async fn block_at(
        &self,
        timestamp: u64,
        hints: SearchBounds,
    ) -> Result<Sample, FinderError> {
        self.finder.resolve(timestamp, hints).await
    }

    /// The id the deposit `deposit_id` was included at, if inside `range`.
    pub async fn deposit_block(
        &self,
        deposit_id: U256,
        range: RangeInclusive<u64>,
    ) -> Result<Option<u64>, SearchError> {
        self.search.find_deposit_block(deposit_id, range).await
    }

    /// The id the relay `key` was first filled at, if inside `range`.
    pub async fn fill_block(
        &self,
        key: RelayKey,
        range: RangeInclusive<u64>,
    ) -> Result<Option<u64>, SearchError> {
        self.search.find_fill_block(key, range).await
    }

    /// The slot carrying block height `height`, if inside `range`.
    pub async fn slot_for_height(
        &self,
        height: u64,
        range: RangeInclusive<u64>,
    ) -> Result<Option<u64>, SearchError> {
        self.search.slot_for_block_height(height, range).await
    }

    /// Settlement state of the relay `key` as of `as_of`.
    pub async fn fill_status(&self, key: RelayKey, as_of: u64) -> Result<FillStatus, StatusError> {
        self.resolver.resolve(key, as_of).await
    }

    /// Settlement state of several relays as of `as_of`.
    ///
    /// The per-key event queries are independent, so they are issued
    /// concurrently and joined.
    pub async fn fill_statuses(
        &self,
        keys: impl IntoIterator<Item = RelayKey>,
        as_of: u64,
    ) -> Result<Vec<(RelayKey, FillStatus)>, StatusError> {
        try_join_all(keys.into_iter().map(|key| async move {
            Ok((key, self.resolver.resolve(key, as_of).await?))
        }))
        .await
    }
}

/// A collection of [`ChainState`] handles for different chains.
#[derive(Debug, Default)]
pub struct ChainStates {
    chains: HashMap<ChainId, Arc<ChainState>>,
}

impl ChainStates {
    /// Creates a new instance of [`Self`].
    ///
    /// Fails when the same chain id is supplied twice.
    pub fn new(
        accessors: impl IntoIterator<Item = (ChainId, Arc<dyn ChainAccessor>, ResolutionConfig)>,
    ) -> eyre::Result<Self> {
        let mut chains = HashMap::default();
        for (chain_id, accessor, config) in accessors {
            let state = Arc::new(ChainState::new(chain_id, accessor, config));
            if chains.insert(chain_id, state).is_some() {
                eyre::bail!("duplicate accessor for chain {chain_id}");
            }
        }
        Ok(Self { chains })
    }

    /// Get the handle for a given chain id.
    pub fn get(&self, chain_id: ChainId) -> Option<Arc<ChainState>> {
        self.chains.get(&chain_id).cloned()
    }

    /// Get an iterator over the supported chain ids.
    pub fn chain_ids_iter(&self) -> impl Iterator<Item = &ChainId> {
        self.chains.keys()
    }
}
