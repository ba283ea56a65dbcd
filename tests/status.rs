//! Relay status resolution from event streams.

mod common;

use alloy::primitives::U256;
use chainstate::{
    config::ResolutionConfig,
    status::{RelayStatusResolver, StatusError},
    types::{FillStatus, SpokeEvent, SpokeEventKind},
};
use common::{MockChain, fill_event, key, slow_fill_event};
use std::sync::Arc;

fn resolver_over(chain: Arc<MockChain>) -> RelayStatusResolver<Arc<MockChain>> {
    RelayStatusResolver::new(chain, &ResolutionConfig::evm())
}

#[tokio::test]
async fn no_events_is_unfilled() {
    let resolver = resolver_over(Arc::new(MockChain::new()));
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::Unfilled);
}

#[tokio::test]
async fn slow_fill_request_alone() {
    let chain = Arc::new(MockChain::new().with_event(slow_fill_event(50, 0xaa)));
    let resolver = resolver_over(chain);
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::RequestedSlowFill);
}

#[tokio::test]
async fn fill_supersedes_earlier_slow_fill_request() {
    let chain =
        Arc::new(MockChain::new().with_event(slow_fill_event(50, 0xaa)).with_event(fill_event(80, 0xaa)));
    let resolver = resolver_over(chain);
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::Filled);
}

#[tokio::test]
async fn input_order_does_not_matter() {
    // The fill arrives before the slow fill request in insertion order; the
    // resolver must sort by id before taking the last event.
    let chain =
        Arc::new(MockChain::new().with_event(fill_event(80, 0xaa)).with_event(slow_fill_event(50, 0xaa)));
    let resolver = resolver_over(chain);
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::Filled);
}

#[tokio::test]
async fn duplicated_events_collapse() {
    let chain = Arc::new(
        MockChain::new()
            .with_event(slow_fill_event(50, 0xaa))
            .with_event(slow_fill_event(50, 0xaa))
            .with_event(fill_event(80, 0xaa))
            .with_event(fill_event(80, 0xaa)),
    );
    let resolver = resolver_over(chain);
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::Filled);
}

#[tokio::test]
async fn events_after_the_query_id_are_ignored() {
    let chain =
        Arc::new(MockChain::new().with_event(slow_fill_event(50, 0xaa)).with_event(fill_event(80, 0xaa)));
    let resolver = resolver_over(chain);
    assert_eq!(resolver.resolve(key(0xaa), 60).await.unwrap(), FillStatus::RequestedSlowFill);
    assert_eq!(resolver.resolve(key(0xaa), 49).await.unwrap(), FillStatus::Unfilled);
    assert_eq!(resolver.resolve(key(0xaa), 80).await.unwrap(), FillStatus::Filled);
}

#[tokio::test]
async fn other_relays_events_are_filtered_out() {
    let chain = Arc::new(
        MockChain::new()
            .with_event(slow_fill_event(50, 0xaa))
            .with_event(fill_event(80, 0xbb))
            .with_event(fill_event(90, 0xcc)),
    );
    let resolver = resolver_over(chain);
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::RequestedSlowFill);
    assert_eq!(resolver.resolve(key(0xbb), 100).await.unwrap(), FillStatus::Filled);
    assert_eq!(resolver.resolve(key(0xdd), 100).await.unwrap(), FillStatus::Unfilled);
}

#[tokio::test]
async fn unexpected_event_kind_is_fatal() {
    let chain = Arc::new(
        MockChain::new()
            .with_event(fill_event(80, 0xaa))
            .with_event(SpokeEvent::new(90, SpokeEventKind::FundsDeposited {
                deposit_id: U256::from(7),
            })),
    );
    let resolver = resolver_over(chain);
    let err = resolver.resolve(key(0xaa), 100).await.unwrap_err();
    assert!(
        matches!(err, StatusError::UnexpectedEvent { name: "FundsDeposited", id: 90 }),
        "got {err}"
    );
    assert!(!err.is_transient());
}

#[tokio::test]
async fn pagination_is_drained_and_reordered() {
    common::init_tracing();
    // Enough events to span many pages with a tiny page size; page order is
    // newest first, so the resolver has to both drain and re-sort.
    let mut chain = MockChain::new();
    for id in 0..50 {
        chain = chain.with_event(slow_fill_event(id, 0xaa));
    }
    let chain = Arc::new(chain.with_event(fill_event(55, 0xaa)));

    let config = ResolutionConfig { event_page_limit: 3, ..ResolutionConfig::evm() };
    let resolver = RelayStatusResolver::new(chain.clone(), &config);
    assert_eq!(resolver.resolve(key(0xaa), 100).await.unwrap(), FillStatus::Filled);
    assert!(chain.calls() >= 17, "pagination was not drained: {} calls", chain.calls());
}
