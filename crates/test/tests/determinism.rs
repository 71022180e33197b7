//! Determinism of EndBlock: once a hash is consensus-anchored, nodes
//! with different endpoint luck must compute byte-identical updates and
//! post-state, and replaying the same apply must be idempotent.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, cons_word, mocks, mocks::MockBeacon, TestApp, HASH};
use symbiotic_types::{sync::HeaderInfo, validator::ValidatorUpdate};

fn seeded_app() -> TestApp {
    let app = build_app(MockBeacon::resolving(HASH, 0), U256::from(1_000_000u64));
    add_validator(&app.keeper, 1, 5_000_000);
    add_validator(&app.keeper, 2, 3_000_000);
    app.keeper.cache_block_hash(HASH, 10).unwrap();
    app
}

fn entries(app: &TestApp) -> Vec<(U256, [u8; 32])> {
    [1u8, 2]
        .iter()
        .map(|seed| {
            let val = app
                .keeper
                .get_validator(&symbiotic_types::address::OperatorAddress::from([*seed; 20]))
                .unwrap();
            (U256::from(*seed as u64 * 4_000_000), cons_word(&val))
        })
        .collect()
}

#[tokio::test]
async fn differing_endpoint_orderings_converge() {
    let header = HeaderInfo::new(10, 1_700_000_000);

    // node A: first endpoint answers immediately
    let app_a = seeded_app();
    mocks::push_validator_set(&app_a.transport, &entries(&app_a));
    let updates_a = app_a.handler.end_block(&header).await.unwrap();

    // node B: first endpoint fails, forcing a rotation mid-cycle
    let app_b = seeded_app();
    app_b.transport.push_transport_error("connection refused");
    mocks::push_validator_set(&app_b.transport, &entries(&app_b));
    let updates_b = app_b.handler.end_block(&header).await.unwrap();

    assert_eq!(updates_a, updates_b);
    assert_eq!(app_a.keeper.store().dump(), app_b.keeper.store().dump());
}

#[tokio::test]
async fn replaying_the_same_apply_is_idempotent() {
    let header = HeaderInfo::new(10, 1_700_000_000);

    let app = seeded_app();
    let set = entries(&app);

    mocks::push_validator_set(&app.transport, &set);
    let first: Vec<ValidatorUpdate> = app.handler.end_block(&header).await.unwrap();
    assert!(!first.is_empty());
    let state_after_first = app.keeper.store().dump();

    // crash-replay: the same hash and contract answer arrive again
    mocks::push_validator_set(&app.transport, &set);
    let second = app.handler.end_block(&header).await.unwrap();

    assert!(second.is_empty());
    assert_eq!(app.keeper.store().dump(), state_after_first);
}
