//! An EL that re-orged past the pinned hash answers "not currently
//! canonical"; the reader swallows it into an empty set and the cycle
//! becomes a no-op.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, mocks, mocks::MockBeacon, HASH};
use symbiotic_abci::{tx::encode_block_hash_tx, types::FinalizeBlockRequest};
use symbiotic_types::sync::HeaderInfo;

#[tokio::test]
async fn reorged_hash_yields_no_changes() {
    let mut app = build_app(MockBeacon::resolving(HASH, 0), U256::from(1_000_000u64));
    let val = add_validator(&app.keeper, 1, 5_000_000);

    app.handler.end_block(&HeaderInfo::new(39, 1_699_999_900)).await.unwrap();

    // PreBlocker accepts the hash while it is still canonical
    mocks::push_block_header(&app.transport, HASH, 100, 1_699_999_940);
    app.handler
        .pre_blocker(&FinalizeBlockRequest {
            height: 40,
            time: 1_700_000_000,
            txs: vec![encode_block_hash_tx(HASH)],
            app_hash: vec![],
            next_validators_hash: vec![],
        })
        .await
        .unwrap();
    assert_eq!(app.keeper.cached_block_hash().unwrap().unwrap().block_hash, HASH);

    // by EndBlock the EL has re-orged past it
    mocks::push_not_canonical(&app.transport, HASH);
    let updates = app.handler.end_block(&HeaderInfo::new(40, 1_700_000_000)).await.unwrap();

    assert!(updates.is_empty());
    let val = app.keeper.get_validator(&val.operator_address).unwrap();
    assert_eq!(val.tokens, U256::from(5_000_000u64));
}
