//! A proposer injecting a hash whose EL block time lies in the future
//! fails PreBlocker validation; the cycle degrades to a no-op instead
//! of diverging or halting.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, mocks, mocks::MockBeacon, HASH};
use symbiotic_abci::{tx::encode_block_hash_tx, types::FinalizeBlockRequest};
use symbiotic_types::{sync::HeaderInfo, validator::BondStatus};

#[tokio::test]
async fn future_block_time_skips_the_cycle() {
    let mut app = build_app(MockBeacon::resolving(HASH, 0), U256::from(1_000_000u64));
    let val = add_validator(&app.keeper, 1, 5_000_000);

    // bond the existing set on an off-schedule height first
    app.handler.end_block(&HeaderInfo::new(29, 1_699_999_900)).await.unwrap();

    // EL reports a block 100 seconds in the consensus future
    mocks::push_block_header(&app.transport, HASH, 100, 1_700_000_100);
    app.handler
        .pre_blocker(&FinalizeBlockRequest {
            height: 30,
            time: 1_700_000_000,
            txs: vec![encode_block_hash_tx(HASH)],
            app_hash: vec![],
            next_validators_hash: vec![],
        })
        .await
        .unwrap();

    let cached = app.keeper.cached_block_hash().unwrap().unwrap();
    assert!(cached.is_invalid());
    assert_eq!(cached.height, 30);

    // EndBlock sees the sentinel: no token rewrites, no further updates
    let updates = app.handler.end_block(&HeaderInfo::new(30, 1_700_000_000)).await.unwrap();
    assert!(updates.is_empty());

    let val = app.keeper.get_validator(&val.operator_address).unwrap();
    assert_eq!(val.tokens, U256::from(5_000_000u64));
    assert_eq!(val.status, BondStatus::Bonded);
}
