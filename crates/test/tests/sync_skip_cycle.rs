//! Heights that are not a multiple of the sync period leave proposals,
//! the hash cache and validator tokens untouched.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, mocks::MockBeacon, HASH};
use symbiotic_abci::types::{FinalizeBlockRequest, PrepareProposalRequest};
use symbiotic_types::{sync::HeaderInfo, validator::BondStatus};

#[tokio::test]
async fn off_schedule_heights_are_plain_blocks() {
    let mut app = build_app(MockBeacon::resolving(HASH, 0), U256::from(1_000_000u64));
    let val = add_validator(&app.keeper, 1, 5_000_000);

    // PrepareProposal passes user txs through unchanged
    let resp = app
        .handler
        .prepare_proposal(PrepareProposalRequest {
            height: 11,
            time: 1_700_000_000,
            txs: vec![b"user-tx".to_vec()],
        })
        .await;
    assert_eq!(resp.txs, vec![b"user-tx".to_vec()]);

    // PreBlocker is a no-op for the cache
    app.handler
        .pre_blocker(&FinalizeBlockRequest {
            height: 11,
            time: 1_700_000_000,
            txs: resp.txs,
            app_hash: vec![0xAA],
            next_validators_hash: vec![0xBB],
        })
        .await
        .unwrap();
    assert!(app.keeper.cached_block_hash().unwrap().is_none());

    // EndBlock updates derive solely from the existing tokens
    let updates = app.handler.end_block(&HeaderInfo::new(11, 1_700_000_000)).await.unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].power, 5);

    let val = app.keeper.get_validator(&val.operator_address).unwrap();
    assert_eq!(val.status, BondStatus::Bonded);
    assert_eq!(val.tokens, U256::from(5_000_000u64));

    // no external call was ever made
    assert!(app.transport.requests().is_empty());
}
