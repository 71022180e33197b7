//! The full happy-path sync cycle: the proposer injects the finalized
//! hash, PreBlocker validates and caches it, EndBlock pulls the
//! contract's stake and bonds the matching validator.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, cons_word, mocks, mocks::MockBeacon, HASH};
use symbiotic_abci::{
    tx::decode_block_hash_tx,
    types::{FinalizeBlockRequest, PrepareProposalRequest},
};
use symbiotic_types::{sync::HeaderInfo, validator::BondStatus};

#[tokio::test]
async fn sync_cycle_applies_external_stake() {
    let one_eth = U256::from(10u64).pow(U256::from(18u64));
    let mut app = build_app(MockBeacon::resolving(HASH, 1_699_000_000), one_eth);

    // registered but never funded: unbonded, zero tokens, no last power
    let val = add_validator(&app.keeper, 0xBB, 0);

    // proposer path
    let resp = app
        .handler
        .prepare_proposal(PrepareProposalRequest { height: 20, time: 1_700_000_000, txs: vec![] })
        .await;
    assert_eq!(decode_block_hash_tx(&resp.txs[0]).unwrap(), HASH);

    // every node validates the EL header and caches the hash
    mocks::push_block_header(&app.transport, HASH, 100, 1_699_999_940);
    app.handler
        .pre_blocker(&FinalizeBlockRequest {
            height: 20,
            time: 1_700_000_000,
            txs: resp.txs,
            app_hash: vec![],
            next_validators_hash: vec![],
        })
        .await
        .unwrap();

    let cached = app.keeper.cached_block_hash().unwrap().unwrap();
    assert_eq!(cached.block_hash, HASH);
    assert_eq!(cached.height, 20);

    // EndBlock reads the contract at the pinned hash
    mocks::push_validator_set(&app.transport, &[(one_eth, cons_word(&val))]);
    let updates = app.handler.end_block(&HeaderInfo::new(20, 1_700_000_000)).await.unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].pub_key, val.consensus_pubkey);
    assert_eq!(updates[0].power, 1);

    let val = app.keeper.get_validator(&val.operator_address).unwrap();
    assert_eq!(val.tokens, one_eth);
    assert_eq!(val.status, BondStatus::Bonded);
    assert_eq!(app.keeper.get_last_validator_power(&val.operator_address).unwrap(), Some(1));
    assert_eq!(app.keeper.get_last_total_power().unwrap(), 1);
}
