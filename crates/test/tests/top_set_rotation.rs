//! External stake can rotate the bonded set: the newly strongest
//! validator bonds, the weakest bonded one begins unbonding with a
//! zero-power update.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, cons_word, mocks, mocks::MockBeacon, HASH};
use symbiotic_abci::{tx::encode_block_hash_tx, types::FinalizeBlockRequest};
use symbiotic_types::{params::Params, sync::HeaderInfo, validator::BondStatus};

#[tokio::test]
async fn losing_the_top_set_begins_unbonding() {
    let reduction = U256::from(1_000_000u64);
    let mut app = build_app(MockBeacon::resolving(HASH, 0), reduction);
    app.keeper.set_params(&Params { max_validators: 2, ..Params::default() }).unwrap();

    let a = add_validator(&app.keeper, 0xA1, 100_000_000);
    let b = add_validator(&app.keeper, 0xB2, 90_000_000);
    let c = add_validator(&app.keeper, 0xC3, 80_000_000);

    // bootstrap: A and B bond, C does not fit
    let updates = app.handler.end_block(&HeaderInfo::new(9, 1_699_999_000)).await.unwrap();
    assert_eq!(updates.len(), 2);

    // sync cycle: the contract bumps C to 200
    mocks::push_block_header(&app.transport, HASH, 100, 1_699_999_940);
    app.handler
        .pre_blocker(&FinalizeBlockRequest {
            height: 10,
            time: 1_700_000_000,
            txs: vec![encode_block_hash_tx(HASH)],
            app_hash: vec![],
            next_validators_hash: vec![],
        })
        .await
        .unwrap();

    mocks::push_validator_set(
        &app.transport,
        &[
            (U256::from(100_000_000u64), cons_word(&a)),
            (U256::from(90_000_000u64), cons_word(&b)),
            (U256::from(200_000_000u64), cons_word(&c)),
        ],
    );
    let header = HeaderInfo::new(10, 1_700_000_000);
    let updates = app.handler.end_block(&header).await.unwrap();

    // C rises to 200, B drops to zero; A is untouched and silent
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0].pub_key, c.consensus_pubkey);
    assert_eq!(updates[0].power, 200);
    assert_eq!(updates[1].pub_key, b.consensus_pubkey);
    assert_eq!(updates[1].power, 0);

    let bonded: Vec<BondStatus> = [&c, &a, &b]
        .iter()
        .map(|v| app.keeper.get_validator(&v.operator_address).unwrap().status)
        .collect();
    assert_eq!(bonded, vec![BondStatus::Bonded, BondStatus::Bonded, BondStatus::Unbonding]);

    let b = app.keeper.get_validator(&b.operator_address).unwrap();
    assert_eq!(
        b.unbonding_time,
        header.time + Params::default().unbonding_time.as_secs()
    );
    assert_eq!(app.keeper.get_last_total_power().unwrap(), 300);
}
