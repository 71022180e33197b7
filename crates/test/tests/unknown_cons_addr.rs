//! The external set may contain consensus keys the chain has never
//! seen. Unknown entries are skipped silently; known validators are
//! still updated.

mod common;

use alloy_primitives::U256;
use common::{add_validator, build_app, cons_word, mocks, mocks::MockBeacon, HASH};
use symbiotic_abci::{tx::encode_block_hash_tx, types::FinalizeBlockRequest};
use symbiotic_types::sync::HeaderInfo;

#[tokio::test]
async fn unknown_entries_are_skipped_silently() {
    let reduction = U256::from(1_000_000u64);
    let mut app = build_app(MockBeacon::resolving(HASH, 0), reduction);
    let known = add_validator(&app.keeper, 1, 5_000_000);

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
            (U256::from(7_000_000u64), [0xEE; 32]), // never registered
            (U256::from(9_000_000u64), cons_word(&known)),
        ],
    );
    let updates = app.handler.end_block(&HeaderInfo::new(10, 1_700_000_000)).await.unwrap();

    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].pub_key, known.consensus_pubkey);
    assert_eq!(updates[0].power, 9);

    let known = app.keeper.get_validator(&known.operator_address).unwrap();
    assert_eq!(known.tokens, U256::from(9_000_000u64));
}
