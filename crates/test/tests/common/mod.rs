//! Shared fixtures for the end-to-end scenarios: a keeper over the
//! in-memory store, a scripted beacon source, and the real middleware
//! client driven through a scripted JSON-RPC transport.

#![allow(dead_code)]

pub mod mocks;

use std::sync::Arc;

use alloy_primitives::U256;
use symbiotic_abci::ProposalHandler;
use symbiotic_sources::{middleware::MiddlewareClient, transport::mock::MockTransport, ApiUrls};
use symbiotic_staking::{store::MemStore, Keeper};
use symbiotic_types::{
    address::OperatorAddress,
    pubkey::ConsensusPubKey,
    validator::{Description, Validator},
};
use url::Url;

use mocks::MockBeacon;

pub const HASH: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

pub struct TestApp {
    pub keeper: Arc<Keeper<MemStore>>,
    pub handler: ProposalHandler<MemStore>,
    pub transport: MockTransport,
}

/// Builds a node over an in-memory store, with the middleware client
/// wired through a scripted transport and two EL endpoints to rotate
/// across.
pub fn build_app(beacon: MockBeacon, power_reduction: U256) -> TestApp {
    symbiotic_test::init_logging();

    let keeper =
        Arc::new(Keeper::new(MemStore::new(), "gov").with_power_reduction(power_reduction));

    let urls = Arc::new(ApiUrls::new(
        vec![Url::parse("http://beacon.example").unwrap()],
        vec![
            Url::parse("http://el-a.example").unwrap(),
            Url::parse("http://el-b.example").unwrap(),
        ],
    ));
    let transport = MockTransport::new();
    let middleware = Arc::new(MiddlewareClient::new(
        Arc::new(transport.clone()),
        urls,
        alloy_primitives::Address::repeat_byte(0x42),
    ));

    let handler = ProposalHandler::new(keeper.clone(), Arc::new(beacon), middleware);

    TestApp { keeper, handler, transport }
}

/// Registers a validator with the given seed and tokens, indexes
/// included.
pub fn add_validator(keeper: &Keeper<MemStore>, seed: u8, tokens: u64) -> Validator {
    let mut val = Validator::new(
        OperatorAddress::from([seed; 20]),
        ConsensusPubKey::ed25519([seed; 32]),
        Description::new(format!("val-{seed}"), "", "", "", ""),
    )
    .unwrap();
    val.tokens = U256::from(tokens);
    keeper.set_validator(&val).unwrap();
    keeper.set_validator_by_cons_addr(&val).unwrap();
    keeper.set_validator_by_power_index(&val).unwrap();
    val
}

/// The 32-byte identifier the middleware contract would report for this
/// validator: consensus address in the leading 20 bytes.
pub fn cons_word(val: &Validator) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[..20].copy_from_slice(val.cons_address().as_bytes());
    word
}
