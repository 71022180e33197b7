//! Test doubles for the external sources.
//!
//! The beacon side is mocked outright (it is REST, not JSON-RPC); the
//! execution-layer side reuses the real `MiddlewareClient` over a
//! scripted transport so the ABI decode path is exercised end to end.

use alloy_primitives::{aliases::U48, FixedBytes, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use symbiotic_sources::{
    middleware::{getCurrentEpochCall, getValidatorSetCall, ValidatorData},
    transport::mock::MockTransport,
};
use symbiotic_types::{error::SourceError, sync::FinalizedHashSource};

/// Beacon source returning a fixed resolution result.
pub struct MockBeacon {
    pub hash: Result<String, String>,
    pub min_timestamp: u64,
}

impl MockBeacon {
    pub fn resolving(hash: &str, min_timestamp: u64) -> Self {
        Self { hash: Ok(hash.to_owned()), min_timestamp }
    }

    pub fn unavailable() -> Self {
        Self { hash: Err("all beacon endpoints exhausted".to_owned()), min_timestamp: 0 }
    }
}

#[async_trait]
impl FinalizedHashSource for MockBeacon {
    async fn finalized_block_hash(&self, _consensus_time: u64) -> Result<String, SourceError> {
        self.hash.clone().map_err(SourceError::BeaconUnavailable)
    }

    fn min_block_timestamp(&self, _consensus_time: u64) -> u64 {
        self.min_timestamp
    }
}

fn hex_value(data: Vec<u8>) -> serde_json::Value {
    serde_json::to_value(alloy_primitives::Bytes::from(data)).unwrap()
}

/// Scripts one `eth_getBlockByHash` reply.
pub fn push_block_header(transport: &MockTransport, hash: &str, number: u64, timestamp: u64) {
    transport.push_ok(serde_json::json!({
        "hash": hash,
        "number": format!("{number:#x}"),
        "timestamp": format!("{timestamp:#x}"),
    }));
}

/// Scripts the `getCurrentEpoch` + `getValidatorSet` call pair.
pub fn push_validator_set(transport: &MockTransport, entries: &[(U256, [u8; 32])]) {
    transport.push_ok(hex_value(getCurrentEpochCall::abi_encode_returns(&(U48::from(7u64),))));
    let data: Vec<ValidatorData> = entries
        .iter()
        .map(|(stake, addr)| ValidatorData { stake: *stake, consAddr: FixedBytes(*addr) })
        .collect();
    transport.push_ok(hex_value(getValidatorSetCall::abi_encode_returns(&(data,))));
}

/// Scripts the EL rejecting the pinned hash as re-orged away.
pub fn push_not_canonical(transport: &MockTransport, hash: &str) {
    transport.push_rpc_error(-32000, format!("header {hash} is not currently canonical"));
}
