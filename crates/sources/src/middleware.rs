//! Validator-set reader over the middleware contract.

use std::sync::Arc;

use alloy_sol_types::{sol, SolCall};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use symbiotic_types::{
    aliases::EvmAddress,
    constants::{RETRIES, SLEEP_ON_RETRY},
    error::SourceError,
    sync::{ExecutionBlockHeader, StakeEntry, StakeSource},
};
use tracing::{debug, warn};

use crate::{
    endpoints::ApiUrls,
    transport::{JsonRpcRequest, Transport},
};

sol! {
    /// Validator-set entry reported by the middleware contract.
    #[derive(Debug)]
    struct ValidatorData {
        uint256 stake;
        bytes32 consAddr;
    }

    function getCurrentEpoch() external view returns (uint48 epoch);

    function getValidatorSet(uint48 epoch) external view returns (ValidatorData[] validatorsData);
}

/// An execution layer that re-orged past a pinned hash reports it with
/// this message suffix.
const NOT_CANONICAL_SUFFIX: &str = "is not currently canonical";

/// Reads the middleware contract's validator set at a pinned execution
/// block hash, rotating across EL endpoints on failure.
pub struct MiddlewareClient {
    transport: Arc<dyn Transport>,
    urls: Arc<ApiUrls>,
    contract: EvmAddress,
}

impl MiddlewareClient {
    pub fn new(transport: Arc<dyn Transport>, urls: Arc<ApiUrls>, contract: EvmAddress) -> Self {
        Self { transport, urls, contract }
    }

    async fn request<R>(&self, method: &str, params: serde_json::Value) -> Result<R, SourceError>
    where
        R: DeserializeOwned,
    {
        let req = JsonRpcRequest::new(method, params);
        let url = self.urls.current_eth_url();

        let resp = self.transport.send(&url, &req).await?;

        if let Some(err) = resp.error {
            return Err(SourceError::JsonRpc { code: err.code, message: err.message });
        }

        let result = resp
            .result
            .ok_or_else(|| SourceError::InvalidResponse("missing result field".to_owned()))?;

        serde_json::from_value(result).map_err(|e| SourceError::InvalidResponse(e.to_string()))
    }

    /// `eth_call` against the middleware contract, pinned to
    /// `block_hash` so repeated calls observe one consistent view.
    async fn call_at_hash(
        &self,
        calldata: Vec<u8>,
        block_hash: &str,
    ) -> Result<alloy_primitives::Bytes, SourceError> {
        let params = json!([
            { "to": self.contract, "data": alloy_primitives::Bytes::from(calldata) },
            { "blockHash": block_hash },
        ]);
        self.request("eth_call", params).await
    }

    async fn fetch_validator_set(&self, block_hash: &str) -> Result<Vec<StakeEntry>, SourceError> {
        let raw = self.call_at_hash(getCurrentEpochCall {}.abi_encode(), block_hash).await?;
        let epoch = getCurrentEpochCall::abi_decode_returns(&raw, true)
            .map_err(|e| SourceError::InvalidResponse(format!("getCurrentEpoch decode: {e}")))?
            .epoch;

        let raw = self.call_at_hash(getValidatorSetCall { epoch }.abi_encode(), block_hash).await?;
        let entries = getValidatorSetCall::abi_decode_returns(&raw, true)
            .map_err(|e| SourceError::InvalidResponse(format!("getValidatorSet decode: {e}")))?
            .validatorsData;

        debug!(%block_hash, count = entries.len(), "fetched middleware validator set");

        Ok(entries
            .into_iter()
            .map(|v| StakeEntry { stake: v.stake, cons_addr: v.consAddr.0 })
            .collect())
    }

    async fn fetch_block_header(
        &self,
        block_hash: &str,
    ) -> Result<ExecutionBlockHeader, SourceError> {
        #[derive(serde::Deserialize)]
        struct RpcBlock {
            hash: String,
            number: alloy_primitives::U64,
            timestamp: alloy_primitives::U64,
        }

        let block: Option<RpcBlock> =
            self.request("eth_getBlockByHash", json!([block_hash, false])).await?;
        let block = block.ok_or_else(|| {
            SourceError::InvalidResponse(format!("block {block_hash} not found"))
        })?;

        Ok(ExecutionBlockHeader {
            hash: block.hash,
            number: block.number.to::<u64>(),
            timestamp: block.timestamp.to::<u64>(),
        })
    }
}

fn is_not_canonical(err: &SourceError) -> bool {
    match err {
        SourceError::JsonRpc { message, .. } => message.ends_with(NOT_CANONICAL_SUFFIX),
        SourceError::Transport(message) => message.ends_with(NOT_CANONICAL_SUFFIX),
        _ => false,
    }
}

#[async_trait]
impl StakeSource for MiddlewareClient {
    async fn validator_set_at(&self, block_hash: &str) -> Result<Vec<StakeEntry>, SourceError> {
        let mut last_err = None;

        for attempt in 0..RETRIES {
            match self.fetch_validator_set(block_hash).await {
                Ok(entries) => return Ok(entries),
                Err(err) if is_not_canonical(&err) => {
                    // The EL moved on past the pinned hash; the next
                    // sync cycle picks a fresher one.
                    warn!(%block_hash, "pinned hash no longer canonical, returning empty set");
                    return Ok(Vec::new());
                }
                Err(err) => {
                    warn!(attempt, error = %err, "validator set fetch failed, rotating EL endpoint");
                    last_err = Some(err);
                    self.urls.rotate_eth();
                    tokio::time::sleep(SLEEP_ON_RETRY).await;
                }
            }
        }

        Err(SourceError::ElUnavailable(
            last_err.map(|e| e.to_string()).unwrap_or_else(|| "no attempts made".to_owned()),
        ))
    }

    async fn block_by_hash(&self, block_hash: &str) -> Result<ExecutionBlockHeader, SourceError> {
        let mut last_err = None;

        for attempt in 0..RETRIES {
            match self.fetch_block_header(block_hash).await {
                Ok(header) => return Ok(header),
                Err(err) => {
                    warn!(attempt, error = %err, "block header fetch failed, rotating EL endpoint");
                    last_err = Some(err);
                    self.urls.rotate_eth();
                    tokio::time::sleep(SLEEP_ON_RETRY).await;
                }
            }
        }

        Err(SourceError::ElUnavailable(
            last_err.map(|e| e.to_string()).unwrap_or_else(|| "no attempts made".to_owned()),
        ))
    }
}
