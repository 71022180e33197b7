//! Finalized-hash resolver over the Beacon HTTP API.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use symbiotic_types::{
    constants::{
        BEACON_BLOCK_PATH, BEACON_GENESIS_TIMESTAMP, DEFAULT_FINALITY_LAG_EPOCHS, INVALID_BLOCKHASH,
        RETRIES, SLEEP_ON_RETRY, SLOTS_IN_EPOCH, SLOT_DURATION,
    },
    error::SourceError,
    sync::FinalizedHashSource,
};
use tracing::{debug, warn};

use crate::endpoints::ApiUrls;

/// Response shape of `GET /eth/v2/beacon/blocks/{slot}`, reduced to the
/// fields the resolver reads.
#[derive(Debug, Deserialize)]
struct BeaconBlockResponse {
    /// Endpoints differing in version may omit the flag; absence is
    /// treated as finalized.
    #[serde(default)]
    finalized: Option<bool>,
    data: BeaconBlockData,
}

#[derive(Debug, Deserialize)]
struct BeaconBlockData {
    message: BeaconBlockMessage,
}

#[derive(Debug, Deserialize)]
struct BeaconBlockMessage {
    body: BeaconBlockBody,
}

#[derive(Debug, Deserialize)]
struct BeaconBlockBody {
    execution_payload: ExecutionPayload,
}

#[derive(Debug, Deserialize)]
struct ExecutionPayload {
    block_hash: String,
}

/// Resolves the canonical finalized execution block hash for a given
/// consensus header time.
///
/// Only the proposer of a sync height calls this; every other node
/// learns the result through the injected pseudo-tx.
pub struct BeaconClient {
    http: Client,
    urls: Arc<ApiUrls>,
    finality_lag_epochs: i64,
}

impl BeaconClient {
    pub fn new(urls: Arc<ApiUrls>) -> Self {
        Self {
            http: Client::new(),
            urls,
            finality_lag_epochs: DEFAULT_FINALITY_LAG_EPOCHS,
        }
    }

    /// Overrides how many epochs behind the current epoch start the
    /// resolver considers finalized.
    pub fn with_finality_lag(mut self, epochs: i64) -> Self {
        self.finality_lag_epochs = epochs;
        self
    }

    /// First slot of the epoch containing `consensus_time`, pushed back
    /// by the finality lag.
    pub fn finalized_slot(&self, consensus_time: u64) -> i64 {
        let slot = (consensus_time as i64 - BEACON_GENESIS_TIMESTAMP) / SLOT_DURATION;
        let epoch_start = slot / SLOTS_IN_EPOCH * SLOTS_IN_EPOCH;
        epoch_start - self.finality_lag_epochs * SLOTS_IN_EPOCH
    }

    async fn parse_block(&self, slot: i64) -> Result<BeaconBlockResponse, SourceError> {
        let base = self.urls.current_beacon_url();
        let url = format!("{}{}{}", base.as_str().trim_end_matches('/'), BEACON_BLOCK_PATH, slot);

        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| SourceError::Transport(format!("beacon request failed: {e}")))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::SlotOmitted(slot));
        }
        if !resp.status().is_success() {
            return Err(SourceError::InvalidResponse(format!(
                "unexpected status code: {}",
                resp.status()
            )));
        }

        resp.json::<BeaconBlockResponse>()
            .await
            .map_err(|e| SourceError::InvalidResponse(format!("beacon block decode failed: {e}")))
    }

    /// Fetches the block at `slot`, probing forward through the epoch
    /// when the API omits slots.
    async fn block_in_epoch(&self, slot: i64) -> Result<(i64, BeaconBlockResponse), SourceError> {
        let mut last_err = match self.parse_block(slot).await {
            Ok(block) => return Ok((slot, block)),
            Err(err @ SourceError::SlotOmitted(_)) => err,
            Err(err) => return Err(err),
        };

        for offset in 1..SLOTS_IN_EPOCH {
            match self.parse_block(slot + offset).await {
                Ok(block) => return Ok((slot + offset, block)),
                Err(err @ SourceError::SlotOmitted(_)) => last_err = err,
                Err(err) => return Err(err),
            }
        }

        Err(last_err)
    }
}

#[async_trait]
impl FinalizedHashSource for BeaconClient {
    async fn finalized_block_hash(&self, consensus_time: u64) -> Result<String, SourceError> {
        let mut last_err = None;

        for attempt in 0..RETRIES {
            let slot = self.finalized_slot(consensus_time);
            match self.block_in_epoch(slot).await {
                Ok((found_slot, block)) => {
                    if block.finalized == Some(false) {
                        warn!(slot = found_slot, "beacon block not finalized, skipping cycle");
                        return Ok(INVALID_BLOCKHASH.to_owned());
                    }
                    let hash = block.data.message.body.execution_payload.block_hash;
                    debug!(slot = found_slot, %hash, "resolved finalized execution block hash");
                    return Ok(hash);
                }
                Err(err) => {
                    warn!(attempt, error = %err, "beacon request failed, rotating endpoint");
                    last_err = Some(err);
                    self.urls.rotate_beacon();
                    tokio::time::sleep(SLEEP_ON_RETRY).await;
                }
            }
        }

        Err(SourceError::BeaconUnavailable(
            last_err.map(|e| e.to_string()).unwrap_or_else(|| "no attempts made".to_owned()),
        ))
    }

    fn min_block_timestamp(&self, consensus_time: u64) -> u64 {
        let ts = self.finalized_slot(consensus_time) * SLOT_DURATION + BEACON_GENESIS_TIMESTAMP;
        ts.max(0) as u64
    }
}
