//! Codec of the injected pseudo-tx: a JSON-quoted block hash string
//! prepended at `txs[0]` of sync-height proposals.

use symbiotic_types::{
    constants::{INVALID_BLOCKHASH, MAX_BLOCK_HASH_TX_LEN},
    error::StakingError,
};
use tracing::warn;

/// Encodes a block hash (or the sentinel) as the pseudo-tx payload.
pub fn encode_block_hash_tx(block_hash: &str) -> Vec<u8> {
    serde_json::to_vec(block_hash)
        .unwrap_or_else(|_| format!("\"{INVALID_BLOCKHASH}\"").into_bytes())
}

/// A transaction of a finalized block, as seen by the synchronizer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockTx<'a> {
    /// An application transaction, passed through untouched.
    Regular(&'a [u8]),
    /// The proposer-injected side channel carrying the finalized
    /// execution block hash (or the sentinel).
    BlockHash(String),
}

/// Classifies the leading transaction of a block. Only sync heights
/// carry the side channel, and only at `txs[0]`; everything else is a
/// regular transaction.
///
/// A malformed side channel degrades to the sentinel: the tx bytes are
/// replicated, so every node reaches the same verdict.
pub fn classify_first_tx<'a>(height: i64, txs: &'a [Vec<u8>]) -> Option<BlockTx<'a>> {
    use symbiotic_types::constants::SYMBIOTIC_SYNC_PERIOD;

    let first = txs.first()?;
    if height % SYMBIOTIC_SYNC_PERIOD != 0 {
        return Some(BlockTx::Regular(first));
    }
    match decode_block_hash_tx(first) {
        Ok(hash) => Some(BlockTx::BlockHash(hash)),
        Err(err) => {
            warn!(height, error = %err, "malformed hash side channel, degrading to sentinel");
            Some(BlockTx::BlockHash(INVALID_BLOCKHASH.to_owned()))
        }
    }
}

/// Decodes a pseudo-tx back into the block hash string. Enforces the
/// size bound before parsing; the tx bytes are replicated, so failure
/// here is deterministic across nodes.
pub fn decode_block_hash_tx(tx: &[u8]) -> Result<String, StakingError> {
    if tx.len() > MAX_BLOCK_HASH_TX_LEN {
        return Err(StakingError::InvalidRequest(format!(
            "pseudo-tx exceeds {MAX_BLOCK_HASH_TX_LEN} bytes: {}",
            tx.len()
        )));
    }
    serde_json::from_slice(tx)
        .map_err(|e| StakingError::InvalidRequest(format!("failed to decode pseudo-tx: {e}")))
}
