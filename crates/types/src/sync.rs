//! Types and capability traits on the boundary between replicated
//! state and the external Ethereum sources.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{aliases::U256, constants::INVALID_BLOCKHASH, error::SourceError};

/// The single-slot durable record binding a sync height to the
/// execution block hash every honest node agreed on in `PreBlocker`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedBlockHash {
    /// Lowercase 0x-prefixed hex hash, or the `"invalid"` sentinel.
    pub block_hash: String,
    pub height: i64,
}

impl CachedBlockHash {
    pub fn new(block_hash: impl Into<String>, height: i64) -> Self {
        Self { block_hash: block_hash.into(), height }
    }

    pub fn invalid(height: i64) -> Self {
        Self { block_hash: INVALID_BLOCKHASH.to_owned(), height }
    }

    /// True when the proposer-injected hash failed validation and the
    /// cycle must be skipped.
    pub fn is_invalid(&self) -> bool {
        self.block_hash == INVALID_BLOCKHASH
    }
}

/// One entry of the middleware contract's validator set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeEntry {
    pub stake: U256,
    /// 32-byte identifier; the first 20 bytes are the consensus address.
    pub cons_addr: [u8; 32],
}

/// The subset of an execution-layer block header the synchronizer
/// validates against.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionBlockHeader {
    /// Lowercase 0x-prefixed hex hash.
    pub hash: String,
    pub number: u64,
    /// Unix seconds.
    pub timestamp: u64,
}

/// Consensus header of the block currently being processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderInfo {
    pub height: i64,
    /// Unix seconds of the CometBFT-style header time.
    pub time: u64,
}

impl HeaderInfo {
    pub fn new(height: i64, time: u64) -> Self {
        Self { height, time }
    }
}

/// Resolves the canonical finalized execution block hash for a
/// consensus header time. Called only by the proposer of a sync height.
#[async_trait]
pub trait FinalizedHashSource: Send + Sync {
    /// The execution block hash embedded in the finalized Beacon block
    /// for `consensus_time`, or the `"invalid"` sentinel when the
    /// Beacon endpoint reports the slot as not finalized.
    async fn finalized_block_hash(&self, consensus_time: u64) -> Result<String, SourceError>;

    /// Oldest acceptable execution block timestamp for `consensus_time`.
    fn min_block_timestamp(&self, consensus_time: u64) -> u64;
}

/// Reads the middleware contract's validator set and execution headers
/// at a pinned block hash.
#[async_trait]
pub trait StakeSource: Send + Sync {
    /// The contract's validator set, both calls pinned to `block_hash`.
    /// An execution layer that re-orged past the hash yields an empty
    /// set rather than an error.
    async fn validator_set_at(&self, block_hash: &str) -> Result<Vec<StakeEntry>, SourceError>;

    /// Header of the execution block with the given hash.
    async fn block_by_hash(&self, block_hash: &str) -> Result<ExecutionBlockHeader, SourceError>;
}
