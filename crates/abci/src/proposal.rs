//! Proposal-side hooks: hash injection, verification and caching.

use std::sync::Arc;

use symbiotic_staking::{store::StateStore, Keeper};
use symbiotic_types::{
    constants::{INVALID_BLOCKHASH, SYMBIOTIC_SYNC_PERIOD},
    error::StakingError,
    historical::HistoricalRecord,
    sync::{FinalizedHashSource, HeaderInfo, StakeSource},
    validator::ValidatorUpdate,
};
use tracing::{error, info, warn};

use crate::{
    tx::{classify_first_tx, encode_block_hash_tx, BlockTx},
    types::{
        FinalizeBlockRequest, PrepareProposalRequest, PrepareProposalResponse,
        ProcessProposalResponse, ProcessProposalStatus,
    },
};

/// Drives the synchronizer from the host engine's hooks.
///
/// One handler per node. `prev_block_time` lives in memory and resets
/// on restart, at which point the monotonicity check degrades to
/// `0 <= block_time` until the first accepted sync cycle.
pub struct ProposalHandler<S: StateStore> {
    keeper: Arc<Keeper<S>>,
    beacon: Arc<dyn FinalizedHashSource>,
    stake: Arc<dyn StakeSource>,
    prev_block_time: u64,
}

impl<S: StateStore> ProposalHandler<S> {
    pub fn new(
        keeper: Arc<Keeper<S>>,
        beacon: Arc<dyn FinalizedHashSource>,
        stake: Arc<dyn StakeSource>,
    ) -> Self {
        Self { keeper, beacon, stake, prev_block_time: 0 }
    }

    pub fn keeper(&self) -> &Keeper<S> {
        &self.keeper
    }

    /// Proposer-only hook. On sync heights resolves the finalized hash
    /// and prepends it as a pseudo-tx; a resolver failure injects the
    /// sentinel instead of failing the proposal.
    pub async fn prepare_proposal(&self, req: PrepareProposalRequest) -> PrepareProposalResponse {
        let mut proposal_txs = req.txs;

        if req.height % SYMBIOTIC_SYNC_PERIOD != 0 {
            return PrepareProposalResponse { txs: proposal_txs };
        }

        let block_hash = match self.beacon.finalized_block_hash(req.time).await {
            Ok(hash) => hash,
            Err(err) => {
                error!(height = req.height, error = %err, "finalized hash resolution failed, injecting sentinel");
                INVALID_BLOCKHASH.to_owned()
            }
        };

        info!(height = req.height, %block_hash, "injecting finalized block hash");
        proposal_txs.insert(0, encode_block_hash_tx(&block_hash));

        PrepareProposalResponse { txs: proposal_txs }
    }

    /// Not customized: any proposal is accepted. Hash validation
    /// happens in the replicated `PreBlocker` so every node reaches the
    /// same verdict.
    pub fn process_proposal(&self) -> ProcessProposalResponse {
        ProcessProposalResponse { status: ProcessProposalStatus::Accept }
    }

    /// First replicated hook of every finalized block. On sync heights
    /// decodes the injected hash, validates it against the execution
    /// layer, and writes the cache entry every node must agree on.
    ///
    /// A permanent EL failure here is fatal: the error propagates so
    /// the host halts rather than letting nodes diverge.
    pub async fn pre_blocker(&mut self, req: &FinalizeBlockRequest) -> Result<(), StakingError> {
        self.keeper.track_historical_info(
            req.height as u64,
            HistoricalRecord {
                apphash: req.app_hash.clone(),
                time: req.time,
                validators_hash: req.next_validators_hash.clone(),
            },
        )?;

        let block_hash = match classify_first_tx(req.height, &req.txs) {
            Some(BlockTx::BlockHash(hash)) => hash,
            // off-schedule block, or a sync height with no txs at all
            Some(BlockTx::Regular(_)) | None => return Ok(()),
        };

        if block_hash == INVALID_BLOCKHASH {
            self.keeper.cache_block_hash(INVALID_BLOCKHASH, req.height)?;
            return Ok(());
        }

        let block = self.stake.block_by_hash(&block_hash).await?;

        if let Err(reason) = self.validate_block_time(block.timestamp, req.time) {
            warn!(
                height = req.height,
                %block_hash,
                block_time = block.timestamp,
                reason,
                "proposed block failed validation, skipping cycle"
            );
            self.keeper.cache_block_hash(INVALID_BLOCKHASH, req.height)?;
            return Ok(());
        }

        self.keeper.cache_block_hash(&block_hash, req.height)?;
        self.prev_block_time = block.timestamp;

        Ok(())
    }

    /// End-block driver: consumes the cached hash and returns the
    /// validator updates for the consensus engine.
    pub async fn end_block(&self, header: &HeaderInfo) -> Result<Vec<ValidatorUpdate>, StakingError> {
        self.keeper.block_validator_updates(self.stake.as_ref(), header).await
    }

    fn validate_block_time(
        &self,
        block_time: u64,
        consensus_time: u64,
    ) -> Result<(), &'static str> {
        // monotonic across sync cycles
        if block_time < self.prev_block_time {
            return Err("block time regressed below the previous sync cycle");
        }
        // strictly in the past
        if block_time >= consensus_time {
            return Err("block time is not in the past of the consensus header");
        }
        // not too old
        if block_time < self.beacon.min_block_timestamp(consensus_time) {
            return Err("block time is older than the finalized window");
        }
        Ok(())
    }
}
