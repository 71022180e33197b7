//! Power-apply engine: consumes the consensus-agreed block hash and
//! rewrites validator tokens from the middleware contract's set.

use std::time::Duration;

use symbiotic_types::{
    address::ConsAddress,
    constants::SYMBIOTIC_SYNC_PERIOD,
    error::StakingError,
    keys,
    sync::{CachedBlockHash, HeaderInfo, StakeSource},
    validator::ValidatorUpdate,
};
use tracing::{debug, info, warn};

use crate::{
    store::{decode_value, encode_value, StateStore},
    Keeper,
};

/// Pause between the outer end-block retries.
const APPLY_RETRY_SLEEP: Duration = Duration::from_millis(100);
/// Outer retries around the power apply, on top of the per-call
/// endpoint rotation inside the source.
const APPLY_RETRIES: usize = 3;

impl<S: StateStore> Keeper<S> {
    /// Persists the `(hash, height)` the current block agreed on.
    /// Written from PreBlocker only, so it is part of replicated state.
    pub fn cache_block_hash(&self, block_hash: &str, height: i64) -> Result<(), StakingError> {
        let cached = CachedBlockHash::new(block_hash, height);
        self.store().set(&keys::cached_block_hash_key(), &encode_value(&cached)?)?;
        Ok(())
    }

    pub fn cached_block_hash(&self) -> Result<Option<CachedBlockHash>, StakingError> {
        match self.store().get(&keys::cached_block_hash_key())? {
            Some(bytes) => Ok(Some(decode_value(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn has_cached_block_hash(&self) -> Result<bool, StakingError> {
        Ok(self.store().get(&keys::cached_block_hash_key())?.is_some())
    }

    /// Overwrites validator tokens from the contract's set at the
    /// cached hash. No-op outside sync heights and on the sentinel.
    ///
    /// Entries whose consensus address the chain has never seen are
    /// skipped; they become active once the owner submits a
    /// `CreateValidator`.
    pub async fn symbiotic_update_validators_power(
        &self,
        source: &dyn StakeSource,
        header: &HeaderInfo,
    ) -> Result<(), StakingError> {
        if header.height % SYMBIOTIC_SYNC_PERIOD != 0 {
            return Ok(());
        }

        let cached = self.cached_block_hash()?;
        let cached = match cached {
            Some(c) if c.height == header.height => c,
            other => {
                return Err(StakingError::MissingHashCache {
                    cached: other.map(|c| c.height),
                    expected: header.height,
                })
            }
        };

        if cached.is_invalid() {
            info!(height = header.height, "sync cycle skipped: cached hash is the sentinel");
            return Ok(());
        }

        let entries = source.validator_set_at(&cached.block_hash).await?;

        for entry in &entries {
            let cons_addr = ConsAddress::from_word(&entry.cons_addr);
            let validator = match self.get_validator_by_cons_addr(&cons_addr) {
                Ok(validator) => validator,
                Err(StakingError::NoValidatorFound) => continue,
                Err(err) => return Err(err),
            };

            debug!(
                operator = %validator.operator_address,
                stake = %entry.stake,
                "applying externally sourced stake"
            );
            self.set_validator_tokens(validator, entry.stake)?;
        }

        Ok(())
    }

    /// Calculates the validator updates for the current block. Called
    /// once per end-block: applies the externally sourced powers on
    /// sync heights, diffs the bonded set, then drains the mature
    /// unbonding queue.
    ///
    /// The power apply must come before the queue drain, so a validator
    /// with an instant unbonding period still walks Bonded → Unbonding
    /// → Unbonded within one block.
    pub async fn block_validator_updates(
        &self,
        source: &dyn StakeSource,
        header: &HeaderInfo,
    ) -> Result<Vec<ValidatorUpdate>, StakingError> {
        let mut last_err = None;
        for attempt in 0..APPLY_RETRIES {
            match self.symbiotic_update_validators_power(source, header).await {
                Ok(()) => {
                    last_err = None;
                    break;
                }
                Err(err) => {
                    warn!(attempt, error = %err, "symbiotic power apply failed");
                    last_err = Some(err);
                    tokio::time::sleep(APPLY_RETRY_SLEEP).await;
                }
            }
        }
        if let Some(err) = last_err {
            return Err(err);
        }

        let updates = self.apply_and_return_validator_set_updates(header)?;

        self.unbond_all_mature_validators(header)?;

        Ok(updates)
    }
}
