//! Validator state machine: bonded/unbonding/unbonded transitions, the
//! per-block diff against the previous bonded set, and the unbonding
//! queue.
//!
//! Everything here reads and writes replicated state only, so given
//! identical pre-state every honest node computes identical updates.

use symbiotic_types::{
    address::{ConsAddress, OperatorAddress},
    error::StakingError,
    keys,
    sync::HeaderInfo,
    validator::{BondStatus, Validator, ValidatorUpdate},
};
use tracing::info;

use crate::{
    store::{decode_value, encode_value, StateStore},
    Keeper,
};

impl<S: StateStore> Keeper<S> {
    /// Applies and returns the accumulated updates to the bonded
    /// validator set:
    ///
    /// * updates the active set keyed by the last-validator-power table,
    /// * updates the last total power,
    /// * transitions validator statuses according to the new powers.
    ///
    /// Only validators with changed power, or validators leaving the
    /// set entirely, produce an update for the consensus engine.
    pub fn apply_and_return_validator_set_updates(
        &self,
        header: &HeaderInfo,
    ) -> Result<Vec<ValidatorUpdate>, StakingError> {
        let params = self.params()?;
        let max_validators = params.max_validators as usize;
        let power_reduction = self.power_reduction();
        let mut total_power: i64 = 0;

        // The persistent last set is updated as we walk the new one.
        let mut last = self.get_last_validators_by_addr()?;

        let mut updates = Vec::new();
        let mut count = 0;

        for (_, op_addr) in self.validators_power_store_iterator()? {
            if count >= max_validators {
                break;
            }

            // everything iterated here is becoming or already a part of
            // the bonded set
            let validator = self.get_validator(&op_addr)?;

            if validator.jailed {
                return Err(StakingError::InvalidRequest(
                    "should never retrieve a jailed validator from the power store".to_owned(),
                ));
            }

            // zero-power validators are not bonded, and the index is
            // sorted, so there are no more candidates past this one
            if validator.potential_consensus_power(power_reduction) == 0 {
                break;
            }

            let validator = match validator.status {
                BondStatus::Unbonded => self.unbonded_to_bonded(validator)?,
                BondStatus::Unbonding => self.unbonding_to_bonded(validator)?,
                BondStatus::Bonded => validator,
            };

            let old_power = last.get(op_addr.as_bytes()).copied();
            let new_power = validator.consensus_power(power_reduction);

            if old_power != Some(new_power) {
                updates.push(validator.module_validator_update(power_reduction));
                self.set_last_validator_power(&op_addr, new_power)?;
            }

            last.remove(op_addr.as_bytes());
            count += 1;
            total_power += new_power;
        }

        // whoever is left in `last` fell out of the top set; the
        // BTreeMap iterates keys in ascending byte order, which is the
        // deterministic order the updates must be emitted in
        for (addr_bytes, _) in last {
            let op_addr = OperatorAddress::new(addr_bytes);
            let validator = self.get_validator(&op_addr)?;
            let validator = self.bonded_to_unbonding(validator, header)?;
            self.delete_last_validator_power(&op_addr)?;
            updates.push(validator.module_validator_update_zero());
        }

        if !updates.is_empty() {
            self.set_last_total_power(total_power)?;
        }

        Ok(updates)
    }

    // Validator state transitions

    fn bonded_to_unbonding(
        &self,
        validator: Validator,
        header: &HeaderInfo,
    ) -> Result<Validator, StakingError> {
        if !validator.is_bonded() {
            return Err(StakingError::BadStateTransition {
                from: validator.status,
                to: BondStatus::Unbonding,
                validator: validator.operator_address.to_string(),
            });
        }
        self.begin_unbonding_validator(validator, header)
    }

    fn unbonding_to_bonded(&self, validator: Validator) -> Result<Validator, StakingError> {
        if !validator.is_unbonding() {
            return Err(StakingError::BadStateTransition {
                from: validator.status,
                to: BondStatus::Bonded,
                validator: validator.operator_address.to_string(),
            });
        }
        self.bond_validator(validator)
    }

    fn unbonded_to_bonded(&self, validator: Validator) -> Result<Validator, StakingError> {
        if !validator.is_unbonded() {
            return Err(StakingError::BadStateTransition {
                from: validator.status,
                to: BondStatus::Bonded,
                validator: validator.operator_address.to_string(),
            });
        }
        self.bond_validator(validator)
    }

    /// Switches a validator from unbonding to unbonded.
    pub fn unbonding_to_unbonded(&self, validator: Validator) -> Result<Validator, StakingError> {
        if !validator.is_unbonding() {
            return Err(StakingError::BadStateTransition {
                from: validator.status,
                to: BondStatus::Unbonded,
                validator: validator.operator_address.to_string(),
            });
        }
        self.complete_unbonding_validator(validator)
    }

    /// Store operations for a validator becoming bonded.
    fn bond_validator(&self, validator: Validator) -> Result<Validator, StakingError> {
        // delete the validator by power index, as the key will change
        self.delete_validator_by_power_index(&validator)?;

        let validator = validator.update_status(BondStatus::Bonded);

        self.set_validator(&validator)?;
        self.set_validator_by_power_index(&validator)?;

        // delete from the unbonding queue if present
        self.delete_validator_queue(&validator)?;

        self.hooks()
            .after_validator_bonded(&validator.cons_address(), &validator.operator_address)?;

        Ok(validator)
    }

    /// Store operations for a validator beginning to unbond.
    pub fn begin_unbonding_validator(
        &self,
        validator: Validator,
        header: &HeaderInfo,
    ) -> Result<Validator, StakingError> {
        let params = self.params()?;

        // delete the validator by power index, as the key will change
        self.delete_validator_by_power_index(&validator)?;

        // sanity check
        if validator.status != BondStatus::Bonded {
            return Err(StakingError::BadStateTransition {
                from: validator.status,
                to: BondStatus::Unbonding,
                validator: validator.operator_address.to_string(),
            });
        }

        let id = self.increment_unbonding_id()?;

        let mut validator = validator.update_status(BondStatus::Unbonding);
        validator.unbonding_time = header.time + params.unbonding_time.as_secs();
        validator.unbonding_height = header.height;
        validator.unbonding_ids.push(id);

        self.set_validator(&validator)?;
        self.set_validator_by_power_index(&validator)?;
        self.insert_unbonding_validator_queue(&validator)?;

        self.hooks().after_validator_begin_unbonding(
            &validator.cons_address(),
            &validator.operator_address,
        )?;

        self.set_validator_by_unbonding_id(&validator, id)?;
        self.hooks().after_unbonding_initiated(id)?;

        Ok(validator)
    }

    /// Store operations for a validator becoming unbonded.
    fn complete_unbonding_validator(
        &self,
        validator: Validator,
    ) -> Result<Validator, StakingError> {
        let mut validator = validator.update_status(BondStatus::Unbonded);
        for id in std::mem::take(&mut validator.unbonding_ids) {
            self.delete_unbonding_index(id)?;
        }
        self.set_validator(&validator)?;
        Ok(validator)
    }

    // Unbonding queue

    /// Addresses queued for unbonding completion at exactly
    /// `(completion_time, height)`.
    pub fn get_unbonding_validators(
        &self,
        completion_time: u64,
        height: u64,
    ) -> Result<Vec<Vec<u8>>, StakingError> {
        let key = keys::validator_queue_key(completion_time, height);
        match self.store().get(&key)? {
            Some(bytes) => Ok(decode_value(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn set_unbonding_validators_queue(
        &self,
        completion_time: u64,
        height: u64,
        addrs: &[Vec<u8>],
    ) -> Result<(), StakingError> {
        let key = keys::validator_queue_key(completion_time, height);
        self.store().set(&key, &encode_value(&addrs)?)?;
        Ok(())
    }

    /// Appends a validator to the queue slice for its completion point.
    pub fn insert_unbonding_validator_queue(
        &self,
        validator: &Validator,
    ) -> Result<(), StakingError> {
        let mut addrs = self
            .get_unbonding_validators(validator.unbonding_time, validator.unbonding_height as u64)?;
        addrs.push(validator.operator_address.as_bytes().to_vec());
        self.set_unbonding_validators_queue(
            validator.unbonding_time,
            validator.unbonding_height as u64,
            &addrs,
        )
    }

    /// Removes every queue occurrence of the validator at its recorded
    /// completion point.
    pub fn delete_validator_queue(&self, validator: &Validator) -> Result<(), StakingError> {
        let addrs = self
            .get_unbonding_validators(validator.unbonding_time, validator.unbonding_height as u64)?;
        let retained: Vec<Vec<u8>> = addrs
            .into_iter()
            .filter(|addr| addr.as_slice() != validator.operator_address.as_bytes())
            .collect();

        let key =
            keys::validator_queue_key(validator.unbonding_time, validator.unbonding_height as u64);
        if retained.is_empty() {
            self.store().delete(&key)?;
        } else {
            self.store().set(&key, &encode_value(&retained)?)?;
        }
        Ok(())
    }

    /// Unbonds every validator whose completion point has passed.
    /// Validators with a positive on-hold ref count stay in the queue.
    pub fn unbond_all_mature_validators(&self, header: &HeaderInfo) -> Result<(), StakingError> {
        let end_key = keys::validator_queue_key(header.time, header.height as u64);

        for (key, value) in self.store().prefix_iter(&[keys::VALIDATOR_QUEUE])? {
            if key.as_slice() > end_key.as_slice() {
                break;
            }

            let addrs: Vec<Vec<u8>> = decode_value(&value)?;
            let mut retained = Vec::new();

            for addr_bytes in addrs {
                let op_addr = OperatorAddress::new(addr_bytes.clone());
                let validator = self.get_validator(&op_addr)?;
                if !validator.is_unbonding() {
                    return Err(StakingError::InvalidRequest(
                        "unexpected validator in unbonding queue; status was not unbonding"
                            .to_owned(),
                    ));
                }

                if validator.unbonding_on_hold_ref_count == 0 {
                    let validator = self.unbonding_to_unbonded(validator)?;
                    if validator.tokens.is_zero() {
                        self.remove_validator(&validator)?;
                    }
                } else {
                    retained.push(addr_bytes);
                }
            }

            if retained.is_empty() {
                self.store().delete(&key)?;
            } else {
                self.store().set(&key, &encode_value(&retained)?)?;
            }
        }

        Ok(())
    }

    // Jailing

    /// Sends the validator with this consensus address to jail, removing
    /// it from the power index so the next end-block unbonds it.
    pub fn jail(&self, cons_addr: &ConsAddress) -> Result<(), StakingError> {
        let validator = self.get_validator_by_cons_addr(cons_addr)?;
        self.jail_validator(validator)?;
        info!(validator = %cons_addr, "validator jailed");
        Ok(())
    }

    /// Releases the validator with this consensus address from jail,
    /// restoring its power-index entry.
    pub fn unjail(&self, cons_addr: &ConsAddress) -> Result<(), StakingError> {
        let validator = self.get_validator_by_cons_addr(cons_addr)?;
        self.unjail_validator(validator)?;
        info!(validator = %cons_addr, "validator un-jailed");
        Ok(())
    }

    fn jail_validator(&self, mut validator: Validator) -> Result<(), StakingError> {
        if validator.jailed {
            return Err(StakingError::ValidatorJailed);
        }
        // remove from the power index first: the jailed flag makes
        // re-insertion a no-op
        self.delete_validator_by_power_index(&validator)?;
        validator.jailed = true;
        self.set_validator(&validator)
    }

    fn unjail_validator(&self, mut validator: Validator) -> Result<(), StakingError> {
        if !validator.jailed {
            return Err(StakingError::ValidatorNotJailed);
        }
        if validator.tokens < self.power_reduction() {
            return Err(StakingError::TokensTooLowToUnjail);
        }
        validator.jailed = false;
        self.set_validator(&validator)?;
        self.set_validator_by_power_index(&validator)
    }
}
