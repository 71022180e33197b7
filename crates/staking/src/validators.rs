//! Validator records and the indexes derived from them.
//!
//! Three views must stay consistent at all times: the record itself
//! (keyed by operator address), the consensus-address index, and the
//! power index. Every mutation that can change a validator's power goes
//! through delete-index / mutate / re-insert so the power-index key
//! always matches the stored tokens.

use symbiotic_types::{
    address::{ConsAddress, OperatorAddress},
    aliases::U256,
    error::StakingError,
    keys,
    validator::{BondStatus, Validator},
};
use tracing::info;

use crate::{
    store::{decode_value, encode_value, StateStore},
    Keeper,
};

impl<S: StateStore> Keeper<S> {
    pub fn get_validator(&self, addr: &OperatorAddress) -> Result<Validator, StakingError> {
        match self.store().get(&keys::validator_key(addr))? {
            Some(bytes) => Ok(decode_value(&bytes)?),
            None => Err(StakingError::NoValidatorFound),
        }
    }

    pub fn has_validator(&self, addr: &OperatorAddress) -> Result<bool, StakingError> {
        Ok(self.store().get(&keys::validator_key(addr))?.is_some())
    }

    pub fn set_validator(&self, validator: &Validator) -> Result<(), StakingError> {
        let key = keys::validator_key(&validator.operator_address);
        self.store().set(&key, &encode_value(validator)?)?;
        Ok(())
    }

    pub fn get_validator_by_cons_addr(
        &self,
        cons_addr: &ConsAddress,
    ) -> Result<Validator, StakingError> {
        let key = keys::validator_by_cons_addr_key(cons_addr);
        match self.store().get(&key)? {
            Some(op_bytes) => self.get_validator(&OperatorAddress::new(op_bytes)),
            None => Err(StakingError::NoValidatorFound),
        }
    }

    pub fn set_validator_by_cons_addr(&self, validator: &Validator) -> Result<(), StakingError> {
        let key = keys::validator_by_cons_addr_key(&validator.cons_address());
        self.store().set(&key, validator.operator_address.as_bytes())?;
        Ok(())
    }

    /// Removes a fully unbonded, token-less validator and all of its
    /// index entries.
    pub fn remove_validator(&self, validator: &Validator) -> Result<(), StakingError> {
        if validator.status != BondStatus::Unbonded || !validator.tokens.is_zero() {
            return Err(StakingError::ValidatorNotRemovable);
        }

        self.store().delete(&keys::validator_key(&validator.operator_address))?;
        self.store().delete(&keys::validator_by_cons_addr_key(&validator.cons_address()))?;
        self.delete_validator_by_power_index(validator)?;

        self.hooks()
            .after_validator_removed(&validator.cons_address(), &validator.operator_address)?;

        info!(operator = %validator.operator_address, "validator removed");
        Ok(())
    }

    pub fn set_validator_by_power_index(&self, validator: &Validator) -> Result<(), StakingError> {
        // jailed validators are not kept in the power index
        if validator.jailed {
            return Ok(());
        }
        let key = keys::validator_power_index_key(validator, self.power_reduction());
        self.store().set(&key, validator.operator_address.as_bytes())?;
        Ok(())
    }

    pub fn delete_validator_by_power_index(
        &self,
        validator: &Validator,
    ) -> Result<(), StakingError> {
        let key = keys::validator_power_index_key(validator, self.power_reduction());
        self.store().delete(&key)?;
        Ok(())
    }

    /// Power-index entries in descending power order. Values are the
    /// operator addresses.
    pub fn validators_power_store_iterator(
        &self,
    ) -> Result<Vec<(Vec<u8>, OperatorAddress)>, StakingError> {
        let entries = self.store().prefix_iter_rev(&[keys::VALIDATORS_BY_POWER_INDEX])?;
        Ok(entries.into_iter().map(|(k, v)| (k, OperatorAddress::new(v))).collect())
    }

    pub fn get_all_validators(&self) -> Result<Vec<Validator>, StakingError> {
        let entries = self.store().prefix_iter(&[keys::VALIDATORS])?;
        entries.iter().map(|(_, v)| Ok(decode_value(v)?)).collect()
    }

    /// Full token overwrite from the externally sourced stake. Keeps
    /// the power index in lockstep with the new balance.
    pub fn set_validator_tokens(
        &self,
        mut validator: Validator,
        tokens: U256,
    ) -> Result<Validator, StakingError> {
        self.delete_validator_by_power_index(&validator)?;
        validator.tokens = tokens;
        self.set_validator(&validator)?;
        self.set_validator_by_power_index(&validator)?;
        Ok(validator)
    }

    pub fn get_last_validator_power(
        &self,
        addr: &OperatorAddress,
    ) -> Result<Option<i64>, StakingError> {
        match self.store().get(&keys::last_validator_power_key(addr))? {
            Some(bytes) => Ok(Some(decode_value(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn set_last_validator_power(
        &self,
        addr: &OperatorAddress,
        power: i64,
    ) -> Result<(), StakingError> {
        self.store().set(&keys::last_validator_power_key(addr), &encode_value(&power)?)?;
        Ok(())
    }

    pub fn delete_last_validator_power(&self, addr: &OperatorAddress) -> Result<(), StakingError> {
        self.store().delete(&keys::last_validator_power_key(addr))?;
        Ok(())
    }

    /// The previous block's bonded set, keyed by raw operator address
    /// bytes (ascending, which is the deterministic iteration order).
    pub fn get_last_validators_by_addr(
        &self,
    ) -> Result<std::collections::BTreeMap<Vec<u8>, i64>, StakingError> {
        let mut last = std::collections::BTreeMap::new();
        for (key, value) in self.store().prefix_iter(&[keys::LAST_VALIDATOR_POWER])? {
            let addr = keys::address_from_last_power_key(&key);
            last.insert(addr.into_bytes(), decode_value(&value)?);
        }
        Ok(last)
    }

    pub fn get_last_total_power(&self) -> Result<i64, StakingError> {
        match self.store().get(&keys::last_total_power_key())? {
            Some(bytes) => Ok(decode_value(&bytes)?),
            None => Ok(0),
        }
    }

    pub fn set_last_total_power(&self, power: i64) -> Result<(), StakingError> {
        self.store().set(&keys::last_total_power_key(), &encode_value(&power)?)?;
        Ok(())
    }
}
