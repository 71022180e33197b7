//! Unbonding-operation bookkeeping: id sequence, lookup indexes and
//! the on-hold reference counts external modules use to pause
//! completion.

use serde::{Deserialize, Serialize};
use symbiotic_types::{error::StakingError, keys, validator::Validator};

use crate::{
    store::{decode_value, encode_value, StateStore},
    Keeper,
};

/// Kind of an unbonding operation. Validator unbonding is the only kind
/// this module produces; the discriminant is persisted so future kinds
/// deserialize unambiguously.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnbondingType {
    Undefined = 0,
    ValidatorUnbonding = 1,
}

impl<S: StateStore> Keeper<S> {
    /// Increments and returns a unique id for an unbonding operation.
    pub fn increment_unbonding_id(&self) -> Result<u64, StakingError> {
        let current: u64 = match self.store().get(&keys::unbonding_id_key())? {
            Some(bytes) => decode_value(&bytes)?,
            None => 0,
        };
        let id = current + 1;
        self.store().set(&keys::unbonding_id_key(), &encode_value(&id)?)?;
        Ok(id)
    }

    pub fn delete_unbonding_index(&self, id: u64) -> Result<(), StakingError> {
        self.store().delete(&keys::unbonding_index_key(id))?;
        self.store().delete(&keys::unbonding_type_key(id))?;
        Ok(())
    }

    pub fn get_unbonding_type(&self, id: u64) -> Result<UnbondingType, StakingError> {
        match self.store().get(&keys::unbonding_type_key(id))? {
            Some(bytes) => Ok(decode_value(&bytes)?),
            None => Err(StakingError::NoUnbondingType),
        }
    }

    pub fn set_unbonding_type(
        &self,
        id: u64,
        unbonding_type: UnbondingType,
    ) -> Result<(), StakingError> {
        self.store().set(&keys::unbonding_type_key(id), &encode_value(&unbonding_type)?)?;
        Ok(())
    }

    /// The validator currently unbonding under operation `id`.
    pub fn get_validator_by_unbonding_id(&self, id: u64) -> Result<Validator, StakingError> {
        let val_key = self
            .store()
            .get(&keys::unbonding_index_key(id))?
            .ok_or(StakingError::NoValidatorFound)?;

        let bytes = self.store().get(&val_key)?.ok_or(StakingError::NoValidatorFound)?;
        Ok(decode_value(&bytes)?)
    }

    /// Indexes a validator under the unbonding id of its current
    /// unbonding. Does not persist the validator itself.
    pub fn set_validator_by_unbonding_id(
        &self,
        validator: &Validator,
        id: u64,
    ) -> Result<(), StakingError> {
        let val_key = keys::validator_key(&validator.operator_address);
        self.store().set(&keys::unbonding_index_key(id), &val_key)?;
        self.set_unbonding_type(id, UnbondingType::ValidatorUnbonding)
    }

    /// Stops the unbonding operation `id` from completing at maturity.
    /// Every call must be matched by [`Self::unbonding_can_complete`].
    pub fn put_unbonding_on_hold(&self, id: u64) -> Result<(), StakingError> {
        match self.get_unbonding_type(id)? {
            UnbondingType::ValidatorUnbonding => {
                let mut val = self.get_validator_by_unbonding_id(id)?;
                val.unbonding_on_hold_ref_count += 1;
                self.set_validator(&val)
            }
            UnbondingType::Undefined => Err(StakingError::UnbondingNotFound),
        }
    }

    /// Releases one hold on the unbonding operation `id`. The operation
    /// completes through the mature-queue drain once no holds remain.
    pub fn unbonding_can_complete(&self, id: u64) -> Result<(), StakingError> {
        match self.get_unbonding_type(id)? {
            UnbondingType::ValidatorUnbonding => {
                let mut val = self.get_validator_by_unbonding_id(id)?;
                if val.unbonding_on_hold_ref_count <= 0 {
                    return Err(StakingError::UnbondingOnHoldRefCountNegative(
                        val.operator_address.to_string(),
                    ));
                }
                val.unbonding_on_hold_ref_count -= 1;
                self.set_validator(&val)
            }
            UnbondingType::Undefined => Err(StakingError::UnbondingNotFound),
        }
    }
}
