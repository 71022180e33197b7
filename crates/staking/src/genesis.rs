//! Genesis import/export for the staking state.

use symbiotic_types::{
    error::StakingError,
    genesis::{GenesisState, LastValidatorPower},
    keys,
};

use crate::{store::StateStore, Keeper};

impl<S: StateStore> Keeper<S> {
    /// Seeds the store from a genesis state: params, validator records
    /// with all indexes, and the previous bonded set so the first
    /// end-block diffs against the right baseline.
    pub fn init_genesis(&self, genesis: &GenesisState) -> Result<(), StakingError> {
        if let Some(params) = &genesis.params {
            self.set_params(params)?;
        }

        for validator in &genesis.validators {
            self.set_validator(validator)?;
            self.set_validator_by_cons_addr(validator)?;
            self.set_validator_by_power_index(validator)?;

            if validator.is_unbonding() {
                self.insert_unbonding_validator_queue(validator)?;
            }
        }

        let mut total_power = 0i64;
        for last in &genesis.last_validator_powers {
            self.set_last_validator_power(&last.address, last.power)?;
            total_power += last.power;
        }
        if !genesis.last_validator_powers.is_empty() {
            self.set_last_total_power(total_power)?;
        }

        Ok(())
    }

    pub fn export_genesis(&self) -> Result<GenesisState, StakingError> {
        let mut last_validator_powers = Vec::new();
        for (key, _) in self.store().prefix_iter(&[keys::LAST_VALIDATOR_POWER])? {
            let address = keys::address_from_last_power_key(&key);
            let power = self.get_last_validator_power(&address)?.ok_or_else(|| {
                StakingError::Store(format!("last power entry vanished for {address}"))
            })?;
            last_validator_powers.push(LastValidatorPower { address, power });
        }

        Ok(GenesisState {
            params: Some(self.params()?),
            validators: self.get_all_validators()?,
            last_validator_powers,
        })
    }
}
