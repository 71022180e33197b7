//! Read queries against the state store.

use symbiotic_types::{
    address::{ConsAddress, OperatorAddress},
    error::StakingError,
    historical::HistoricalRecord,
    params::Params,
    validator::{BondStatus, Validator},
};

use crate::{store::StateStore, Keeper};

impl<S: StateStore> Keeper<S> {
    /// All registered validators, optionally filtered by status, in
    /// operator-address order.
    pub fn query_validators(
        &self,
        status: Option<BondStatus>,
    ) -> Result<Vec<Validator>, StakingError> {
        let validators = self.get_all_validators()?;
        Ok(match status {
            Some(status) => validators.into_iter().filter(|v| v.status == status).collect(),
            None => validators,
        })
    }

    pub fn query_validator(&self, addr: &OperatorAddress) -> Result<Validator, StakingError> {
        self.get_validator(addr)
    }

    pub fn query_validator_by_cons_addr(
        &self,
        cons_addr: &ConsAddress,
    ) -> Result<Validator, StakingError> {
        self.get_validator_by_cons_addr(cons_addr)
    }

    pub fn query_historical_info(
        &self,
        height: u64,
    ) -> Result<Option<HistoricalRecord>, StakingError> {
        self.get_historical_info(height)
    }

    pub fn query_params(&self) -> Result<Params, StakingError> {
        self.params()
    }
}
