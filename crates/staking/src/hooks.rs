//! Hook sink for modules observing validator lifecycle changes.

use symbiotic_types::{
    address::{ConsAddress, OperatorAddress},
    error::StakingError,
};

/// Callbacks fired by the keeper on validator lifecycle transitions.
/// All methods default to no-ops so implementors override only what
/// they observe.
pub trait StakingHooks: Send + Sync {
    fn after_validator_created(&self, _operator: &OperatorAddress) -> Result<(), StakingError> {
        Ok(())
    }

    fn before_validator_modified(&self, _operator: &OperatorAddress) -> Result<(), StakingError> {
        Ok(())
    }

    fn after_validator_bonded(
        &self,
        _cons_addr: &ConsAddress,
        _operator: &OperatorAddress,
    ) -> Result<(), StakingError> {
        Ok(())
    }

    fn after_validator_begin_unbonding(
        &self,
        _cons_addr: &ConsAddress,
        _operator: &OperatorAddress,
    ) -> Result<(), StakingError> {
        Ok(())
    }

    fn after_validator_removed(
        &self,
        _cons_addr: &ConsAddress,
        _operator: &OperatorAddress,
    ) -> Result<(), StakingError> {
        Ok(())
    }

    fn after_unbonding_initiated(&self, _id: u64) -> Result<(), StakingError> {
        Ok(())
    }
}

/// Fans every callback out to an ordered list of sinks. The empty list
/// doubles as the no-op implementation.
#[derive(Default)]
pub struct MultiHooks(Vec<Box<dyn StakingHooks>>);

impl MultiHooks {
    pub fn new(hooks: Vec<Box<dyn StakingHooks>>) -> Self {
        Self(hooks)
    }
}

impl StakingHooks for MultiHooks {
    fn after_validator_created(&self, operator: &OperatorAddress) -> Result<(), StakingError> {
        self.0.iter().try_for_each(|h| h.after_validator_created(operator))
    }

    fn before_validator_modified(&self, operator: &OperatorAddress) -> Result<(), StakingError> {
        self.0.iter().try_for_each(|h| h.before_validator_modified(operator))
    }

    fn after_validator_bonded(
        &self,
        cons_addr: &ConsAddress,
        operator: &OperatorAddress,
    ) -> Result<(), StakingError> {
        self.0.iter().try_for_each(|h| h.after_validator_bonded(cons_addr, operator))
    }

    fn after_validator_begin_unbonding(
        &self,
        cons_addr: &ConsAddress,
        operator: &OperatorAddress,
    ) -> Result<(), StakingError> {
        self.0.iter().try_for_each(|h| h.after_validator_begin_unbonding(cons_addr, operator))
    }

    fn after_validator_removed(
        &self,
        cons_addr: &ConsAddress,
        operator: &OperatorAddress,
    ) -> Result<(), StakingError> {
        self.0.iter().try_for_each(|h| h.after_validator_removed(cons_addr, operator))
    }

    fn after_unbonding_initiated(&self, id: u64) -> Result<(), StakingError> {
        self.0.iter().try_for_each(|h| h.after_unbonding_initiated(id))
    }
}
