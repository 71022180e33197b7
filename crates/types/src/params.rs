use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::StakingError;

/// Module parameters, mutable only through the authority-gated
/// `UpdateParams` message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Params {
    /// Time a validator spends in `Unbonding` before completing.
    pub unbonding_time: Duration,
    /// Maximum size of the bonded validator set.
    pub max_validators: u32,
    /// Maximum concurrent unbonding entries per pair.
    pub max_entries: u32,
    /// Number of historical records kept for IBC-style lookups.
    pub historical_entries: u32,
    /// Denomination of the bondable token.
    pub bond_denom: String,
    /// Floor for validator commission rates.
    pub min_commission_rate: Decimal,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            unbonding_time: Duration::from_secs(21 * 24 * 60 * 60),
            max_validators: 100,
            max_entries: 7,
            historical_entries: 10_000,
            bond_denom: "stake".to_owned(),
            min_commission_rate: Decimal::ZERO,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), StakingError> {
        if self.max_validators == 0 {
            return Err(StakingError::InvalidParams("max validators must be positive"));
        }
        if self.max_entries == 0 {
            return Err(StakingError::InvalidParams("max entries must be positive"));
        }
        if self.bond_denom.is_empty() {
            return Err(StakingError::InvalidParams("bond denom cannot be blank"));
        }
        if self.min_commission_rate.is_sign_negative() || self.min_commission_rate > Decimal::ONE {
            return Err(StakingError::InvalidParams(
                "min commission rate must be between 0 and 1",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        Params::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_max_validators() {
        let params = Params { max_validators: 0, ..Params::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn rejects_blank_bond_denom() {
        let params = Params { bond_denom: String::new(), ..Params::default() };
        assert!(params.validate().is_err());
    }
}
