use serde::{Deserialize, Serialize};

use crate::{address::OperatorAddress, params::Params, validator::Validator};

/// Initial state of the staking module.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenesisState {
    #[serde(default)]
    pub params: Option<Params>,
    pub validators: Vec<Validator>,
    /// Powers of the bonded set at export time, replayed at import so
    /// the first end-block diffs against the right baseline.
    pub last_validator_powers: Vec<LastValidatorPower>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastValidatorPower {
    pub address: OperatorAddress,
    pub power: i64,
}
