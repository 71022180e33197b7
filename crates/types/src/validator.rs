use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    address::{ConsAddress, OperatorAddress},
    aliases::U256,
    error::StakingError,
    pubkey::ConsensusPubKey,
};

/// Clients set a description field to this sentinel to leave it
/// untouched when editing a validator.
pub const DO_NOT_MODIFY_DESC: &str = "[do-not-modify]";

pub const MAX_MONIKER_LENGTH: usize = 70;
pub const MAX_IDENTITY_LENGTH: usize = 3000;
pub const MAX_WEBSITE_LENGTH: usize = 140;
pub const MAX_SECURITY_CONTACT_LENGTH: usize = 140;
pub const MAX_DETAILS_LENGTH: usize = 280;

/// Bond status of a validator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondStatus {
    Unbonded,
    Unbonding,
    Bonded,
}

impl BondStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unbonded => "BOND_STATUS_UNBONDED",
            Self::Unbonding => "BOND_STATUS_UNBONDING",
            Self::Bonded => "BOND_STATUS_BONDED",
        }
    }
}

/// Converts a token balance into units of consensus power, truncating.
pub fn tokens_to_consensus_power(tokens: U256, power_reduction: U256) -> i64 {
    let power = tokens / power_reduction;
    if power > U256::from(i64::MAX as u64) {
        i64::MAX
    } else {
        power.to::<u64>() as i64
    }
}

/// Human-readable metadata attached to a validator.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub moniker: String,
    pub identity: String,
    pub website: String,
    pub security_contact: String,
    pub details: String,
}

impl Description {
    pub fn new(
        moniker: impl Into<String>,
        identity: impl Into<String>,
        website: impl Into<String>,
        security_contact: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            moniker: moniker.into(),
            identity: identity.into(),
            website: website.into(),
            security_contact: security_contact.into(),
            details: details.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn ensure_length(&self) -> Result<(), StakingError> {
        let checks: [(&'static str, &str, usize); 5] = [
            ("moniker", &self.moniker, MAX_MONIKER_LENGTH),
            ("identity", &self.identity, MAX_IDENTITY_LENGTH),
            ("website", &self.website, MAX_WEBSITE_LENGTH),
            ("security_contact", &self.security_contact, MAX_SECURITY_CONTACT_LENGTH),
            ("details", &self.details, MAX_DETAILS_LENGTH),
        ];
        for (field, value, max) in checks {
            if value.len() > max {
                return Err(StakingError::DescriptionFieldTooLong { field, got: value.len(), max });
            }
        }
        Ok(())
    }

    /// Merges an edit into the existing description. Fields set to
    /// [`DO_NOT_MODIFY_DESC`] keep their current value; anything else,
    /// including the empty string, replaces it.
    pub fn update(&self, edit: Description) -> Result<Description, StakingError> {
        let pick = |current: &str, new: String| {
            if new == DO_NOT_MODIFY_DESC {
                current.to_owned()
            } else {
                new
            }
        };
        let updated = Description {
            moniker: pick(&self.moniker, edit.moniker),
            identity: pick(&self.identity, edit.identity),
            website: pick(&self.website, edit.website),
            security_contact: pick(&self.security_contact, edit.security_contact),
            details: pick(&self.details, edit.details),
        };
        updated.ensure_length()?;
        Ok(updated)
    }
}

/// Commission rate bounds declared at validator creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionRates {
    pub rate: Decimal,
    pub max_rate: Decimal,
    pub max_change_rate: Decimal,
}

impl CommissionRates {
    pub fn new(rate: Decimal, max_rate: Decimal, max_change_rate: Decimal) -> Self {
        Self { rate, max_rate, max_change_rate }
    }

    pub fn validate(&self) -> Result<(), StakingError> {
        if self.max_rate.is_sign_negative() || self.max_rate > Decimal::ONE {
            return Err(StakingError::InvalidCommissionRates("max rate must be between 0 and 1"));
        }
        if self.rate.is_sign_negative() || self.rate > self.max_rate {
            return Err(StakingError::InvalidCommissionRates("rate must be between 0 and max rate"));
        }
        if self.max_change_rate.is_sign_negative() || self.max_change_rate > self.max_rate {
            return Err(StakingError::InvalidCommissionRates(
                "max change rate must be between 0 and max rate",
            ));
        }
        Ok(())
    }
}

/// Commission and the last time it changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub commission_rates: CommissionRates,
    /// Unix seconds of the last rate change.
    pub update_time: u64,
}

impl Commission {
    pub const UPDATE_COOLDOWN_SECS: u64 = 24 * 60 * 60;

    pub fn new(rates: CommissionRates, update_time: u64) -> Self {
        Self { commission_rates: rates, update_time }
    }

    /// Checks a proposed new rate against the declared bounds and the
    /// 24h change cooldown.
    pub fn validate_new_rate(&self, new_rate: Decimal, now: u64) -> Result<(), StakingError> {
        if now < self.update_time + Self::UPDATE_COOLDOWN_SECS {
            return Err(StakingError::CommissionUpdateTime);
        }
        if new_rate.is_sign_negative() || new_rate > Decimal::ONE {
            return Err(StakingError::CommissionOutOfRange);
        }
        if new_rate > self.commission_rates.max_rate {
            return Err(StakingError::CommissionGTMaxRate);
        }
        let delta = (new_rate - self.commission_rates.rate).abs();
        if delta > self.commission_rates.max_change_rate {
            return Err(StakingError::CommissionGTMaxChangeRate);
        }
        Ok(())
    }
}

/// A registered validator.
///
/// Tokens are assigned only by the power-apply engine; there is no
/// user-side delegation. A validator is removable only once it is
/// unbonded with zero tokens.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Validator {
    pub operator_address: OperatorAddress,
    pub consensus_pubkey: ConsensusPubKey,
    pub jailed: bool,
    pub status: BondStatus,
    pub tokens: U256,
    pub description: Description,
    pub commission: Commission,
    /// Height at which the validator began unbonding.
    pub unbonding_height: i64,
    /// Unix seconds at which the current unbonding completes.
    pub unbonding_time: u64,
    /// Ids of in-flight unbonding operations for this validator.
    pub unbonding_ids: Vec<u64>,
    /// While positive, maturity does not complete the unbonding.
    pub unbonding_on_hold_ref_count: i64,
}

impl Validator {
    pub fn new(
        operator_address: OperatorAddress,
        consensus_pubkey: ConsensusPubKey,
        description: Description,
    ) -> Result<Self, StakingError> {
        description.ensure_length()?;
        Ok(Self {
            operator_address,
            consensus_pubkey,
            jailed: false,
            status: BondStatus::Unbonded,
            tokens: U256::ZERO,
            description,
            commission: Commission::new(
                CommissionRates::new(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
                0,
            ),
            unbonding_height: 0,
            unbonding_time: 0,
            unbonding_ids: Vec::new(),
            unbonding_on_hold_ref_count: 0,
        })
    }

    pub fn set_initial_commission(mut self, commission: Commission) -> Result<Self, StakingError> {
        commission.commission_rates.validate()?;
        self.commission = commission;
        Ok(self)
    }

    pub fn is_bonded(&self) -> bool {
        self.status == BondStatus::Bonded
    }

    pub fn is_unbonding(&self) -> bool {
        self.status == BondStatus::Unbonding
    }

    pub fn is_unbonded(&self) -> bool {
        self.status == BondStatus::Unbonded
    }

    pub fn cons_address(&self) -> ConsAddress {
        self.consensus_pubkey.cons_address()
    }

    pub fn update_status(mut self, status: BondStatus) -> Self {
        self.status = status;
        self
    }

    /// Consensus power regardless of bond status.
    pub fn potential_consensus_power(&self, power_reduction: U256) -> i64 {
        tokens_to_consensus_power(self.tokens, power_reduction)
    }

    /// Consensus power as reported to the consensus engine: zero unless
    /// bonded.
    pub fn consensus_power(&self, power_reduction: U256) -> i64 {
        if self.is_bonded() {
            self.potential_consensus_power(power_reduction)
        } else {
            0
        }
    }

    /// Update handed to the consensus engine when this validator's
    /// power changed.
    pub fn module_validator_update(&self, power_reduction: U256) -> ValidatorUpdate {
        ValidatorUpdate {
            pub_key: self.consensus_pubkey.clone(),
            power: self.consensus_power(power_reduction),
        }
    }

    /// Zero-power update: removal from the consensus validator set.
    pub fn module_validator_update_zero(&self) -> ValidatorUpdate {
        ValidatorUpdate { pub_key: self.consensus_pubkey.clone(), power: 0 }
    }
}

/// Power change reported to the consensus engine at the end of a block.
/// Zero power removes the validator from the active set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidatorUpdate {
    pub pub_key: ConsensusPubKey,
    pub power: i64,
}
