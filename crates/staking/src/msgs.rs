//! Message handlers: the admin surface of the module.

use rust_decimal::Decimal;
use symbiotic_types::{
    address::OperatorAddress,
    error::StakingError,
    params::Params,
    pubkey::{ConsensusPubKey, ED25519_PUBKEY_SIZE},
    sync::HeaderInfo,
    validator::{Commission, CommissionRates, Description, Validator},
};
use tracing::info;

use crate::{store::StateStore, Keeper};

/// Registers a new validator. The validator starts unbonded with zero
/// tokens; stake arrives only through the external power apply.
#[derive(Clone, Debug)]
pub struct MsgCreateValidator {
    pub validator_address: OperatorAddress,
    pub pubkey: ConsensusPubKey,
    pub description: Description,
    pub commission: CommissionRates,
}

/// Edits a registered validator's description and commission rate.
#[derive(Clone, Debug)]
pub struct MsgEditValidator {
    pub validator_address: OperatorAddress,
    pub description: Description,
    pub commission_rate: Option<Decimal>,
}

/// Replaces the module parameters. Authority-gated.
#[derive(Clone, Debug)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub params: Params,
}

impl<S: StateStore> Keeper<S> {
    pub fn create_validator(
        &self,
        msg: MsgCreateValidator,
        header: &HeaderInfo,
    ) -> Result<(), StakingError> {
        if msg.description.is_empty() {
            return Err(StakingError::EmptyDescription);
        }
        msg.description.ensure_length()?;
        msg.commission.validate()?;

        if msg.commission.rate < self.min_commission_rate()? {
            return Err(StakingError::CommissionLTMinRate);
        }

        // the operator and the consensus key must both be fresh
        if self.has_validator(&msg.validator_address)? {
            return Err(StakingError::ValidatorOwnerExists);
        }

        let pk_type = msg.pubkey.type_str();
        if !self.allowed_pubkey_types().iter().any(|t| t == pk_type) {
            return Err(StakingError::ValidatorPubKeyTypeNotSupported {
                got: pk_type,
                expected: self.allowed_pubkey_types().to_vec(),
            });
        }
        if matches!(msg.pubkey, ConsensusPubKey::Ed25519(_))
            && msg.pubkey.as_bytes().len() != ED25519_PUBKEY_SIZE
        {
            return Err(StakingError::ConsensusPubKeyLenInvalid {
                got: msg.pubkey.as_bytes().len(),
                expected: ED25519_PUBKEY_SIZE,
            });
        }

        if self.get_validator_by_cons_addr(&msg.pubkey.cons_address()).is_ok() {
            return Err(StakingError::ValidatorPubKeyExists);
        }

        let validator =
            Validator::new(msg.validator_address.clone(), msg.pubkey, msg.description)?
                .set_initial_commission(Commission::new(msg.commission, header.time))?;

        self.set_validator(&validator)?;
        self.set_validator_by_cons_addr(&validator)?;
        self.set_validator_by_power_index(&validator)?;

        self.hooks().after_validator_created(&msg.validator_address)?;

        info!(operator = %msg.validator_address, "validator created");
        Ok(())
    }

    pub fn edit_validator(
        &self,
        msg: MsgEditValidator,
        header: &HeaderInfo,
    ) -> Result<(), StakingError> {
        if msg.description.is_empty() {
            return Err(StakingError::EmptyDescription);
        }

        if let Some(rate) = msg.commission_rate {
            if rate > Decimal::ONE || rate.is_sign_negative() {
                return Err(StakingError::CommissionOutOfRange);
            }
            if rate < self.min_commission_rate()? {
                return Err(StakingError::CommissionLTMinRate);
            }
        }

        // validator must already be registered
        let mut validator = self.get_validator(&msg.validator_address)?;

        // replace all editable fields (clients should autofill existing
        // values)
        validator.description = validator.description.update(msg.description)?;

        if let Some(rate) = msg.commission_rate {
            validator.commission.validate_new_rate(rate, header.time)?;

            self.hooks().before_validator_modified(&msg.validator_address)?;

            validator.commission.commission_rates.rate = rate;
            validator.commission.update_time = header.time;
        }

        self.set_validator(&validator)?;

        info!(operator = %msg.validator_address, "validator edited");
        Ok(())
    }

    pub fn update_params(
        &self,
        msg: MsgUpdateParams,
        header: &HeaderInfo,
    ) -> Result<(), StakingError> {
        if self.authority() != msg.authority {
            return Err(StakingError::InvalidSigner {
                expected: self.authority().to_owned(),
                got: msg.authority,
            });
        }
        msg.params.validate()?;

        let previous = self.params()?;
        self.set_params(&msg.params)?;

        // a raised floor sweeps every validator up to it
        if previous.min_commission_rate != msg.params.min_commission_rate {
            let min_rate = msg.params.min_commission_rate;
            for mut validator in self.get_all_validators()? {
                if validator.commission.commission_rates.rate < min_rate {
                    validator.commission.commission_rates.rate = min_rate;
                    if validator.commission.commission_rates.max_rate < min_rate {
                        validator.commission.commission_rates.max_rate = min_rate;
                    }
                    validator.commission.update_time = header.time;
                    self.set_validator(&validator)?;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;
    use crate::store::MemStore;

    fn keeper() -> Keeper<MemStore> {
        Keeper::new(MemStore::new(), "gov")
    }

    fn header() -> HeaderInfo {
        HeaderInfo::new(5, 1_700_000_000)
    }

    fn create_msg(seed: u8) -> MsgCreateValidator {
        MsgCreateValidator {
            validator_address: OperatorAddress::from([seed; 20]),
            pubkey: ConsensusPubKey::ed25519([seed; 32]),
            description: Description::new(format!("val-{seed}"), "", "", "", ""),
            commission: CommissionRates::new(dec!(0.1), dec!(0.2), dec!(0.01)),
        }
    }

    #[test]
    fn create_validator_persists_record_and_indexes() {
        let keeper = keeper();
        keeper.create_validator(create_msg(1), &header()).unwrap();

        let val = keeper.get_validator(&OperatorAddress::from([1u8; 20])).unwrap();
        assert!(val.is_unbonded());
        assert!(val.tokens.is_zero());
        assert_eq!(val.commission.update_time, header().time);
        assert!(keeper.get_validator_by_cons_addr(&val.cons_address()).is_ok());
    }

    #[test]
    fn create_validator_rejects_duplicate_operator() {
        let keeper = keeper();
        keeper.create_validator(create_msg(1), &header()).unwrap();
        assert!(matches!(
            keeper.create_validator(create_msg(1), &header()),
            Err(StakingError::ValidatorOwnerExists)
        ));
    }

    #[test]
    fn create_validator_rejects_duplicate_consensus_key() {
        let keeper = keeper();
        keeper.create_validator(create_msg(1), &header()).unwrap();

        let mut msg = create_msg(2);
        msg.pubkey = ConsensusPubKey::ed25519([1u8; 32]);
        assert!(matches!(
            keeper.create_validator(msg, &header()),
            Err(StakingError::ValidatorPubKeyExists)
        ));
    }

    #[test]
    fn create_validator_enforces_pubkey_allow_list() {
        let keeper = Keeper::new(MemStore::new(), "gov")
            .with_allowed_pubkey_types(vec!["secp256k1".to_owned()]);
        assert!(matches!(
            keeper.create_validator(create_msg(1), &header()),
            Err(StakingError::ValidatorPubKeyTypeNotSupported { got: "ed25519", .. })
        ));
    }

    #[test]
    fn create_validator_enforces_min_commission() {
        let keeper = keeper();
        keeper
            .set_params(&Params { min_commission_rate: dec!(0.5), ..Params::default() })
            .unwrap();
        assert!(matches!(
            keeper.create_validator(create_msg(1), &header()),
            Err(StakingError::CommissionLTMinRate)
        ));
    }

    #[test]
    fn edit_validator_merges_description_and_rate() {
        let keeper = keeper();
        keeper.create_validator(create_msg(1), &header()).unwrap();

        let later = HeaderInfo::new(100, header().time + Commission::UPDATE_COOLDOWN_SECS);
        keeper
            .edit_validator(
                MsgEditValidator {
                    validator_address: OperatorAddress::from([1u8; 20]),
                    description: Description::new(
                        "renamed",
                        symbiotic_types::validator::DO_NOT_MODIFY_DESC,
                        symbiotic_types::validator::DO_NOT_MODIFY_DESC,
                        symbiotic_types::validator::DO_NOT_MODIFY_DESC,
                        symbiotic_types::validator::DO_NOT_MODIFY_DESC,
                    ),
                    commission_rate: Some(dec!(0.11)),
                },
                &later,
            )
            .unwrap();

        let val = keeper.get_validator(&OperatorAddress::from([1u8; 20])).unwrap();
        assert_eq!(val.description.moniker, "renamed");
        assert_eq!(val.commission.commission_rates.rate, dec!(0.11));
        assert_eq!(val.commission.update_time, later.time);
    }

    #[test]
    fn edit_validator_requires_existing_validator() {
        let keeper = keeper();
        let msg = MsgEditValidator {
            validator_address: OperatorAddress::from([7u8; 20]),
            description: Description::new("x", "", "", "", ""),
            commission_rate: None,
        };
        assert!(matches!(
            keeper.edit_validator(msg, &header()),
            Err(StakingError::NoValidatorFound)
        ));
    }

    #[test]
    fn update_params_is_authority_gated() {
        let keeper = keeper();
        let msg = MsgUpdateParams { authority: "mallory".to_owned(), params: Params::default() };
        assert!(matches!(
            keeper.update_params(msg, &header()),
            Err(StakingError::InvalidSigner { .. })
        ));
    }

    #[test]
    fn raising_min_commission_sweeps_validators_up() {
        let keeper = keeper();
        keeper.create_validator(create_msg(1), &header()).unwrap();

        let msg = MsgUpdateParams {
            authority: "gov".to_owned(),
            params: Params { min_commission_rate: dec!(0.3), ..Params::default() },
        };
        keeper.update_params(msg, &header()).unwrap();

        let val = keeper.get_validator(&OperatorAddress::from([1u8; 20])).unwrap();
        assert_eq!(val.commission.commission_rates.rate, dec!(0.3));
        assert_eq!(val.commission.commission_rates.max_rate, dec!(0.3));
    }
}
