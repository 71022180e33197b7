#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Staking keeper of the Symbiotic synchronizer.
//!
//! Owns the canonical validator table and every index derived from it.
//! Tokens are assigned only by the power-apply engine from externally
//! sourced stake; there is no user-side delegation. All methods run on
//! the serialized consensus thread and touch only replicated state, so
//! equal inputs produce byte-identical state on every honest node.

pub mod genesis;
pub mod historical;
pub mod hooks;
pub mod invariants;
pub mod msgs;
pub mod queries;
pub mod state_change;
pub mod store;
pub mod symbiotic;
pub mod unbonding;
pub mod validators;

use symbiotic_types::{
    aliases::U256,
    constants::DEFAULT_POWER_REDUCTION,
    error::StakingError,
    keys,
    params::Params,
};

use crate::{
    hooks::{MultiHooks, StakingHooks},
    store::{decode_value, encode_value, StateStore},
};

/// Keeper of the `symStaking` store.
pub struct Keeper<S: StateStore> {
    store: S,
    hooks: Box<dyn StakingHooks>,
    hooks_set: bool,
    authority: String,
    power_reduction: U256,
    allowed_pubkey_types: Vec<String>,
}

impl<S: StateStore> Keeper<S> {
    /// Creates a keeper over `store`. `authority` is the only signer
    /// accepted for `UpdateParams`, typically the gov module address.
    pub fn new(store: S, authority: impl Into<String>) -> Self {
        Self {
            store,
            hooks: Box::new(MultiHooks::default()),
            hooks_set: false,
            authority: authority.into(),
            power_reduction: U256::from(DEFAULT_POWER_REDUCTION),
            allowed_pubkey_types: vec!["ed25519".to_owned(), "secp256k1".to_owned()],
        }
    }

    /// Restricts the consensus pubkey types accepted by
    /// `CreateValidator`, mirroring the chain's consensus params.
    pub fn with_allowed_pubkey_types(mut self, types: Vec<String>) -> Self {
        self.allowed_pubkey_types = types;
        self
    }

    pub fn with_power_reduction(mut self, power_reduction: U256) -> Self {
        self.power_reduction = power_reduction;
        self
    }

    /// Sets the validator hooks. Must be called at most once, during
    /// application wiring.
    pub fn set_hooks(&mut self, hooks: Box<dyn StakingHooks>) {
        if self.hooks_set {
            panic!("cannot set validator hooks twice");
        }
        self.hooks = hooks;
        self.hooks_set = true;
    }

    pub fn hooks(&self) -> &dyn StakingHooks {
        self.hooks.as_ref()
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    pub fn power_reduction(&self) -> U256 {
        self.power_reduction
    }

    /// Direct access to the underlying store, mainly for state-equality
    /// assertions in tests and operator tooling.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub(crate) fn allowed_pubkey_types(&self) -> &[String] {
        &self.allowed_pubkey_types
    }

    /// Module parameters; defaults apply until genesis or `UpdateParams`
    /// writes them.
    pub fn params(&self) -> Result<Params, StakingError> {
        match self.store.get(&keys::params_key())? {
            Some(bytes) => Ok(decode_value(&bytes)?),
            None => Ok(Params::default()),
        }
    }

    pub fn set_params(&self, params: &Params) -> Result<(), StakingError> {
        params.validate()?;
        self.store.set(&keys::params_key(), &encode_value(params)?)?;
        Ok(())
    }

    pub fn min_commission_rate(&self) -> Result<rust_decimal::Decimal, StakingError> {
        Ok(self.params()?.min_commission_rate)
    }
}
