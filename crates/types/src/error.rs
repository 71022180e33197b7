use thiserror::Error;

/// Errors produced by the external-source clients (Beacon HTTP and
/// execution-layer JSON-RPC).
#[derive(Debug, Error)]
pub enum SourceError {
    /// Every Beacon endpoint was exhausted without a usable answer.
    #[error("beacon API unavailable after retries: {0}")]
    BeaconUnavailable(String),

    /// Every execution-layer endpoint was exhausted without an answer.
    #[error("execution-layer RPC unavailable after retries: {0}")]
    ElUnavailable(String),

    /// The Beacon API returned 404 for the requested slot.
    #[error("beacon slot {0} omitted")]
    SlotOmitted(i64),

    /// The Beacon block exists but is not yet finalized.
    #[error("beacon block at slot {0} is not finalized")]
    NotFinalized(i64),

    /// The execution layer re-orged past the pinned block hash.
    #[error("block {0} is not currently canonical")]
    NotCanonical(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("JSON-RPC error (code {code}): {message}")]
    JsonRpc { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("MIDDLEWARE_ADDRESS is not set")]
    MissingMiddlewareAddress,
}

/// Errors produced by the staking keeper and its message handlers.
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("validator does not exist")]
    NoValidatorFound,

    #[error("validator already exists for this operator address")]
    ValidatorOwnerExists,

    #[error("validator already exists for this consensus pubkey")]
    ValidatorPubKeyExists,

    #[error("pubkey type {got} is not allowed, expected one of {expected:?}")]
    ValidatorPubKeyTypeNotSupported { got: &'static str, expected: Vec<String> },

    #[error("consensus pubkey len is invalid, got: {got}, expected: {expected}")]
    ConsensusPubKeyLenInvalid { got: usize, expected: usize },

    #[error("commission cannot be less than min rate")]
    CommissionLTMinRate,

    #[error("commission must be between 0 and 1 (inclusive)")]
    CommissionOutOfRange,

    #[error("commission cannot be more than the max rate")]
    CommissionGTMaxRate,

    #[error("commission cannot be changed more than once in 24h")]
    CommissionUpdateTime,

    #[error("commission cannot be changed more than max change rate")]
    CommissionGTMaxChangeRate,

    #[error("invalid commission rates: {0}")]
    InvalidCommissionRates(&'static str),

    #[error("empty description")]
    EmptyDescription,

    #[error("invalid description field {field}: got length {got}, max is {max}")]
    DescriptionFieldTooLong { field: &'static str, got: usize, max: usize },

    #[error("invalid authority; expected {expected}, got {got}")]
    InvalidSigner { expected: String, got: String },

    #[error("no blockhash cache for height {expected}, actual cached height {cached:?}")]
    MissingHashCache { cached: Option<i64>, expected: i64 },

    #[error("validator {0}: expecting unbonding_on_hold_ref_count > 0")]
    UnbondingOnHoldRefCountNegative(String),

    #[error("unbonding operation has no type")]
    NoUnbondingType,

    #[error("unbonding operation not found")]
    UnbondingNotFound,

    #[error("validator is jailed")]
    ValidatorJailed,

    #[error("validator is not jailed")]
    ValidatorNotJailed,

    #[error("validator tokens too low to unjail")]
    TokensTooLowToUnjail,

    #[error("bad state transition {from:?} -> {to:?} for validator {validator}")]
    BadStateTransition { from: crate::validator::BondStatus, to: crate::validator::BondStatus, validator: String },

    #[error("validator cannot be removed: status is not unbonded or tokens remain")]
    ValidatorNotRemovable,

    #[error("invalid consensus address length: {0}, expected 20")]
    InvalidConsAddressLength(usize),

    #[error("invalid params: {0}")]
    InvalidParams(&'static str),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("symbiotic validator update failed: {0}")]
    SymbioticValUpdate(#[from] SourceError),

    #[error("store error: {0}")]
    Store(String),
}
