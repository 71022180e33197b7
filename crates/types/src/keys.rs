//! Byte-exact layout of the replicated state store.
//!
//! Every honest node must derive identical keys for identical state, so
//! the builders below are the single source of truth for the layout.
//! Prefixes are stable; changing any of them is a state migration.

use crate::{
    address::{ConsAddress, OperatorAddress},
    aliases::U256,
    validator::{tokens_to_consensus_power, Validator},
};

/// Prefix for the power a validator held at the previous block's end.
pub const LAST_VALIDATOR_POWER: u8 = 0x11;
/// Prefix for the total power of the previous block's bonded set.
pub const LAST_TOTAL_POWER: u8 = 0x12;
/// Prefix for validator records, keyed by operator address.
pub const VALIDATORS: u8 = 0x21;
/// Prefix for the consensus-address -> operator-address index.
pub const VALIDATORS_BY_CONS_ADDR: u8 = 0x22;
/// Prefix for the power-sorted validator index.
pub const VALIDATORS_BY_POWER_INDEX: u8 = 0x23;
/// Prefix for the unbonding-operation id counter.
pub const UNBONDING_ID: u8 = 0x37;
/// Prefix for the unbonding-id -> validator-key index.
pub const UNBONDING_INDEX: u8 = 0x38;
/// Prefix for the unbonding-id -> operation-type index.
pub const UNBONDING_TYPE: u8 = 0x39;
/// Prefix reserved by the layout for a delegator unbonding queue. This
/// module sources stake externally and never writes it.
pub const UNBONDING_QUEUE: u8 = 0x41;
/// Prefix for the validator unbonding queue, keyed by completion time
/// and height.
pub const VALIDATOR_QUEUE: u8 = 0x43;
/// Prefix for historical header records.
pub const HISTORICAL_INFO: u8 = 0x50;
/// Prefix for the module parameters.
pub const PARAMS: u8 = 0x51;
/// Prefix for the single-slot finalized-blockhash cache.
pub const CACHED_BLOCK_HASH: u8 = 0x5A;

/// Width of the big-endian power word inside the power-index key.
const POWER_BYTES_LEN: usize = 8;
/// Width of the time word inside validator-queue keys.
const TIME_BYTES_LEN: u64 = 8;

fn length_prefixed(prefix: u8, bytes: &[u8]) -> Vec<u8> {
    debug_assert!(bytes.len() <= u8::MAX as usize);
    let mut key = Vec::with_capacity(2 + bytes.len());
    key.push(prefix);
    key.push(bytes.len() as u8);
    key.extend_from_slice(bytes);
    key
}

/// `0x21 || len || operator_address` -> Validator
pub fn validator_key(addr: &OperatorAddress) -> Vec<u8> {
    length_prefixed(VALIDATORS, addr.as_bytes())
}

/// Recovers the operator address from a validator store key.
pub fn address_from_validator_key(key: &[u8]) -> OperatorAddress {
    debug_assert!(key.len() >= 3 && key[0] == VALIDATORS);
    OperatorAddress::from(&key[2..])
}

/// `0x22 || len || cons_address` -> operator address bytes
pub fn validator_by_cons_addr_key(cons: &ConsAddress) -> Vec<u8> {
    length_prefixed(VALIDATORS_BY_CONS_ADDR, cons.as_bytes())
}

/// `0x11 || len || operator_address` -> i64 power
pub fn last_validator_power_key(addr: &OperatorAddress) -> Vec<u8> {
    length_prefixed(LAST_VALIDATOR_POWER, addr.as_bytes())
}

/// Recovers the operator address from a last-validator-power key.
pub fn address_from_last_power_key(key: &[u8]) -> OperatorAddress {
    debug_assert!(key.len() >= 3 && key[0] == LAST_VALIDATOR_POWER);
    OperatorAddress::from(&key[2..])
}

/// Power-index key: `0x23 || be_u64(power) || addr_len || !addr`.
///
/// The big-endian power word makes lexicographic order equal numeric
/// order; the bitwise NOT of the address breaks power ties so that a
/// reverse scan yields lower addresses first, deterministically.
pub fn validator_power_index_key(validator: &Validator, power_reduction: U256) -> Vec<u8> {
    let power = tokens_to_consensus_power(validator.tokens, power_reduction);
    let addr = validator.operator_address.as_bytes();
    debug_assert!(addr.len() <= u8::MAX as usize);

    let mut key = Vec::with_capacity(1 + POWER_BYTES_LEN + 1 + addr.len());
    key.push(VALIDATORS_BY_POWER_INDEX);
    key.extend_from_slice(&(power as u64).to_be_bytes());
    key.push(addr.len() as u8);
    key.extend(addr.iter().map(|b| !b));
    key
}

/// Recovers the operator address from a power-index key.
pub fn parse_power_index_key(key: &[u8]) -> OperatorAddress {
    debug_assert!(key.len() > 1 + POWER_BYTES_LEN + 1 && key[0] == VALIDATORS_BY_POWER_INDEX);
    let addr: Vec<u8> = key[1 + POWER_BYTES_LEN + 1..].iter().map(|b| !b).collect();
    OperatorAddress::new(addr)
}

pub fn unbonding_id_key() -> Vec<u8> {
    vec![UNBONDING_ID]
}

/// `0x38 || be_u64(id)` -> validator store key
pub fn unbonding_index_key(id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(UNBONDING_INDEX);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// `0x39 || be_u64(id)` -> unbonding operation type
pub fn unbonding_type_key(id: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(UNBONDING_TYPE);
    key.extend_from_slice(&id.to_be_bytes());
    key
}

/// Validator-queue key: `0x43 || be_u64(len) || be_u64(time) || be_u64(height)`.
///
/// The leading length word mirrors the historical layout, where the
/// time bytes were variable-width. With a fixed-width time word the key
/// still sorts by completion time first, then height.
pub fn validator_queue_key(completion_time: u64, height: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + 8 + 8 + 8);
    key.push(VALIDATOR_QUEUE);
    key.extend_from_slice(&TIME_BYTES_LEN.to_be_bytes());
    key.extend_from_slice(&completion_time.to_be_bytes());
    key.extend_from_slice(&height.to_be_bytes());
    key
}

/// Recovers `(completion_time, height)` from a validator-queue key.
pub fn parse_validator_queue_key(key: &[u8]) -> Option<(u64, u64)> {
    if key.len() != 25 || key[0] != VALIDATOR_QUEUE {
        return None;
    }
    let time = u64::from_be_bytes(key[9..17].try_into().ok()?);
    let height = u64::from_be_bytes(key[17..25].try_into().ok()?);
    Some((time, height))
}

/// `0x50 || be_u64(height)` -> HistoricalRecord
pub fn historical_info_key(height: u64) -> Vec<u8> {
    let mut key = Vec::with_capacity(9);
    key.push(HISTORICAL_INFO);
    key.extend_from_slice(&height.to_be_bytes());
    key
}

pub fn params_key() -> Vec<u8> {
    vec![PARAMS]
}

pub fn last_total_power_key() -> Vec<u8> {
    vec![LAST_TOTAL_POWER]
}

pub fn cached_block_hash_key() -> Vec<u8> {
    vec![CACHED_BLOCK_HASH]
}
