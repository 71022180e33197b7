//! Protocol constants shared across the Symbiotic synchronizer crates.

use std::time::Duration;

/// Name of the staking module. Store key, router key and the module
/// address all derive from it.
pub const MODULE_NAME: &str = "symStaking";

/// Store key of the module inside the host application.
pub const STORE_KEY: &str = MODULE_NAME;

/// Message router key of the module.
pub const ROUTER_KEY: &str = MODULE_NAME;

/// Heights that are a multiple of this period are sync cycles: only on
/// those heights does external-source data flow into replicated state.
pub const SYMBIOTIC_SYNC_PERIOD: i64 = 10;

/// Number of slots in a Beacon-chain epoch.
pub const SLOTS_IN_EPOCH: i64 = 32;

/// Duration of a single Beacon-chain slot, in seconds.
pub const SLOT_DURATION: i64 = 12;

/// Unix timestamp of the Beacon chain genesis (Holesky).
pub const BEACON_GENESIS_TIMESTAMP: i64 = 1_695_902_400;

/// How many times an external call is attempted before giving up.
pub const RETRIES: usize = 5;

/// Pause between external-call attempts.
pub const SLEEP_ON_RETRY: Duration = Duration::from_millis(200);

/// Sentinel carried in the pseudo-tx and the hash cache to mark a sync
/// cycle that must be skipped.
pub const INVALID_BLOCKHASH: &str = "invalid";

/// Epochs subtracted from the current epoch start to approximate the
/// finalized slot. One epoch beyond finalization for safety.
pub const DEFAULT_FINALITY_LAG_EPOCHS: i64 = 2;

/// Beacon API path under which blocks are served, keyed by slot.
pub const BEACON_BLOCK_PATH: &str = "/eth/v2/beacon/blocks/";

/// Tokens-per-unit-of-consensus-power divisor.
pub const DEFAULT_POWER_REDUCTION: u64 = 1_000_000;

/// Maximum size of the injected pseudo-tx: a JSON-quoted 0x-prefixed
/// 32-byte hash is 68 bytes.
pub const MAX_BLOCK_HASH_TX_LEN: usize = 68;

/// Beacon API endpoint used when `BEACON_API_URL` is not set.
pub const DEFAULT_BEACON_API_URL: &str = "https://eth-holesky-beacon.public.blastapi.io";

/// Execution-layer endpoints used when `ETH_API_URLS` is not set.
pub const DEFAULT_ETH_API_URLS: [&str; 3] = [
    "https://endpoints.omniatech.io/v1/eth/holesky/public",
    "https://holesky.drpc.org",
    "https://ethereum-holesky.blockpi.network/v1/rpc/public",
];
