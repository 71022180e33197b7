use serde::{Deserialize, Serialize};

/// Condensed header record kept for the latest `historical_entries`
/// heights.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoricalRecord {
    pub apphash: Vec<u8>,
    /// Unix seconds of the header time.
    pub time: u64,
    pub validators_hash: Vec<u8>,
}
