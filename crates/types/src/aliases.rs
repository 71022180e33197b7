pub type U256 = alloy_primitives::U256;
pub type B256 = alloy_primitives::B256;

pub type BlockNumber = alloy_primitives::BlockNumber;
pub type BlockTimestamp = alloy_primitives::BlockTimestamp;
pub type EvmAddress = alloy_primitives::Address;
