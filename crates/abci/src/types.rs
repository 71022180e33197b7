//! ABCI-style request and response shapes consumed from the host
//! consensus engine. Only the fields the synchronizer reads are
//! modeled.

pub use symbiotic_types::validator::ValidatorUpdate;

#[derive(Clone, Debug)]
pub struct PrepareProposalRequest {
    pub height: i64,
    /// Unix seconds of the proposed block's header time.
    pub time: u64,
    pub txs: Vec<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct PrepareProposalResponse {
    pub txs: Vec<Vec<u8>>,
}

#[derive(Clone, Debug)]
pub struct FinalizeBlockRequest {
    pub height: i64,
    /// Unix seconds of the finalized block's header time.
    pub time: u64,
    pub txs: Vec<Vec<u8>>,
    pub app_hash: Vec<u8>,
    pub next_validators_hash: Vec<u8>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ProcessProposalStatus {
    Accept,
    Reject,
}

#[derive(Clone, Debug)]
pub struct ProcessProposalResponse {
    pub status: ProcessProposalStatus,
}

#[derive(Clone, Debug, Default)]
pub struct ExtendVoteResponse {
    pub vote_extension: Vec<u8>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VerifyVoteExtensionStatus {
    Accept,
    Reject,
}

#[derive(Copy, Clone, Debug)]
pub struct VerifyVoteExtensionResponse {
    pub status: VerifyVoteExtensionStatus,
}
