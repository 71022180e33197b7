//! Vote-extension hooks. The synchronizer carries its data through the
//! proposal instead, so these exist only to satisfy the host engine's
//! interface: empty extension, accept everything.

use crate::types::{ExtendVoteResponse, VerifyVoteExtensionResponse, VerifyVoteExtensionStatus};

#[derive(Default)]
pub struct VoteExtensionHandler;

impl VoteExtensionHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn extend_vote(&self) -> ExtendVoteResponse {
        ExtendVoteResponse::default()
    }

    pub fn verify_vote_extension(&self) -> VerifyVoteExtensionResponse {
        VerifyVoteExtensionResponse { status: VerifyVoteExtensionStatus::Accept }
    }
}
