#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Consensus-engine hooks of the Symbiotic synchronizer.
//!
//! The host engine drives one handler per node through
//! `PrepareProposal -> ProcessProposal -> PreBlocker -> EndBlock`,
//! single-threaded per height. The proposer of a sync height resolves
//! the finalized execution block hash and injects it as a pseudo-tx;
//! every node verifies and caches it in `PreBlocker`; `EndBlock`
//! consumes only the cached, agreed-upon hash.

pub mod proposal;
pub mod tx;
pub mod types;
pub mod vote_ext;

pub use proposal::ProposalHandler;
