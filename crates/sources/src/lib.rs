#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! External-source clients of the Symbiotic synchronizer.
//!
//! Everything in this crate is process-local: two nodes may talk to
//! different endpoints in different orders. Determinism of the
//! replicated state is preserved because the only values that flow
//! upward are the proposer-chosen block hash (agreed on in PreBlocker)
//! and the middleware contract's return value at that pinned hash.

pub mod beacon;
pub mod endpoints;
pub mod middleware;
pub mod transport;

pub use beacon::BeaconClient;
pub use endpoints::{ApiUrls, MiddlewareConfig};
pub use middleware::MiddlewareClient;
