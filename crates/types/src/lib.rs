#![forbid(unsafe_code)]
#![deny(trivial_casts, trivial_numeric_casts)]
#![allow(missing_docs)]

pub mod address;
pub mod constants;
pub mod error;
pub mod genesis;
pub mod historical;
pub mod keys;
pub mod params;
pub mod pubkey;
pub mod sync;
pub mod validator;

pub mod aliases;
