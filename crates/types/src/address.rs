use core::fmt;

use serde::{Deserialize, Serialize};

/// Address of a validator operator.
///
/// Variable-length bytes (at most 255, so the length fits the one-byte
/// prefix used by the store key layout). Rendered as a bech32 string by
/// outer layers; the core only ever compares and hashes the raw bytes.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorAddress(Vec<u8>);

impl OperatorAddress {
    pub const MAX_LENGTH: usize = 255;

    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        debug_assert!(bytes.len() <= Self::MAX_LENGTH);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for OperatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for OperatorAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "OperatorAddress({self})")
    }
}

impl From<&[u8]> for OperatorAddress {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for OperatorAddress {
    fn from(bytes: [u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

/// Consensus address: the first 20 bytes of the SHA-256 hash of the
/// consensus public key.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsAddress([u8; Self::LENGTH]);

impl ConsAddress {
    pub const LENGTH: usize = 20;

    pub const fn new(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    /// Truncates the leading 20 bytes of a 32-byte identifier, the form
    /// the middleware contract reports consensus addresses in.
    pub fn from_word(word: &[u8; 32]) -> Self {
        let mut bytes = [0u8; Self::LENGTH];
        bytes.copy_from_slice(&word[..Self::LENGTH]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for ConsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02X}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ConsAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConsAddress({self})")
    }
}

impl TryFrom<&[u8]> for ConsAddress {
    type Error = crate::error::StakingError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::LENGTH] = bytes
            .try_into()
            .map_err(|_| crate::error::StakingError::InvalidConsAddressLength(bytes.len()))?;
        Ok(Self(bytes))
    }
}
