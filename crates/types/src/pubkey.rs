use core::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::address::ConsAddress;

pub const ED25519_PUBKEY_SIZE: usize = 32;
pub const SECP256K1_PUBKEY_SIZE: usize = 33;

/// Consensus public key of a validator.
///
/// Tagged union over the key types a chain may allow in its consensus
/// params. The variant tag participates in the allow-list check when a
/// validator is created.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsensusPubKey {
    Ed25519(Vec<u8>),
    Secp256k1(Vec<u8>),
}

impl ConsensusPubKey {
    pub fn ed25519(bytes: [u8; ED25519_PUBKEY_SIZE]) -> Self {
        Self::Ed25519(bytes.to_vec())
    }

    pub fn secp256k1(bytes: [u8; SECP256K1_PUBKEY_SIZE]) -> Self {
        Self::Secp256k1(bytes.to_vec())
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Self::Ed25519(_) => "ed25519",
            Self::Secp256k1(_) => "secp256k1",
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Ed25519(bytes) | Self::Secp256k1(bytes) => bytes,
        }
    }

    /// Derives the consensus address: first 20 bytes of SHA-256 of the
    /// raw key bytes.
    pub fn cons_address(&self) -> ConsAddress {
        let hash = Sha256::digest(self.as_bytes());
        let mut addr = [0u8; ConsAddress::LENGTH];
        addr.copy_from_slice(&hash[..ConsAddress::LENGTH]);
        ConsAddress::new(addr)
    }
}

impl fmt::Debug for ConsensusPubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.type_str())?;
        for byte in self.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}
