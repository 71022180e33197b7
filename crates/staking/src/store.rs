//! Replicated state store.
//!
//! One flat keyspace of raw byte keys; the layout lives in
//! `symbiotic_types::keys`. All access happens on the serialized
//! consensus thread, so the API is synchronous.

pub mod memory;
pub mod redb_store;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use memory::MemStore;
pub use redb_store::RedbStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Failed to encode/decode value: {0}")]
    Codec(String),
}

impl From<StoreError> for symbiotic_types::error::StakingError {
    fn from(err: StoreError) -> Self {
        symbiotic_types::error::StakingError::Store(err.to_string())
    }
}

/// Byte-oriented key/value store with ordered prefix scans.
pub trait StateStore: Send + Sync {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;
    fn set(&self, key: &[u8], value: &[u8]) -> Result<(), StoreError>;
    fn delete(&self, key: &[u8]) -> Result<(), StoreError>;

    /// Entries under `prefix` in ascending key order.
    fn prefix_iter(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Entries under `prefix` in descending key order.
    fn prefix_iter_rev(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut entries = self.prefix_iter(prefix)?;
        entries.reverse();
        Ok(entries)
    }
}

/// Serializes a store value using bincode.
pub fn encode_value<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    bincode::serialize(value).map_err(|e| StoreError::Codec(format!("serialize: {e}")))
}

/// Deserializes a store value using bincode.
pub fn decode_value<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes).map_err(|e| StoreError::Codec(format!("deserialize: {e}")))
}

/// Smallest byte string strictly greater than every key starting with
/// `prefix`, or `None` when the prefix is all `0xFF`.
pub(crate) fn prefix_end(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut end = prefix.to_vec();
    while let Some(last) = end.pop() {
        if last != u8::MAX {
            end.push(last + 1);
            return Some(end);
        }
    }
    None
}
