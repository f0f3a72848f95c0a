//! Value encoding for stored records.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::StoreError;

/// Encode a record for storage.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value)?)
}

/// Decode a stored record. `key` is only used to describe a corrupt entry.
pub fn decode<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, StoreError> {
    bincode::deserialize(bytes)
        .map_err(|e| StoreError::Corruption(format!("key {}: {e}", hex::encode(key))))
}
