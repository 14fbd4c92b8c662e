//! Bincode wire format for values stored under consensus-crate keys.
//! Kept in `storage` rather than duplicated per crate, since both
//! `batch-ledger` and `checkpoints` need the same encode/decode shape.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    bincode::serialize(value).map_err(|e| Error::Codec(e.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    bincode::deserialize(bytes).map_err(|e| Error::Codec(e.to_string()))
}
