use thiserror::Error;

/// Errors the checkpoint registry's public operations can return (§7).
#[derive(Error, Debug)]
pub enum Error {
    /// `add_checkpoint` was given hex that does not decode.
    #[error("invalid hex in checkpoint field: {0}")]
    HexDecode(String),

    /// A decoded hash is not exactly 32 bytes.
    #[error("checkpoint hash must be 32 bytes, got {actual}")]
    HashLength { actual: usize },

    /// A checkpoint already exists at this height with a different hash
    /// (§4.2 `init` / `add_checkpoint`: fatal, consensus-critical).
    #[error("checkpoint conflict at height {height}: existing hash disagrees with new hash")]
    Conflict { height: u64 },

    /// `height` is not a multiple of `CHECKPOINT_INTERVAL` (§3 invariant 5).
    #[error("checkpoint height {height} is not a multiple of the checkpoint interval")]
    NotIntervalAligned { height: u64 },

    #[error(transparent)]
    Storage(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
