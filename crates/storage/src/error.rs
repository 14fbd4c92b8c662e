use thiserror::Error;

/// Errors surfaced by the durable-storage layer (§6 "Durable store (consumed)").
#[derive(Error, Debug)]
pub enum Error {
    /// No value stored under the requested key.
    #[error("key not found")]
    NotFound,

    /// The underlying engine (sled, or the in-memory test engine) failed.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A value failed to encode or decode with the store's wire format.
    #[error("codec error: {0}")]
    Codec(String),

    /// A blocking storage call's spawned task panicked or was cancelled.
    #[error("storage task join error: {0}")]
    TaskJoin(String),

    /// A transaction was used after `commit()` consumed it — a caller bug,
    /// not a storage fault, but still surfaced as a typed error rather than
    /// a panic since transactions can cross crate boundaries.
    #[error("transaction already committed")]
    AlreadyCommitted,
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        Error::Backend(err.to_string())
    }
}
