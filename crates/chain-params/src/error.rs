use thiserror::Error;

/// Errors surfaced while resolving network parameters or decoding addresses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The requested network type has no parameter table entry.
    #[error("unknown network type: {0:?}")]
    UnknownNetwork(crate::NetworkKind),

    /// An address string did not decode under the active network's base58 prefix.
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress {
        /// The offending address text.
        address: String,
        /// Why decoding failed.
        reason: String,
    },
}
