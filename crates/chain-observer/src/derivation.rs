//! The host-supplied address→output-key boundary (§6, §9 "Address as key").
//!
//! The batch ledger keys every row by the canonical textual address and
//! never derives a public key itself; only the chain observer facade,
//! which sits on the host's side of the boundary, needs this collaborator.

use chain_params::{Address, OutputKey};

/// Derives the on-chain coinbase output key a given address would
/// receive funds at, for the network the host is running. Implemented by
/// the host — this repository never derives a key from an address
/// itself, only compares against what the host derives.
pub trait AddressDerivation: Send + Sync {
    fn derive(&self, address: &Address) -> OutputKey;
}

impl<F> AddressDerivation for F
where
    F: Fn(&Address) -> OutputKey + Send + Sync,
{
    fn derive(&self, address: &Address) -> OutputKey {
        self(address)
    }
}
