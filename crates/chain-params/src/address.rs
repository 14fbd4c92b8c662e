//! Address as the ledger key (§9 "Address as key").
//!
//! The batch ledger is deliberately decoupled from key-derivation details:
//! it only ever touches the canonical textual encoding of an address.
//! Conversion to the on-chain output public key happens downstream, at
//! `validate_batch_payment` time, via a host-supplied derivation function
//! (see [`chain_observer::AddressDerivation`]).

use crate::{Error, NetworkKind, NetworkParams, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated, canonical textual address.
///
/// Equality, ordering, and hashing all operate on the textual encoding —
/// this is what lets `get_sn_payments` define "address lexicographic"
/// ordering (§4.1) purely in terms of this type's `Ord` impl.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Validates `text` as a base58-encoded address under `network`'s
    /// address prefix and wraps it. Does not attempt to recover a public
    /// key — only structural validity (decodable, non-empty payload) is
    /// checked here.
    pub fn parse(text: &str, network: NetworkKind, params: NetworkParams) -> Result<Self> {
        let decoded = bs58::decode(text).into_vec().map_err(|e| Error::InvalidAddress {
            address: text.to_string(),
            reason: format!("base58 decode failed: {e}"),
        })?;

        if decoded.len() < 8 {
            return Err(Error::InvalidAddress {
                address: text.to_string(),
                reason: "decoded payload too short to contain a prefix and a public key"
                    .to_string(),
            });
        }

        let prefix = read_varint_prefix(&decoded);
        let known_prefixes = [
            params.address_base58_prefix,
            params.integrated_address_base58_prefix,
            params.subaddress_base58_prefix,
        ];
        if !known_prefixes.contains(&prefix) {
            return Err(Error::InvalidAddress {
                address: text.to_string(),
                reason: format!(
                    "address prefix {prefix} does not match any known prefix for {network}"
                ),
            });
        }

        Ok(Self(text.to_string()))
    }

    /// Wraps already-validated address text without re-checking the
    /// prefix. Used when loading rows back out of durable storage, where
    /// the text was validated on the way in.
    pub fn from_trusted(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The canonical textual encoding, as stored in the ledger.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Address> for String {
    fn from(addr: Address) -> Self {
        addr.0
    }
}

/// Reads the cryptonote-style varint prefix from the front of a decoded
/// address payload (little-endian base-128 groups, high bit = continue).
fn read_varint_prefix(bytes: &[u8]) -> u64 {
    let mut value: u64 = 0;
    let mut shift = 0;
    for &byte in bytes.iter().take(10) {
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HardForkVersion;

    fn encode_address(prefix: u64, payload: &[u8]) -> String {
        let mut bytes = Vec::new();
        let mut v = prefix;
        loop {
            let mut byte = (v & 0x7f) as u8;
            v >>= 7;
            if v != 0 {
                byte |= 0x80;
            }
            bytes.push(byte);
            if v == 0 {
                break;
            }
        }
        bytes.extend_from_slice(payload);
        bs58::encode(bytes).into_string()
    }

    #[test]
    fn parses_address_with_matching_prefix() {
        let params = NetworkKind::Mainnet.params(HardForkVersion::V13);
        let text = encode_address(params.address_base58_prefix, &[7u8; 64]);
        let addr = Address::parse(&text, NetworkKind::Mainnet, params).unwrap();
        assert_eq!(addr.as_str(), text);
    }

    #[test]
    fn rejects_address_with_foreign_prefix() {
        let mainnet = NetworkKind::Mainnet.params(HardForkVersion::V13);
        let testnet = NetworkKind::Testnet.params(HardForkVersion::V13);
        let text = encode_address(testnet.address_base58_prefix, &[7u8; 64]);
        assert!(Address::parse(&text, NetworkKind::Mainnet, mainnet).is_err());
    }

    #[test]
    fn ordering_is_lexicographic_on_text() {
        let a = Address::from_trusted("aaa");
        let b = Address::from_trusted("aab");
        assert!(a < b);
    }
}
