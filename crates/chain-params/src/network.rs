//! Network type, hard-fork version gating, and the per-network parameter
//! table (§6, §9 "Hard-fork gating"). This mirrors the source's
//! `cryptonote::get_config(nettype, hard_fork_version)` but as a pure
//! function over an immutable table instead of a mutable static.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Which network a component is operating against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkKind {
    Mainnet,
    Testnet,
    Stagenet,
    Fakechain,
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkKind::Mainnet => write!(f, "mainnet"),
            NetworkKind::Testnet => write!(f, "testnet"),
            NetworkKind::Stagenet => write!(f, "stagenet"),
            NetworkKind::Fakechain => write!(f, "fakechain"),
        }
    }
}

/// The chain's hard-fork version sequence (§6). Ordered so that
/// `hard_fork >= HardForkVersion::V12` etc. compare correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum HardForkVersion {
    V7 = 7,
    V8 = 8,
    V9 = 9,
    V10 = 10,
    V11 = 11,
    V12 = 12,
    V13 = 13,
}

impl HardForkVersion {
    /// Builds a hard-fork version from a raw `major_version` byte seen on a
    /// block, if it falls within the known sequence.
    pub fn from_major_version(v: u8) -> Option<Self> {
        match v {
            7 => Some(Self::V7),
            8 => Some(Self::V8),
            9 => Some(Self::V9),
            10 => Some(Self::V10),
            11 => Some(Self::V11),
            12 => Some(Self::V12),
            13 => Some(Self::V13),
            _ => None,
        }
    }

    /// Raw numeric version, as carried on the block header.
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Read-only view into the per-network parameter table (the source's
/// `config_t`). Never mutated in place: a new value is produced by
/// [`NetworkKind::params`] for the hard-fork version in effect at a given
/// height.
#[derive(Debug, Clone, Copy)]
pub struct NetworkParams {
    /// Base58 address prefix for standard addresses.
    pub address_base58_prefix: u64,
    /// Base58 address prefix for integrated addresses.
    pub integrated_address_base58_prefix: u64,
    /// Base58 address prefix for subaddresses.
    pub subaddress_base58_prefix: u64,
    /// Default P2P port.
    pub p2p_default_port: u16,
    /// Default RPC port.
    pub rpc_default_port: u16,
    /// The network's identifying UUID, carried on every P2P handshake so
    /// peers on different networks (mainnet/testnet/stagenet/fakechain)
    /// refuse to sync with one another. An opaque input value (§9 design
    /// notes) — this crate neither computes nor validates it.
    pub network_id: Uuid,
    /// The nonce baked into this network's genesis block header.
    pub genesis_nonce: u32,
    /// Cadence, in blocks, at which a governance payout is due.
    pub governance_reward_interval_in_blocks: u64,
    /// The governance wallet address active for the queried hard-fork
    /// version. Only one address is returned per query: callers that need
    /// historical overlap should query at each version explicitly (§9).
    pub governance_wallet_address: &'static str,
}

impl NetworkKind {
    /// Resolves this network's parameter table entry for the given
    /// hard-fork version (§9 "Hard-fork gating": a pure function, not a
    /// mutated shared config struct).
    pub fn params(self, hard_fork: HardForkVersion) -> NetworkParams {
        match self {
            NetworkKind::Mainnet | NetworkKind::Fakechain => NetworkParams {
                address_base58_prefix: 18,
                integrated_address_base58_prefix: 19,
                subaddress_base58_prefix: 20,
                p2p_default_port: 20000,
                rpc_default_port: 30000,
                network_id: Uuid::from_bytes(MAINNET_NETWORK_ID),
                genesis_nonce: 70,
                governance_reward_interval_in_blocks: if matches!(self, NetworkKind::Fakechain) {
                    100
                } else {
                    (60 * 60) / super::constants::DIFFICULTY_TARGET_V2
                },
                governance_wallet_address: if hard_fork <= HardForkVersion::V10 {
                    MAINNET_GOVERNANCE_WALLETS[0]
                } else {
                    MAINNET_GOVERNANCE_WALLETS[1]
                },
            },
            NetworkKind::Testnet => NetworkParams {
                address_base58_prefix: 156,
                integrated_address_base58_prefix: 157,
                subaddress_base58_prefix: 158,
                p2p_default_port: 38156,
                rpc_default_port: 38157,
                network_id: Uuid::from_bytes(TESTNET_NETWORK_ID),
                genesis_nonce: 10_001,
                governance_reward_interval_in_blocks: 1000,
                governance_wallet_address: if hard_fork <= HardForkVersion::V9 {
                    TESTNET_GOVERNANCE_WALLETS[0]
                } else {
                    TESTNET_GOVERNANCE_WALLETS[1]
                },
            },
            NetworkKind::Stagenet => NetworkParams {
                address_base58_prefix: 24,
                integrated_address_base58_prefix: 25,
                subaddress_base58_prefix: 36,
                p2p_default_port: 38153,
                rpc_default_port: 38154,
                network_id: Uuid::from_bytes(STAGENET_NETWORK_ID),
                genesis_nonce: 70,
                governance_reward_interval_in_blocks: (60 * 60 * 24 * 7)
                    / super::constants::DIFFICULTY_TARGET_V2,
                governance_wallet_address: STAGENET_GOVERNANCE_WALLETS[0],
            },
        }
    }
}

/// Governance wallet addresses before/after the mainnet hard-fork v10
/// boundary (§6, §9). Placeholder values: a deploying host supplies its
/// own table entries, these exist only to exercise the selection logic.
const MAINNET_GOVERNANCE_WALLETS: [&str; 2] = [
    "jKC1V36UcnfF35qHfKU4YucU8f9vtjepSR66QngrPZsR5QoaLeFzcFcjQQKDTdtzvvVArZx51ZyUGX24yo7fetrN6VsxgafpQ9",
    "jKC1V36UcnfF35qHfKU4YucU8f9vtjepSR66QngrPZsR5QoaLeFzcFcjQQKDTdtzvvVArZx51ZyUGX24yo7fetrN6VsxgafpQ9",
];

const TESTNET_GOVERNANCE_WALLETS: [&str; 2] = [
    "T6SUprTYE5rQpep9iQFxyPcKVd91DFR1fQ1Qsyqp5eYLiFc8XuYd3reRE71qDL8c3DXioUbDEpDFdaUpetnL37NS1R3rzoKxi",
    "T6TzkJb5EiASaCkcH7idBEi1HSrpSQJE1Zq3aL65ojBMPZvqHNYPTL56i3dncGVNEYCG5QG5zrBmRiVwcg6b1cRM1SRNqbp44",
];

const STAGENET_GOVERNANCE_WALLETS: [&str; 1] =
    ["59f7FCwYMiwMnFr8HwsnfJ2hK3DYB1tryhjsfmXqEBJojKyqKeNWoaDaZaauoZPiZHUYp2wJuy5s9H96qy4q9xUVCXXHmTU"];

/// Per-network identifying bytes carried in the P2P handshake (§6
/// "network id (16-byte UUID)"). Distinct per network so a mainnet and a
/// testnet node refuse to sync with one another; opaque input values,
/// same as the wallet tables above.
const MAINNET_NETWORK_ID: [u8; 16] =
    [0x11, 0x30, 0xF1, 0x71, 0x61, 0x04, 0x41, 0x61, 0x17, 0x31, 0x00, 0x82, 0x16, 0xA1, 0xA1, 0x10];
const TESTNET_NETWORK_ID: [u8; 16] =
    [0x12, 0x30, 0xF1, 0x71, 0x61, 0x04, 0x41, 0x61, 0x17, 0x31, 0x00, 0x82, 0x16, 0xA1, 0xA1, 0x11];
const STAGENET_NETWORK_ID: [u8; 16] =
    [0x13, 0x30, 0xF1, 0x71, 0x61, 0x04, 0x41, 0x61, 0x17, 0x31, 0x00, 0x82, 0x16, 0xA1, 0xA1, 0x12];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mainnet_governance_switches_after_v10() {
        let before = NetworkKind::Mainnet.params(HardForkVersion::V10);
        let after = NetworkKind::Mainnet.params(HardForkVersion::V11);
        assert_eq!(before.governance_wallet_address, MAINNET_GOVERNANCE_WALLETS[0]);
        assert_eq!(after.governance_wallet_address, MAINNET_GOVERNANCE_WALLETS[1]);
    }

    #[test]
    fn testnet_governance_switches_after_v9() {
        let before = NetworkKind::Testnet.params(HardForkVersion::V9);
        let after = NetworkKind::Testnet.params(HardForkVersion::V10);
        assert_eq!(before.governance_wallet_address, TESTNET_GOVERNANCE_WALLETS[0]);
        assert_eq!(after.governance_wallet_address, TESTNET_GOVERNANCE_WALLETS[1]);
    }

    #[test]
    fn fakechain_shares_mainnet_prefixes_but_shorter_interval() {
        let main = NetworkKind::Mainnet.params(HardForkVersion::V13);
        let fake = NetworkKind::Fakechain.params(HardForkVersion::V13);
        assert_eq!(main.address_base58_prefix, fake.address_base58_prefix);
        assert_eq!(fake.governance_reward_interval_in_blocks, 100);
    }

    #[test]
    fn network_id_distinguishes_every_network() {
        let ids: Vec<Uuid> = [NetworkKind::Mainnet, NetworkKind::Testnet, NetworkKind::Stagenet]
            .iter()
            .map(|k| k.params(HardForkVersion::V13).network_id)
            .collect();
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }

    #[test]
    fn fakechain_shares_mainnet_network_id_and_genesis_nonce() {
        let main = NetworkKind::Mainnet.params(HardForkVersion::V13);
        let fake = NetworkKind::Fakechain.params(HardForkVersion::V13);
        assert_eq!(main.network_id, fake.network_id);
        assert_eq!(main.genesis_nonce, fake.genesis_nonce);
    }

    #[test]
    fn hard_fork_from_major_version_rejects_unknown() {
        assert_eq!(HardForkVersion::from_major_version(6), None);
        assert_eq!(HardForkVersion::from_major_version(13), Some(HardForkVersion::V13));
        assert_eq!(HardForkVersion::from_major_version(14), None);
    }
}
