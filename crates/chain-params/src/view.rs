//! View types the host hands across the chain observer facade (§6).
//!
//! These carry no behaviour of their own — they are the narrow slice of
//! block and contributor data the batch ledger needs to compute and
//! validate payouts, decoupled from whatever richer block type the host
//! maintains internally.

use crate::Address;
use serde::{Deserialize, Serialize};

/// A coinbase output's destination: either a plain one-time public key or
/// a script hash, mirroring the two output forms the source's miner
/// transaction can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputKey {
    PublicKey([u8; 32]),
    ScriptHash([u8; 32]),
}

/// One output of a block's coinbase transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinbaseOutput {
    pub key: OutputKey,
    pub amount: u64,
}

/// The block-level facts the batch ledger needs: enough to compute the
/// reward split and to check the coinbase actually paid it (§4.1, §6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockView {
    pub height: u64,
    pub major_version: u8,
    pub reward: u64,
    pub coinbase_outputs: Vec<CoinbaseOutput>,
}

/// One contributor to the winning service node's stake, as provided by
/// the host's service node list for the block being processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributorView {
    pub address: Address,
    /// This contributor's share of the node's total stake, as a
    /// numerator; `calculate_rewards` divides by the sum across all
    /// contributors in the list.
    pub stake_numerator: u64,
    pub stake_denominator: u64,
    /// Whether this contributor is the operator (receives the rounding
    /// remainder and the fee cut of the stakers' portion).
    pub is_operator: bool,
    /// The operator's cut of the stakers' portion, as a fraction. Carried
    /// on every contributor row for convenience (the value is the same
    /// across a single block's contributor list); only consulted when
    /// distributing the stakers' portion, not the operator's base share.
    pub operator_fee_numerator: u64,
    pub operator_fee_denominator: u64,
}
