//! The two row types the ledger persists (§3 "Batch Ledger entities").

use chain_params::Address;
use serde::{Deserialize, Serialize};

/// Unpaid balance owed to an address, accumulated across many blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualRow {
    pub address: Address,
    pub amount_accumulated: u64,
    pub payout_offset: i8,
    pub next_payout_height: u64,
}

/// A payout that actually landed in a coinbase, kept so `pop_block` can
/// invert it and so operators can audit what they were paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalisedPaymentRow {
    pub address: Address,
    pub amount_paid: u64,
    pub payout_offset: i8,
    pub block_height: u64,
}

/// Derives a deterministic `payout_offset` from the address text alone
/// (§9 open-question resolution: spreads operators evenly across the
/// payout interval without keeping any extra scheduling state).
pub fn derive_payout_offset(address: &Address, payout_interval: u64) -> i8 {
    if payout_interval == 0 {
        return 0;
    }
    let interval = clamp_interval(payout_interval);
    let hash = fnv1a64(address.as_str().as_bytes());
    (hash % interval) as i8
}

/// Whether `row` is due for payout at `block_height` under the current
/// interval (§4.1 `get_sn_payments` filter).
pub fn is_due(row: &AccrualRow, block_height: u64, payout_interval: u64) -> bool {
    if payout_interval == 0 {
        return false;
    }
    let interval = clamp_interval(payout_interval);
    let offset = row.payout_offset.rem_euclid(interval as i8) as u64;
    block_height >= offset && (block_height - offset) % interval == 0
}

/// `payout_offset` is a signed `i8` (§3); any interval above 127 is
/// clamped so the derived offset always fits it.
fn clamp_interval(payout_interval: u64) -> u64 {
    payout_interval.min(127)
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a64(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
