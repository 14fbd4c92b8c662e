use thiserror::Error;

/// Errors the batch ledger's public operations can return (§7).
///
/// Every variant here is a consensus failure the host must treat as
/// "reject the block" — nothing in this enum represents a transient
/// condition the ledger retries on its own.
#[derive(Error, Debug)]
pub enum Error {
    /// `add_sn_payments` would overflow `amount_accumulated`.
    #[error("accrual overflow for address {address}: {amount} + {addition} exceeds u64")]
    AccrualOverflow { address: String, amount: u64, addition: u64 },

    /// `subtract_sn_payments` would underflow `amount_accumulated`.
    #[error("accrual underflow for address {address}: {amount} - {subtraction} is negative")]
    AccrualUnderflow { address: String, amount: u64, subtraction: u64 },

    /// `add_block`/`pop_block` was called with a height that does not
    /// match the ledger's current height scalar.
    #[error("height mismatch: ledger is at {expected}, block claims {actual}")]
    HeightMismatch { expected: u64, actual: u64 },

    /// The reward split computed by `calculate_rewards` does not sum to
    /// the block's reward exactly.
    #[error("reward split sums to {actual}, expected {expected}")]
    RewardSplitMismatch { expected: u64, actual: u64 },

    /// The coinbase's actual outputs do not match the calculated payout
    /// set in `validate_batch_payment`.
    #[error("coinbase payment mismatch at height {height}: {reason}")]
    CoinbaseMismatch { height: u64, reason: String },

    #[error(transparent)]
    ChainParams(#[from] chain_params::Error),

    #[error(transparent)]
    Storage(#[from] storage::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
