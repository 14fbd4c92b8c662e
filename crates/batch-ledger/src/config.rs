/// Tunable cadence parameters for the payout schedule (§3, §4.1).
///
/// These are deployment parameters, not consensus constants in the sense
/// `chain_params::constants` are — a host is free to vary them, but once
/// chosen they must be applied identically by every node validating the
/// same chain.
#[derive(Debug, Clone, Copy)]
pub struct LedgerConfig {
    /// Cadence, in blocks, on which an address becomes due for payout.
    ///
    /// Bounded to `1..=127`: `AccrualRow::payout_offset` is a signed `i8`
    /// per the data model (§3), so an offset derived mod this interval
    /// must fit that range.
    pub payout_interval: u64,
    /// Accrued balances below this threshold are never paid out, even
    /// when their payout slot comes up; they keep accruing.
    pub minimum_payout_threshold: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { payout_interval: 20, minimum_payout_threshold: 1 }
    }
}
