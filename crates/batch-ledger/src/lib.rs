//! Batched service-node reward ledger (§4.1 of the specification).
//!
//! An ACID-backed accrual engine: every accepted block's reward split is
//! added to per-address accrual rows, and whenever an address's row
//! clears the payout threshold on its scheduled cadence, a lump-sum
//! coinbase output is expected and validated against what the block
//! actually paid. All of that — accrual, scheduling, validation, and
//! rollback — is one atomic transaction per block (§4.1 "State machine").
//!
//! This crate never reaches for the host's block type directly; it only
//! sees [`chain_params::BlockView`] and [`chain_params::ContributorView`],
//! decoupling consensus arithmetic from whatever richer types the host
//! blockchain maintains internally (§9 "No cyclic references").

mod config;
mod error;
mod ledger;
mod rewards;
mod rows;

pub use config::LedgerConfig;
pub use error::{Error, Result};
pub use ledger::BatchLedger;
pub use rewards::{calculate_rewards, check_coinbase_matches, is_governance_payment};
pub use rows::{derive_payout_offset, is_due, AccrualRow, FinalisedPaymentRow};
