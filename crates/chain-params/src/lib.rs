//! Shared chain parameters for the batch ledger and checkpoint registry.
//!
//! This crate carries nothing consensus-critical by itself — it is the
//! read-only table both subsystems are parameterised over (network type,
//! hard-fork version gating, address codec boundary) plus the small view
//! types the host passes across the [`chain-observer`](../chain_observer)
//! facade. Keeping it separate means neither the ledger nor the checkpoint
//! registry ever reaches for a mutable global: every call site is handed
//! an explicit [`NetworkParams`] value.

mod address;
mod constants;
mod error;
mod network;
mod view;

pub use address::Address;
pub use constants::{
    CHECKPOINT_INTERVAL, CHECKPOINT_STORE_PERSISTENTLY_INTERVAL, COIN, DIFFICULTY_TARGET_V2,
    MIN_CHECKPOINT_VERSION,
};
pub use error::Error;
pub use network::{HardForkVersion, NetworkKind, NetworkParams};
pub use view::{BlockView, ContributorView, CoinbaseOutput, OutputKey};

/// Result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;
