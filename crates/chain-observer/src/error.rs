use thiserror::Error;

/// Errors surfaced by the chain observer facade. Mostly pass-through from
/// whichever subsystem rejected the block (§7): the facade adds no new
/// consensus rules of its own, only sequencing.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Ledger(#[from] batch_ledger::Error),

    #[error(transparent)]
    Checkpoints(#[from] checkpoints::Error),

    #[error(transparent)]
    ChainParams(#[from] chain_params::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
