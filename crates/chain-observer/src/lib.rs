//! Chain Observer facade (§2, §6 "Chain Observer (consumed from host)").
//!
//! The host blockchain invokes exactly two entry points on this facade —
//! [`ChainObserver::add_block`] and [`ChainObserver::pop_block`] — after
//! its own consensus validation has accepted or detached a block. Both
//! subsystems are driven from here in the order the specification
//! requires: the batch ledger validates and commits the reward payout
//! before the checkpoint registry's cull sweep runs, so a rejected block
//! never leaves checkpoint state out of step with ledger state.

mod derivation;
mod error;

pub use derivation::AddressDerivation;
pub use error::{Error, Result};

use batch_ledger::BatchLedger;
use chain_params::{Address, BlockView, ContributorView, HardForkVersion, NetworkKind};
use checkpoints::{Checkpoint, CheckpointRegistry};
use storage::KvEngine;

/// Wires a [`BatchLedger`] and a [`CheckpointRegistry`] sharing the same
/// backend to one call surface. Holds no pointer back to the host (§9
/// "No cyclic references") — the host owns this facade, not the reverse.
pub struct ChainObserver<E> {
    ledger: BatchLedger<E>,
    checkpoints: CheckpointRegistry<E>,
    network: NetworkKind,
}

impl<E: KvEngine> ChainObserver<E> {
    pub fn new(ledger: BatchLedger<E>, checkpoints: CheckpointRegistry<E>, network: NetworkKind) -> Self {
        Self { ledger, checkpoints, network }
    }

    pub fn ledger(&self) -> &BatchLedger<E> {
        &self.ledger
    }

    pub fn checkpoints(&self) -> &CheckpointRegistry<E> {
        &self.checkpoints
    }

    /// Called after the host has accepted `block` into the main chain.
    ///
    /// Runs the batch ledger's validating commit first; if the coinbase
    /// doesn't match the calculated payout set (or any other consensus
    /// error fires), this returns early and the checkpoint registry is
    /// never touched — the caller is expected to reject the whole block,
    /// so there is nothing to keep in sync.
    pub async fn add_block(
        &self,
        block: &BlockView,
        contributors: &[ContributorView],
        hard_fork: HardForkVersion,
        has_batched_governance_output: bool,
        derivation: &impl AddressDerivation,
        checkpoint: Option<Checkpoint>,
    ) -> Result<()> {
        let governance_key = if has_batched_governance_output {
            let params = self.network.params(hard_fork);
            let address = Address::parse(params.governance_wallet_address, self.network, params)?;
            Some(derivation.derive(&address))
        } else {
            None
        };

        self.ledger
            .add_block(block, contributors, governance_key, |addr| derivation.derive(addr))
            .await?;

        self.checkpoints.block_added(block.height, block.major_version, checkpoint).await?;

        tracing::info!(height = block.height, "chain observer accepted block");
        Ok(())
    }

    /// Called after the host has detached `block` from the main chain
    /// (reorg). Inverts the ledger's accrual first, then rolls the
    /// checkpoint registry back past `block.height` (§8 scenario S6).
    pub async fn pop_block(&self, block: &BlockView, contributors: &[ContributorView]) -> Result<()> {
        self.ledger.pop_block(block, contributors).await?;
        self.checkpoints.blockchain_detached(block.height).await?;
        tracing::info!(height = block.height, "chain observer detached block");
        Ok(())
    }
}
