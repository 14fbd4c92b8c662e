//! Checkpoint entity types (§3 "Checkpoint entities").

use serde::{Deserialize, Serialize};

/// How a checkpoint came to exist. Only `ServiceNode` checkpoints carry
/// signatures; `Hardcoded` ones are baked into the binary or added by an
/// operator via `add_checkpoint` and need none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckpointKind {
    Hardcoded,
    ServiceNode,
}

/// One voter's signature over a service-node checkpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointVote {
    pub voter_index: u16,
    pub signature: Vec<u8>,
}

/// An `(height, hash)` commitment (§3). Immutable once stored: the
/// registry never mutates a `Checkpoint` in place, only deletes it
/// (rollback or cull) or replaces the whole row via `add_checkpoint`'s
/// conflict-checked insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub height: u64,
    pub block_hash: [u8; 32],
    pub kind: CheckpointKind,
    pub votes: Vec<CheckpointVote>,
}

impl Checkpoint {
    pub fn hardcoded(height: u64, block_hash: [u8; 32]) -> Self {
        Self { height, block_hash, kind: CheckpointKind::Hardcoded, votes: Vec::new() }
    }

    pub fn service_node(height: u64, block_hash: [u8; 32], votes: Vec<CheckpointVote>) -> Self {
        Self { height, block_hash, kind: CheckpointKind::ServiceNode, votes }
    }

    pub fn is_service_node(&self) -> bool {
        self.kind == CheckpointKind::ServiceNode
    }
}

/// One row of the network-specific hardcoded seed table consumed by
/// `init` (§4.2, §6 "Network-parameter table"). `cumulative_difficulty`
/// is validated against at seed time but, per the data model (§3), is
/// not part of the stored `Checkpoint` itself.
#[derive(Debug, Clone, Copy)]
pub struct HardcodedSeed {
    pub height: u64,
    pub block_hash: [u8; 32],
    pub cumulative_difficulty: u128,
}
