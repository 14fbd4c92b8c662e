//! Checkpoint registry (§4.2 of the specification).
//!
//! A pruned, monotonically-advancing set of `{height → block-hash}`
//! commitments bounding reorg depth. Hardcoded checkpoints seed the
//! registry at startup; service-node checkpoints arrive at runtime via
//! consensus. Both are immutable once stored — the registry only ever
//! deletes a row, never edits one (§3 "Lifecycle").

mod error;
mod registry;
mod types;

pub use error::{Error, Result};
pub use registry::CheckpointRegistry;
pub use types::{Checkpoint, CheckpointKind, CheckpointVote, HardcodedSeed};
