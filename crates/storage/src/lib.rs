//! Transactional durable storage shared by the batch ledger and the
//! checkpoint registry (§6, §9 of the specification).
//!
//! The public surface is deliberately small: [`Store`] opens
//! [`Transaction`]s over whatever [`KvEngine`] the host picked. Two
//! engines ship here — [`SledEngine`] for real durability and
//! [`MemoryEngine`] for tests — and both crates downstream are generic
//! over `KvEngine`, so a host can plug in another backend without
//! touching consensus code.

mod codec;
mod engine;
mod error;
mod memory;
mod sled_engine;

pub use codec::{decode, encode};
pub use engine::{KvEngine, Op, Store, Transaction};
pub use error::Error;
pub use memory::MemoryEngine;
pub use sled_engine::SledEngine;

pub type Result<T> = std::result::Result<T, Error>;
