//! The transactional key-value abstraction both consensus crates build on
//! (§6 "Durable store (consumed)", §9 "Scoped transactions").
//!
//! [`KvEngine`] is the narrow, blocking trait a concrete backend
//! implements (mirrors the teacher's `StorageProvider`, but the
//! blocking/async boundary is pushed down to one place: [`Store`] bridges
//! every call onto a blocking-task pool via `tokio::task::spawn_blocking`,
//! matching the persistence crate's convention rather than making every
//! backend re-implement it).

use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// One buffered write, applied atomically when a [`Transaction`] commits.
#[derive(Debug, Clone)]
pub enum Op {
    Put(Vec<u8>, Vec<u8>),
    Delete(Vec<u8>),
}

/// The blocking storage primitive a concrete backend implements.
///
/// Implementations must apply `ops` atomically: either every op in the
/// batch lands, or none do. This is what lets [`Transaction::commit`]
/// promise all-or-nothing semantics without the engine itself knowing
/// anything about transactions.
pub trait KvEngine: Send + Sync + 'static {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>>;
    fn apply(&self, ops: Vec<Op>) -> Result<()>;
}

/// Async-facing handle over a [`KvEngine`], shared by every crate that
/// needs durable storage.
#[derive(Clone)]
pub struct Store<E> {
    engine: Arc<E>,
}

impl<E: KvEngine> Store<E> {
    pub fn new(engine: E) -> Self {
        Self { engine: Arc::new(engine) }
    }

    /// Point lookup, bypassing any open transaction. Used for diagnostic
    /// reads (`batching_count`, `retrieve_amount_by_address`) that the
    /// specification allows to run without an explicit transaction scope.
    pub async fn get(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.get(&key))
            .await
            .map_err(|e| Error::TaskJoin(e.to_string()))?
    }

    pub async fn scan_prefix(&self, prefix: Vec<u8>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.scan_prefix(&prefix))
            .await
            .map_err(|e| Error::TaskJoin(e.to_string()))?
    }

    /// Opens a write transaction. Every mutation is buffered locally and
    /// only reaches the backend when [`Transaction::commit`] is called;
    /// dropping the transaction without committing discards the buffer,
    /// which is the rollback (§9 "Scoped transactions": commit on normal
    /// exit, rollback on early exit, guaranteed by construction since
    /// nothing was written yet).
    pub fn begin(&self) -> Transaction<E> {
        Transaction {
            store: self.clone(),
            ops: Vec::new(),
            overlay: HashMap::new(),
            committed: false,
        }
    }
}

/// A single write-transaction scope (§5 "single-writer by contract").
///
/// Reads made through the transaction see its own buffered writes before
/// falling back to the backend, so sequential reads-after-writes inside
/// one `add_block`/`pop_block` call observe a consistent view without a
/// round trip to the store.
pub struct Transaction<E> {
    store: Store<E>,
    ops: Vec<Op>,
    overlay: HashMap<Vec<u8>, Option<Vec<u8>>>,
    committed: bool,
}

impl<E: KvEngine> Transaction<E> {
    pub async fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(local) = self.overlay.get(key) {
            return Ok(local.clone());
        }
        self.store.get(key.to_vec()).await
    }

    pub async fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let mut rows: HashMap<Vec<u8>, Vec<u8>> = self
            .store
            .scan_prefix(prefix.to_vec())
            .await?
            .into_iter()
            .collect();

        for (key, value) in &self.overlay {
            if key.starts_with(prefix) {
                match value {
                    Some(v) => {
                        rows.insert(key.clone(), v.clone());
                    }
                    None => {
                        rows.remove(key);
                    }
                }
            }
        }

        let mut rows: Vec<(Vec<u8>, Vec<u8>)> = rows.into_iter().collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(rows)
    }

    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.overlay.insert(key.clone(), Some(value.clone()));
        self.ops.push(Op::Put(key, value));
    }

    pub fn delete(&mut self, key: Vec<u8>) {
        self.overlay.insert(key.clone(), None);
        self.ops.push(Op::Delete(key));
    }

    /// Applies every buffered op atomically and consumes the transaction.
    pub async fn commit(mut self) -> Result<()> {
        if self.committed {
            return Err(Error::AlreadyCommitted);
        }
        let ops = std::mem::take(&mut self.ops);
        self.committed = true;
        let engine = self.store.engine.clone();
        tokio::task::spawn_blocking(move || engine.apply(ops))
            .await
            .map_err(|e| Error::TaskJoin(e.to_string()))?
    }
}

impl<E> Drop for Transaction<E> {
    fn drop(&mut self) {
        if !self.committed && !self.ops.is_empty() {
            tracing::debug!(ops = self.ops.len(), "rolling back uncommitted transaction");
        }
    }
}
