//! `sled`-backed [`KvEngine`] (the default durable backend; see
//! `DESIGN.md` for why this repository uses `sled` rather than the
//! teacher's `rocksdb`).

use crate::engine::{KvEngine, Op};
use crate::Result;

pub struct SledEngine {
    db: sled::Db,
}

impl SledEngine {
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// Opens a temporary database, useful for scenario tests that need
    /// real durability semantics rather than the in-memory engine.
    pub fn open_temp(dir: &tempfile::TempDir) -> Result<Self> {
        Self::open(dir.path().join("db"))
    }
}

impl KvEngine for SledEngine {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.db.get(key)?.map(|v| v.to_vec()))
    }

    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        self.db
            .scan_prefix(prefix)
            .map(|entry| {
                let (k, v) = entry?;
                Ok((k.to_vec(), v.to_vec()))
            })
            .collect()
    }

    fn apply(&self, ops: Vec<Op>) -> Result<()> {
        let mut batch = sled::Batch::default();
        for op in ops {
            match op {
                Op::Put(k, v) => batch.insert(k, v),
                Op::Delete(k) => batch.remove(k),
            }
        }
        self.db.apply_batch(batch)?;
        self.db.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Store;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(SledEngine::open(dir.path()).unwrap());

        let mut txn = store.begin();
        txn.put(b"k".to_vec(), b"v".to_vec());
        txn.commit().await.unwrap();

        assert_eq!(store.get(b"k".to_vec()).await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn dropped_transaction_does_not_persist() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(SledEngine::open(dir.path()).unwrap());

        {
            let mut txn = store.begin();
            txn.put(b"k".to_vec(), b"v".to_vec());
            // dropped without commit
        }

        assert_eq!(store.get(b"k".to_vec()).await.unwrap(), None);
    }
}
