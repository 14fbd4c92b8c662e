//! [`CheckpointRegistry`]: the stateful half of §4.2 — storage-backed
//! checkpoint bookkeeping plus the cull sweep and the immutable-height
//! cache.

use crate::error::{Error, Result};
use crate::types::{Checkpoint, CheckpointKind, HardcodedSeed};
use chain_params::{
    NetworkKind, CHECKPOINT_INTERVAL, CHECKPOINT_STORE_PERSISTENTLY_INTERVAL, MIN_CHECKPOINT_VERSION,
};
use std::sync::atomic::{AtomicU64, Ordering};
use storage::{decode, encode, KvEngine, Store};

const CHECKPOINT_PREFIX: &[u8] = b"checkpoint/";

fn checkpoint_key(height: u64) -> Vec<u8> {
    [CHECKPOINT_PREFIX, &height.to_be_bytes()[..]].concat()
}

fn height_from_key(key: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&key[CHECKPOINT_PREFIX.len()..]);
    u64::from_be_bytes(buf)
}

/// Pruned, monotonically-advancing set of `{height → block-hash}`
/// commitments (§4.2). Single-writer by contract (§5): the host
/// serialises `add_checkpoint`/`block_added`/`blockchain_detached`.
pub struct CheckpointRegistry<E> {
    store: Store<E>,
    network: NetworkKind,
    m_last_cull_height: AtomicU64,
    m_immutable_height: AtomicU64,
}

impl<E: KvEngine> CheckpointRegistry<E> {
    /// `init` (§4.2): seeds the hardcoded checkpoint table. A duplicate
    /// height whose hash matches is a no-op; a mismatching hash is a
    /// fatal error, since that would mean the binary's own seed table
    /// disagrees with what's already durable.
    pub async fn init(network: NetworkKind, store: Store<E>, seeds: &[HardcodedSeed]) -> Result<Self> {
        let registry = Self {
            store,
            network,
            m_last_cull_height: AtomicU64::new(0),
            m_immutable_height: AtomicU64::new(0),
        };
        for seed in seeds {
            registry.seed_hardcoded(seed).await?;
        }
        Ok(registry)
    }

    async fn seed_hardcoded(&self, seed: &HardcodedSeed) -> Result<()> {
        if seed.height % CHECKPOINT_INTERVAL != 0 {
            return Err(Error::NotIntervalAligned { height: seed.height });
        }
        if let Some(existing) = self.get_checkpoint(seed.height).await? {
            if existing.block_hash == seed.block_hash {
                return Ok(());
            }
            return Err(Error::Conflict { height: seed.height });
        }
        self.store_checkpoint(&Checkpoint::hardcoded(seed.height, seed.block_hash)).await
    }

    async fn store_checkpoint(&self, checkpoint: &Checkpoint) -> Result<()> {
        let mut txn = self.store.begin();
        txn.put(checkpoint_key(checkpoint.height), encode(checkpoint)?);
        txn.commit().await?;
        Ok(())
    }

    async fn delete_checkpoint(&self, height: u64) -> Result<()> {
        let mut txn = self.store.begin();
        txn.delete(checkpoint_key(height));
        txn.commit().await?;
        Ok(())
    }

    /// `add_checkpoint` (§4.2): parses hex, stores as `Hardcoded`.
    /// `difficulty_hex` is validated for well-formedness (a malformed
    /// operator-supplied value is an input error) but, like the seed
    /// table's `cumulative_difficulty`, is not persisted on the row.
    pub async fn add_checkpoint(&self, height: u64, hash_hex: &str, difficulty_hex: &str) -> Result<()> {
        if height % CHECKPOINT_INTERVAL != 0 {
            return Err(Error::NotIntervalAligned { height });
        }
        let block_hash = parse_hash(hash_hex)?;
        let _difficulty = u128::from_str_radix(difficulty_hex.trim_start_matches("0x"), 16)
            .map_err(|e| Error::HexDecode(e.to_string()))?;

        if let Some(existing) = self.get_checkpoint(height).await? {
            if existing.block_hash == block_hash {
                return Ok(());
            }
            return Err(Error::Conflict { height });
        }

        self.store_checkpoint(&Checkpoint::hardcoded(height, block_hash)).await
    }

    /// `get_checkpoint` (§4.2): single-row lookup.
    pub async fn get_checkpoint(&self, height: u64) -> Result<Option<Checkpoint>> {
        match self.store.get(checkpoint_key(height)).await? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// `check_block` (§4.2): `ok` is true whenever no checkpoint pins
    /// `height`; otherwise it's whether `hash` matches the stored one.
    pub async fn check_block(&self, height: u64, hash: &[u8; 32]) -> Result<(bool, bool, bool)> {
        match self.get_checkpoint(height).await? {
            None => Ok((true, false, false)),
            Some(cp) => Ok((cp.block_hash == *hash, true, cp.is_service_node())),
        }
    }

    /// `is_in_checkpoint_zone` (§4.2): true iff `height` is at or below
    /// the top stored checkpoint.
    pub async fn is_in_checkpoint_zone(&self, height: u64) -> Result<bool> {
        let top = self.get_max_height().await?;
        Ok(top > 0 && height <= top)
    }

    /// `get_max_height` (§4.2 expansion): height of the top stored
    /// checkpoint, `0` if none exist.
    pub async fn get_max_height(&self) -> Result<u64> {
        let rows = self.store.scan_prefix(CHECKPOINT_PREFIX.to_vec()).await?;
        Ok(rows.last().map(|(k, _)| height_from_key(k)).unwrap_or(0))
    }

    /// Whether any stored checkpoint sits at or below `height` — used to
    /// short-circuit `is_alternative_block_allowed` before a chain has
    /// accumulated any checkpoints at all.
    async fn has_checkpoint_at_or_below(&self, height: u64) -> Result<bool> {
        let rows = self.store.scan_prefix(CHECKPOINT_PREFIX.to_vec()).await?;
        Ok(rows.iter().any(|(k, _)| height_from_key(k) <= height))
    }

    /// The highest height `<= height` that is fixed by checkpoint rules
    /// (§3 "Immutable height"): either a `Hardcoded` checkpoint, or the
    /// older of two successive `ServiceNode` checkpoints spaced one
    /// `CHECKPOINT_INTERVAL` apart.
    pub async fn immutable_checkpoint(&self, height: u64) -> Result<Option<Checkpoint>> {
        if height == 0 {
            return Ok(None);
        }
        let mut h = (height / CHECKPOINT_INTERVAL) * CHECKPOINT_INTERVAL;
        loop {
            if let Some(cp) = self.get_checkpoint(h).await? {
                if cp.kind == CheckpointKind::Hardcoded {
                    return Ok(Some(cp));
                }
                if h >= CHECKPOINT_INTERVAL {
                    if let Some(prev) = self.get_checkpoint(h - CHECKPOINT_INTERVAL).await? {
                        if prev.kind == CheckpointKind::ServiceNode {
                            return Ok(Some(prev));
                        }
                    }
                }
            }
            if h < CHECKPOINT_INTERVAL {
                return Ok(None);
            }
            h -= CHECKPOINT_INTERVAL;
        }
    }

    /// `is_alternative_block_allowed` (§4.2): conservative gate on where
    /// an alternative chain may fork from. `m_immutable_height` only
    /// ever advances (§5, §8 invariant 7).
    pub async fn is_alternative_block_allowed(
        &self,
        chain_height: u64,
        block_height: u64,
    ) -> Result<(bool, bool)> {
        if block_height == 0 {
            return Ok((false, false));
        }

        if !self.has_checkpoint_at_or_below(chain_height).await? {
            return Ok((true, false));
        }

        let immutable_cp = self.immutable_checkpoint(chain_height).await?;
        let immutable = immutable_cp.as_ref().map(|cp| cp.height).unwrap_or(0);
        let is_sn_checkpoint = immutable_cp.is_some_and(|cp| cp.is_service_node());
        self.m_immutable_height.fetch_max(immutable, Ordering::AcqRel);
        let cached = self.m_immutable_height.load(Ordering::Acquire);

        Ok((block_height > cached, is_sn_checkpoint))
    }

    /// `block_added` (§4.2): runs the cull sweep, then stores
    /// `checkpoint` if the host supplied one for this block.
    pub async fn block_added(&self, height: u64, major_version: u8, checkpoint: Option<Checkpoint>) -> Result<()> {
        self.cull(height, major_version).await;
        if let Some(cp) = checkpoint {
            self.store_checkpoint(&cp).await?;
        }
        Ok(())
    }

    /// The cull sweep (§4.2 "Cull algorithm"). Store failures during
    /// culling are logged and non-fatal — the sweep will simply retry
    /// the same range on the next block (§7 propagation policy).
    async fn cull(&self, height: u64, major_version: u8) {
        if height < CHECKPOINT_STORE_PERSISTENTLY_INTERVAL || major_version < MIN_CHECKPOINT_VERSION {
            return;
        }

        let end = match self.immutable_checkpoint(height + 1).await {
            Ok(cp) => cp.map(|c| c.height).unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "cull: failed to compute immutable height, skipping sweep");
                return;
            }
        };

        let persist_interval = CHECKPOINT_STORE_PERSISTENTLY_INTERVAL;
        let start_raw = if end < persist_interval { 0 } else { end - persist_interval };
        let start = round_up(start_raw, CHECKPOINT_INTERVAL);

        let last_cull = self.m_last_cull_height.load(Ordering::Acquire);
        let new_last_cull = last_cull.max(start);
        self.m_last_cull_height.store(new_last_cull, Ordering::Release);

        let mut h = new_last_cull;
        while h < end {
            if h % persist_interval != 0 {
                if let Err(e) = self.delete_checkpoint(h).await {
                    tracing::warn!(height = h, error = %e, "cull: delete failed, will retry next block");
                }
            }
            h += CHECKPOINT_INTERVAL;
        }
    }

    /// `blockchain_detached` (§4.2): removes every stored checkpoint at
    /// or above `height`, and lowers `m_last_cull_height` so the cull
    /// watermark doesn't skip the newly re-created space above `height`.
    pub async fn blockchain_detached(&self, height: u64) -> Result<()> {
        let top = self.get_max_height().await?;
        if top >= height {
            let mut h = top;
            loop {
                self.delete_checkpoint(h).await?;
                if h < CHECKPOINT_INTERVAL || h - CHECKPOINT_INTERVAL < height {
                    break;
                }
                h -= CHECKPOINT_INTERVAL;
            }
        }

        let floor = (height / CHECKPOINT_INTERVAL) * CHECKPOINT_INTERVAL;
        self.m_last_cull_height.fetch_min(floor, Ordering::AcqRel);
        Ok(())
    }

    pub fn network(&self) -> NetworkKind {
        self.network
    }
}

fn round_up(value: u64, multiple: u64) -> u64 {
    if multiple == 0 {
        return value;
    }
    value.div_ceil(multiple) * multiple
}

fn parse_hash(hex_str: &str) -> Result<[u8; 32]> {
    let bytes = hex::decode(hex_str).map_err(|e| Error::HexDecode(e.to_string()))?;
    if bytes.len() != 32 {
        return Err(Error::HashLength { actual: bytes.len() });
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}
