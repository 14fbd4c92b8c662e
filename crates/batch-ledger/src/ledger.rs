//! [`BatchLedger`]: the transactional orchestration around the pure
//! helpers in [`crate::rewards`] and [`crate::rows`] (§4.1 "State
//! machine"). Every block-mutating call is one [`storage::Transaction`];
//! nothing here is committed piecemeal.

use crate::config::LedgerConfig;
use crate::error::{Error, Result};
use crate::rewards::{calculate_rewards, check_coinbase_matches};
use crate::rows::{derive_payout_offset, is_due, AccrualRow, FinalisedPaymentRow};
use chain_params::{Address, BlockView, ContributorView, OutputKey};
use storage::{decode, encode, KvEngine, Store, Transaction};

const HEIGHT_KEY: &[u8] = b"ledger/height";
const ACCRUAL_PREFIX: &[u8] = b"ledger/accrual/";
const FINALISED_PREFIX: &[u8] = b"ledger/finalised/";

fn accrual_key(address: &Address) -> Vec<u8> {
    [ACCRUAL_PREFIX, address.as_str().as_bytes()].concat()
}

fn finalised_prefix_for_height(height: u64) -> Vec<u8> {
    [FINALISED_PREFIX, &height.to_be_bytes()[..], b"/"].concat()
}

fn finalised_key(height: u64, address: &Address) -> Vec<u8> {
    [finalised_prefix_for_height(height).as_slice(), address.as_str().as_bytes()].concat()
}

/// Durable per-address accrual ledger, generic over the storage backend
/// both `storage::SledEngine` and `storage::MemoryEngine` satisfy.
pub struct BatchLedger<E> {
    store: Store<E>,
    config: LedgerConfig,
}

impl<E: KvEngine> BatchLedger<E> {
    pub fn new(store: Store<E>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> LedgerConfig {
        self.config
    }

    /// The height the ledger expects its next `add_block` call to carry
    /// (§3 "Ledger height"). Zero when nothing has ever been written.
    pub async fn height(&self) -> Result<u64> {
        match self.store.get(HEIGHT_KEY.to_vec()).await? {
            Some(bytes) => Ok(decode(&bytes)?),
            None => Ok(0),
        }
    }

    /// Unconditional scalar move (§4.1 `update_height`). Used only for
    /// initial seeding — `add_block`/`pop_block` are the steady-state path.
    pub async fn update_height(&self, height: u64) -> Result<()> {
        let mut txn = self.store.begin();
        txn.put(HEIGHT_KEY.to_vec(), encode(&height)?);
        txn.commit().await?;
        Ok(())
    }

    pub async fn increment_height(&self) -> Result<u64> {
        let next = self.height().await?.checked_add(1).ok_or(Error::HeightMismatch {
            expected: u64::MAX,
            actual: u64::MAX,
        })?;
        self.update_height(next).await?;
        Ok(next)
    }

    pub async fn decrement_height(&self) -> Result<u64> {
        let current = self.height().await?;
        let next = current.checked_sub(1).ok_or(Error::HeightMismatch { expected: 0, actual: 0 })?;
        self.update_height(next).await?;
        Ok(next)
    }

    /// Read-only diagnostic accessor (§6a "Metrics"): the accrued balance
    /// for one address, or `None` if it has never accrued anything.
    pub async fn retrieve_amount_by_address(&self, address: &Address) -> Result<Option<u64>> {
        let row = self.load_row_untransacted(address).await?;
        Ok(row.map(|r| r.amount_accumulated))
    }

    /// Read-only diagnostic accessor: the number of addresses currently
    /// carrying an unpaid accrual.
    pub async fn batching_count(&self) -> Result<u64> {
        let rows = self.store.scan_prefix(ACCRUAL_PREFIX.to_vec()).await?;
        Ok(rows.len() as u64)
    }

    /// The payouts due in `block_height`'s coinbase, address-lexicographic
    /// (§4.1 `get_sn_payments`: a pure function of ledger state at entry).
    pub async fn get_sn_payments(&self, block_height: u64) -> Result<Vec<(Address, u64)>> {
        let txn = self.store.begin();
        let due = self.due_payments(&txn, block_height).await?;
        Ok(due)
    }

    async fn due_payments(
        &self,
        txn: &Transaction<E>,
        block_height: u64,
    ) -> Result<Vec<(Address, u64)>> {
        let rows = self.list_rows(txn).await?;
        let mut due: Vec<(Address, u64)> = rows
            .into_iter()
            .filter(|row| {
                is_due(row, block_height, self.config.payout_interval)
                    && row.amount_accumulated >= self.config.minimum_payout_threshold
            })
            .map(|row| (row.address, row.amount_accumulated))
            .collect();
        due.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(due)
    }

    async fn list_rows(&self, txn: &Transaction<E>) -> Result<Vec<AccrualRow>> {
        let raw = txn.scan_prefix(ACCRUAL_PREFIX).await?;
        raw.iter().map(|(_, v)| decode::<AccrualRow>(v).map_err(Error::from)).collect()
    }

    async fn load_row(&self, txn: &Transaction<E>, address: &Address) -> Result<Option<AccrualRow>> {
        match txn.get(&accrual_key(address)).await? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn load_row_untransacted(&self, address: &Address) -> Result<Option<AccrualRow>> {
        match self.store.get(accrual_key(address)).await? {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn save_row(&self, txn: &mut Transaction<E>, row: &AccrualRow) -> Result<()> {
        txn.put(accrual_key(&row.address), encode(row)?);
        Ok(())
    }

    /// `add_sn_payments` (§4.1): adds `amount` to each address's row,
    /// creating it with a deterministic `payout_offset` on first accrual.
    /// Overflow is a consensus error (§3 invariant 1 / §7).
    async fn add_sn_payments(
        &self,
        txn: &mut Transaction<E>,
        payments: &[(Address, u64)],
    ) -> Result<()> {
        for (address, amount) in payments {
            if *amount == 0 {
                continue;
            }
            let mut row = match self.load_row(txn, address).await? {
                Some(row) => row,
                None => AccrualRow {
                    address: address.clone(),
                    amount_accumulated: 0,
                    payout_offset: derive_payout_offset(address, self.config.payout_interval),
                    next_payout_height: 0,
                },
            };
            row.amount_accumulated =
                row.amount_accumulated.checked_add(*amount).ok_or_else(|| Error::AccrualOverflow {
                    address: address.as_str().to_string(),
                    amount: row.amount_accumulated,
                    addition: *amount,
                })?;
            self.save_row(txn, &row)?;
        }
        Ok(())
    }

    /// `subtract_sn_payments` (§4.1): subtracts per address; underflow is
    /// a consensus error. A row that reaches zero is deleted (§3
    /// invariant 4 — no finalised row can reference it within the same
    /// transaction, since finalised rows are written in the same commit).
    async fn subtract_sn_payments(
        &self,
        txn: &mut Transaction<E>,
        payments: &[(Address, u64)],
    ) -> Result<()> {
        for (address, amount) in payments {
            if *amount == 0 {
                continue;
            }
            let mut row = self.load_row(txn, address).await?.ok_or_else(|| {
                Error::AccrualUnderflow {
                    address: address.as_str().to_string(),
                    amount: 0,
                    subtraction: *amount,
                }
            })?;
            row.amount_accumulated =
                row.amount_accumulated.checked_sub(*amount).ok_or_else(|| {
                    Error::AccrualUnderflow {
                        address: address.as_str().to_string(),
                        amount: row.amount_accumulated,
                        subtraction: *amount,
                    }
                })?;
            if row.amount_accumulated == 0 {
                txn.delete(accrual_key(address));
            } else {
                self.save_row(txn, &row)?;
            }
        }
        Ok(())
    }

    async fn save_finalised(&self, txn: &mut Transaction<E>, row: &FinalisedPaymentRow) -> Result<()> {
        txn.put(finalised_key(row.block_height, &row.address), encode(row)?);
        Ok(())
    }

    async fn load_finalised_for_height(
        &self,
        txn: &Transaction<E>,
        height: u64,
    ) -> Result<Vec<FinalisedPaymentRow>> {
        let raw = txn.scan_prefix(&finalised_prefix_for_height(height)).await?;
        raw.iter().map(|(_, v)| decode::<FinalisedPaymentRow>(v).map_err(Error::from)).collect()
    }

    /// `validate_batch_payment` (§4.1): pure comparison between a block's
    /// coinbase and `calculated`, with no side effects on the ledger.
    /// `add_block` calls this before committing; a host may also call it
    /// standalone for pre-flight validation ahead of mining a block.
    pub fn validate_batch_payment(
        &self,
        block: &BlockView,
        calculated: &[(Address, u64)],
        governance_key: Option<OutputKey>,
        derive: impl Fn(&Address) -> OutputKey,
    ) -> Result<()> {
        check_coinbase_matches(&block.coinbase_outputs, calculated, governance_key, derive, block.height)
    }

    /// `add_block` (§4.1): one atomic transaction applying the computed
    /// reward split, validating and settling due payouts, and advancing
    /// the height scalar. Either every step commits or none do.
    pub async fn add_block(
        &self,
        block: &BlockView,
        contributors: &[ContributorView],
        governance_key: Option<OutputKey>,
        derive: impl Fn(&Address) -> OutputKey,
    ) -> Result<()> {
        let expected = self.height().await?;
        if block.height != expected {
            return Err(Error::HeightMismatch { expected, actual: block.height });
        }

        let mut txn = self.store.begin();

        let accrued = calculate_rewards(block, contributors)?;
        self.add_sn_payments(&mut txn, &accrued).await?;

        let due = self.due_payments(&txn, block.height).await?;
        self.validate_batch_payment(block, &due, governance_key, &derive)?;
        self.subtract_sn_payments(&mut txn, &due).await?;

        for (address, amount) in &due {
            let payout_offset = derive_payout_offset(address, self.config.payout_interval);
            self.save_finalised(
                &mut txn,
                &FinalisedPaymentRow {
                    address: address.clone(),
                    amount_paid: *amount,
                    payout_offset,
                    block_height: block.height,
                },
            )
            .await?;
        }

        txn.put(HEIGHT_KEY.to_vec(), encode(&(block.height + 1))?);
        txn.commit().await?;
        tracing::debug!(height = block.height, payouts = due.len(), "committed block to batch ledger");
        Ok(())
    }

    /// `pop_block` (§4.1): the exact inverse of `add_block`, so that
    /// `add_block(b); pop_block(b)` is the identity (§8 invariant 2).
    pub async fn pop_block(&self, block: &BlockView, contributors: &[ContributorView]) -> Result<()> {
        let expected = self.height().await?;
        if block.height + 1 != expected {
            return Err(Error::HeightMismatch { expected: block.height + 1, actual: expected });
        }

        let mut txn = self.store.begin();

        let finalised = self.load_finalised_for_height(&txn, block.height).await?;
        let restored: Vec<(Address, u64)> =
            finalised.iter().map(|row| (row.address.clone(), row.amount_paid)).collect();
        self.add_sn_payments(&mut txn, &restored).await?;
        for row in &finalised {
            txn.delete(finalised_key(row.block_height, &row.address));
        }

        let accrued = calculate_rewards(block, contributors)?;
        self.subtract_sn_payments(&mut txn, &accrued).await?;

        txn.put(HEIGHT_KEY.to_vec(), encode(&block.height)?);
        txn.commit().await?;
        tracing::debug!(height = block.height, "popped block from batch ledger");
        Ok(())
    }
}
