//! Scenario tests for the batch ledger (§8 scenarios S1-S4, S6).

use batch_ledger::{BatchLedger, LedgerConfig};
use chain_params::{Address, BlockView, CoinbaseOutput, ContributorView, OutputKey};
use storage::{MemoryEngine, SledEngine, Store};

fn contributor(address: &str, stake: u64, denom: u64, is_operator: bool) -> ContributorView {
    ContributorView {
        address: Address::from_trusted(address),
        stake_numerator: stake,
        stake_denominator: denom,
        is_operator,
        operator_fee_numerator: 10,
        operator_fee_denominator: 100,
    }
}

fn derive(address: &Address) -> OutputKey {
    let mut bytes = [0u8; 32];
    let text = address.as_str().as_bytes();
    let n = text.len().min(32);
    bytes[..n].copy_from_slice(&text[..n]);
    OutputKey::PublicKey(bytes)
}

fn ledger(config: LedgerConfig) -> BatchLedger<MemoryEngine> {
    BatchLedger::new(Store::new(MemoryEngine::new()), config)
}

#[tokio::test]
async fn s1_single_winner_accrues_full_reward_no_payout() {
    // Threshold set above the single block's reward so the accrual is
    // guaranteed not due yet, independent of where this address's
    // deterministic payout offset happens to land in the cadence.
    let config = LedgerConfig { payout_interval: 20, minimum_payout_threshold: 16_500_000_001 };
    let ledger = ledger(config);
    ledger.update_height(1_000_000).await.unwrap();

    let contributors = vec![contributor("sn-operator", 100, 100, true)];
    let block = BlockView { height: 1_000_000, major_version: 13, reward: 16_500_000_000, coinbase_outputs: vec![] };

    ledger.add_block(&block, &contributors, None, derive).await.unwrap();

    let amount = ledger.retrieve_amount_by_address(&Address::from_trusted("sn-operator")).await.unwrap();
    assert_eq!(amount, Some(16_500_000_000));
}

#[tokio::test]
async fn s2_split_with_remainder_sums_exactly() {
    // Threshold above the whole block reward: no single address's share
    // can be due yet, so the empty coinbase below is always valid.
    let ledger = ledger(LedgerConfig { payout_interval: 20, minimum_payout_threshold: 1001 });
    ledger.update_height(1).await.unwrap();

    let contributors = vec![
        contributor("operator", 34, 100, true),
        contributor("staker-a", 33, 100, false),
        contributor("staker-b", 33, 100, false),
    ];
    let block = BlockView { height: 1, major_version: 13, reward: 1000, coinbase_outputs: vec![] };
    ledger.add_block(&block, &contributors, None, derive).await.unwrap();

    let operator = ledger.retrieve_amount_by_address(&Address::from_trusted("operator")).await.unwrap().unwrap();
    let a = ledger.retrieve_amount_by_address(&Address::from_trusted("staker-a")).await.unwrap().unwrap();
    let b = ledger.retrieve_amount_by_address(&Address::from_trusted("staker-b")).await.unwrap().unwrap();
    assert_eq!(operator + a + b, 1000);
}

#[tokio::test]
async fn s3_payout_emitted_once_threshold_and_cadence_align() {
    let config = LedgerConfig { payout_interval: 1, minimum_payout_threshold: 100 };
    let ledger = ledger(config);
    ledger.update_height(0).await.unwrap();

    let contributors = vec![contributor("operator", 100, 100, true)];

    let block0 = BlockView { height: 0, major_version: 13, reward: 50, coinbase_outputs: vec![] };
    ledger.add_block(&block0, &contributors, None, derive).await.unwrap();
    assert_eq!(
        ledger.retrieve_amount_by_address(&Address::from_trusted("operator")).await.unwrap(),
        Some(50)
    );

    let due = ledger.get_sn_payments(1).await.unwrap();
    assert!(due.is_empty(), "below threshold, nothing due yet");

    let block1 = BlockView {
        height: 1,
        major_version: 13,
        reward: 60,
        coinbase_outputs: vec![CoinbaseOutput { key: derive(&Address::from_trusted("operator")), amount: 110 }],
    };
    ledger.add_block(&block1, &contributors, None, derive).await.unwrap();

    assert_eq!(ledger.retrieve_amount_by_address(&Address::from_trusted("operator")).await.unwrap(), None);
}

#[tokio::test]
async fn s4_coinbase_mismatch_rejects_block() {
    let config = LedgerConfig { payout_interval: 1, minimum_payout_threshold: 1 };
    let ledger = ledger(config);
    ledger.update_height(0).await.unwrap();

    let contributors = vec![contributor("a", 100, 100, true)];
    let block = BlockView {
        height: 0,
        major_version: 13,
        reward: 500,
        coinbase_outputs: vec![CoinbaseOutput { key: derive(&Address::from_trusted("a")), amount: 499 }],
    };

    let err = ledger.add_block(&block, &contributors, None, derive).await.unwrap_err();
    assert!(matches!(err, batch_ledger::Error::CoinbaseMismatch { .. }));
}

#[tokio::test]
async fn s6_reorg_pops_blocks_back_to_restored_state() {
    // Threshold above the accumulated total across both blocks: nothing
    // is ever due, so the empty coinbases below stay valid regardless of
    // where this address's deterministic payout offset falls.
    let ledger = ledger(LedgerConfig { payout_interval: 20, minimum_payout_threshold: 301 });
    ledger.update_height(998).await.unwrap();

    let contributors = vec![contributor("op", 100, 100, true)];
    let block_998 = BlockView { height: 998, major_version: 13, reward: 100, coinbase_outputs: vec![] };
    let block_999 = BlockView { height: 999, major_version: 13, reward: 200, coinbase_outputs: vec![] };

    ledger.add_block(&block_998, &contributors, None, derive).await.unwrap();
    let after_998 = ledger.retrieve_amount_by_address(&Address::from_trusted("op")).await.unwrap().unwrap();

    ledger.add_block(&block_999, &contributors, None, derive).await.unwrap();
    assert_eq!(ledger.height().await.unwrap(), 1000);

    ledger.pop_block(&block_999, &contributors).await.unwrap();
    assert_eq!(ledger.height().await.unwrap(), 999);
    assert_eq!(
        ledger.retrieve_amount_by_address(&Address::from_trusted("op")).await.unwrap(),
        Some(after_998)
    );

    ledger.pop_block(&block_998, &contributors).await.unwrap();
    assert_eq!(ledger.height().await.unwrap(), 998);
}

/// Same accrual path as S1, but against the real `sled` backend instead
/// of the in-memory engine, so a reopened database still sees the
/// committed accrual — the durability guarantee §6's "Durable store"
/// section requires, not just the transactional-overlay semantics the
/// in-memory engine happens to share.
#[tokio::test]
async fn accrual_survives_a_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = LedgerConfig { payout_interval: 20, minimum_payout_threshold: u64::MAX };

    {
        let ledger = BatchLedger::new(Store::new(SledEngine::open(dir.path()).unwrap()), config);
        ledger.update_height(100).await.unwrap();
        let contributors = vec![contributor("operator", 100, 100, true)];
        let block = BlockView { height: 100, major_version: 13, reward: 1_000, coinbase_outputs: vec![] };
        ledger.add_block(&block, &contributors, None, derive).await.unwrap();
    }

    let reopened = BatchLedger::new(Store::new(SledEngine::open(dir.path()).unwrap()), config);
    assert_eq!(reopened.height().await.unwrap(), 101);
    assert_eq!(
        reopened.retrieve_amount_by_address(&Address::from_trusted("operator")).await.unwrap(),
        Some(1_000)
    );
}
