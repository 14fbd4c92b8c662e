//! The pure reward-split and coinbase-matching algorithms (§4.1
//! `calculate_rewards` / `validate_batch_payment`). Neither function
//! touches storage: `BatchLedger` wires them to the durable store.

use crate::{Error, Result};
use chain_params::{Address, BlockView, ContributorView, CoinbaseOutput, OutputKey};

/// Splits a block's reward across its winning service node's contributors
/// (§4.1 step-by-step algorithm).
///
/// Floor-division is used throughout; the rounding remainder always lands
/// on the operator, never on a staker, so the sum is exact by
/// construction rather than by chance (checked at the end regardless,
/// since that exactness is a consensus invariant).
pub fn calculate_rewards(
    block: &BlockView,
    contributors: &[ContributorView],
) -> Result<Vec<(Address, u64)>> {
    if contributors.is_empty() {
        return Ok(Vec::new());
    }

    let reward = block.reward;
    let total_stake = contributors[0].stake_denominator;

    let operator_index = contributors.iter().position(|c| c.is_operator).unwrap_or(0);
    let operator = &contributors[operator_index];

    let operator_portion = proportional_share(reward, operator.stake_numerator, total_stake);
    let stakers_portion = reward.saturating_sub(operator_portion);

    let operator_fee = proportional_share(
        stakers_portion,
        operator.operator_fee_numerator,
        operator.operator_fee_denominator.max(1),
    );
    let remaining = stakers_portion.saturating_sub(operator_fee);

    let non_operator_stake: u64 = contributors
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != operator_index)
        .map(|(_, c)| c.stake_numerator)
        .sum();

    let mut outputs: Vec<(Address, u64)> = Vec::with_capacity(contributors.len());
    let mut distributed = 0u64;

    if non_operator_stake > 0 {
        for (i, contributor) in contributors.iter().enumerate() {
            if i == operator_index {
                continue;
            }
            let share =
                proportional_share(remaining, contributor.stake_numerator, non_operator_stake);
            distributed = distributed.saturating_add(share);
            outputs.push((contributor.address.clone(), share));
        }
    }

    let operator_total = operator_portion
        .saturating_add(operator_fee)
        .saturating_add(remaining.saturating_sub(distributed));
    outputs.push((operator.address.clone(), operator_total));

    let actual: u64 = outputs.iter().map(|(_, amount)| *amount).sum();
    if actual != reward {
        return Err(Error::RewardSplitMismatch { expected: reward, actual });
    }

    Ok(outputs)
}

fn proportional_share(amount: u64, numerator: u64, denominator: u64) -> u64 {
    if denominator == 0 {
        return 0;
    }
    ((u128::from(amount) * u128::from(numerator)) / u128::from(denominator)) as u64
}

/// Checks that `vouts` pays exactly the multiset of `(output_key, amount)`
/// pairs implied by `calculated`, ignoring order, and ignoring any vout
/// matching the governance key when `governance_key` is supplied (§4.1
/// `validate_batch_payment` / `is_governance_payment`).
pub fn check_coinbase_matches<F>(
    vouts: &[CoinbaseOutput],
    calculated: &[(Address, u64)],
    governance_key: Option<OutputKey>,
    derive: F,
    block_height: u64,
) -> Result<()>
where
    F: Fn(&Address) -> OutputKey,
{
    let mut expected: Vec<(OutputKey, u64)> =
        calculated.iter().map(|(addr, amount)| (derive(addr), *amount)).collect();

    for vout in vouts {
        if governance_key.is_some_and(|key| is_governance_payment(vout, key)) {
            continue;
        }
        match expected.iter().position(|(key, amount)| *key == vout.key && *amount == vout.amount)
        {
            Some(idx) => {
                expected.remove(idx);
            }
            None => {
                return Err(Error::CoinbaseMismatch {
                    height: block_height,
                    reason: format!("unexpected coinbase output of {} atomic units", vout.amount),
                });
            }
        }
    }

    if !expected.is_empty() {
        return Err(Error::CoinbaseMismatch {
            height: block_height,
            reason: format!("{} calculated payout(s) missing from coinbase", expected.len()),
        });
    }

    Ok(())
}

/// True when `vout` pays the governance address's derived key.
pub fn is_governance_payment(vout: &CoinbaseOutput, governance_key: OutputKey) -> bool {
    vout.key == governance_key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contributor(address: &str, stake_numerator: u64, is_operator: bool) -> ContributorView {
        ContributorView {
            address: Address::from_trusted(address),
            stake_numerator,
            stake_denominator: 100,
            is_operator,
            operator_fee_numerator: 10,
            operator_fee_denominator: 100,
        }
    }

    #[test]
    fn single_operator_receives_entire_reward() {
        let block = BlockView { height: 1, major_version: 13, reward: 1000, coinbase_outputs: vec![] };
        let contributors = vec![contributor("op", 100, true)];
        let split = calculate_rewards(&block, &contributors).unwrap();
        assert_eq!(split, vec![(Address::from_trusted("op"), 1000)]);
    }

    #[test]
    fn split_sums_to_exact_reward() {
        let block = BlockView { height: 1, major_version: 13, reward: 1_000_000_007, coinbase_outputs: vec![] };
        let contributors = vec![
            contributor("op", 40, true),
            contributor("a", 30, false),
            contributor("b", 30, false),
        ];
        let split = calculate_rewards(&block, &contributors).unwrap();
        let total: u64 = split.iter().map(|(_, a)| a).sum();
        assert_eq!(total, block.reward);
    }

    #[test]
    fn remainder_lands_on_operator() {
        let block = BlockView { height: 1, major_version: 13, reward: 10, coinbase_outputs: vec![] };
        let contributors = vec![
            contributor("op", 34, true),
            contributor("a", 33, false),
            contributor("b", 33, false),
        ];
        let split = calculate_rewards(&block, &contributors).unwrap();
        let operator_total = split.iter().find(|(addr, _)| addr.as_str() == "op").unwrap().1;
        let others_total: u64 =
            split.iter().filter(|(addr, _)| addr.as_str() != "op").map(|(_, a)| a).sum();
        assert_eq!(operator_total + others_total, 10);
    }
}
