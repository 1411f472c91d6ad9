use std::borrow::Cow;

use log::debug;

use crate::error::MoneyError;
use crate::log::log_allocation;
use crate::money::Money;

/// Splits `amount` between parties in proportion to `weights`.
///
/// The result has one entry per weight and always sums to `amount`.
/// Each share is `amount * w / Σw` truncated toward zero; the sub-units lost
/// to truncation are then handed out one at a time to the parties with a
/// non-zero weight, walking from the first party to the last and wrapping
/// around if needed. Negative amounts mirror positive ones exactly.
///
/// If every weight is zero the parties are treated as equally weighted.
/// `weights` itself is never modified.
///
/// Shares are computed on `u128` magnitudes, which hold `|i64::MIN| * u64::MAX`
/// without loss, so there is no overflow case for any input.
///
/// # Panics
///
/// Panics if the allocations do not add back up to `amount`. That can only
/// happen through a bug in this function and is never a caller error.
pub fn allocate(amount: Money, weights: &[u64]) -> Result<Vec<Money>, MoneyError> {
    if weights.is_empty() {
        return Err(MoneyError::EmptyWeights);
    }

    let weights = normalize_weights(weights);
    let sum: u128 = weights.iter().map(|&w| u128::from(w)).sum();
    let magnitude = u128::from(amount.as_i64().unsigned_abs());
    let negative = amount.is_negative();

    let mut allocations: Vec<Money> = weights
        .iter()
        .map(|&w| {
            // Division of magnitudes truncates toward zero for either sign.
            let share = (magnitude * u128::from(w) / sum) as i128;
            Money::from_i128_clamped(if negative { -share } else { share })
        })
        .collect();

    let provisional: i128 = allocations.iter().map(|m| i128::from(m.as_i64())).sum();
    let remainder = i128::from(amount.as_i64()) - provisional;
    distribute_remainder(&mut allocations, &weights, remainder);

    let allocated: i128 = allocations.iter().map(|m| i128::from(m.as_i64())).sum();
    if allocated != i128::from(amount.as_i64()) {
        panic!(
            "dough: bad allocation. Started with {amount} sub-units, allocated {allocated} as {allocations:?}. Weights={weights:?}"
        );
    }

    debug!(
        "allocate amount={} weights={:?} remainder={} allocations={:?}",
        amount, weights, remainder, allocations
    );
    log_allocation(amount, &weights, &allocations, remainder);
    Ok(allocations)
}

/// Splits `amount` evenly between `parties`, earlier parties taking the spare
/// sub-units.
pub fn allocate_evenly(amount: Money, parties: usize) -> Result<Vec<Money>, MoneyError> {
    allocate(amount, &vec![1; parties])
}

impl Money {
    /// Method form of [`allocate`].
    pub fn share(self, weights: &[u64]) -> Result<Vec<Money>, MoneyError> {
        allocate(self, weights)
    }
}

fn normalize_weights(weights: &[u64]) -> Cow<'_, [u64]> {
    if weights.iter().all(|&w| w == 0) {
        debug!(
            "all {} weights are zero, falling back to an even split",
            weights.len()
        );
        Cow::Owned(vec![1; weights.len()])
    } else {
        Cow::Borrowed(weights)
    }
}

// Truncation leaves fewer spare sub-units than there are weighted parties, so
// a single pass over `funded` normally suffices; `cycle` covers the rest.
fn distribute_remainder(allocations: &mut [Money], weights: &[u64], remainder: i128) {
    if remainder == 0 {
        return;
    }
    let step = if remainder > 0 { 1 } else { -1 };
    let funded: Vec<usize> = weights
        .iter()
        .enumerate()
        .filter(|(_, &w)| w > 0)
        .map(|(idx, _)| idx)
        .collect();

    for &idx in funded.iter().cycle().take(remainder.unsigned_abs() as usize) {
        allocations[idx].0 += step;
    }
}
