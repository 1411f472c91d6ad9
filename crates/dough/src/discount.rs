use serde::{Deserialize, Serialize};

use crate::allocate::allocate;
use crate::error::MoneyError;
use crate::money::Money;

/// The two halves of a percentage discount. They always add up to the
/// original amount.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discount {
    pub discounted: Money,
    pub saved: Money,
}

/// Takes `percentage` percent off `amount` by sharing it `100 - p : p`.
pub fn discount(amount: Money, percentage: i64) -> Result<Discount, MoneyError> {
    if !(0..=100).contains(&percentage) {
        return Err(MoneyError::PercentageOutOfRange(percentage));
    }
    let p = percentage as u64;
    let shares = allocate(amount, &[100 - p, p])?;
    Ok(Discount {
        discounted: shares[0],
        saved: shares[1],
    })
}

impl Money {
    /// Returns the amount left after taking `percentage` percent off.
    pub fn percentage_discount(self, percentage: i64) -> Result<Money, MoneyError> {
        discount(self, percentage).map(|d| d.discounted)
    }
}
