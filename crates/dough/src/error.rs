use thiserror::Error;

/// Recoverable failures of the money operations.
///
/// A broken allocation total is deliberately absent: that is a defect in the
/// allocator and panics instead of surfacing here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("weighting vector must contain at least one weight")]
    EmptyWeights,
    #[error("percentage must be >= 0 and <= 100, {0} given")]
    PercentageOutOfRange(i64),
    #[error("scaling {amount} by {factor} overflows i64")]
    Overflow { amount: i64, factor: i64 },
}

impl MoneyError {
    /// True for errors caused by caller-supplied arguments.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            MoneyError::EmptyWeights | MoneyError::PercentageOutOfRange(_)
        )
    }
}
