//! Exact proportional allocation of integer money amounts.
//!
//! Amounts are whole sub-units held in an `i64`. [`allocate`] splits an
//! amount by weight and guarantees the parts add back up to the whole; the
//! discount helpers are thin callers of it.

pub mod allocate;
pub mod discount;
pub mod error;
pub mod log;
pub mod money;
pub mod plan;

pub use allocate::{allocate, allocate_evenly};
pub use discount::{discount, Discount};
pub use error::MoneyError;
pub use money::Money;
pub use plan::{load_plan, parse_plan, PlanError, SplitCfg, SplitOutcome, SplitPlan};
