use std::collections::HashSet;
use std::fs;
use std::path::Path;

use blake3::Hasher;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::allocate::allocate;
use crate::discount::discount;
use crate::error::MoneyError;
use crate::money::Money;

pub const PLAN_VERSION: u32 = 1;

/// A batch of allocations read from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitPlan {
    pub version: u32,
    #[serde(rename = "split", default)]
    pub splits: Vec<SplitCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitCfg {
    pub label: String,
    pub amount_cents: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Vec<u64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parties: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_pct: Option<i64>,
}

/// One executed split, in plan order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitOutcome {
    pub label: String,
    pub amount: Money,
    pub parties: Vec<String>,
    pub weights: Vec<u64>,
    pub allocations: Vec<Money>,
}

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("failed to read split plan: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse split plan: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to hash split plan: {0}")]
    Hash(#[from] serde_json::Error),
    #[error("invalid split plan: {0}")]
    Invalid(String),
    #[error("split `{label}` failed: {source}")]
    Split {
        label: String,
        #[source]
        source: MoneyError,
    },
}

pub fn load_plan(path: impl AsRef<Path>) -> Result<SplitPlan, PlanError> {
    let raw = fs::read_to_string(path)?;
    parse_plan(&raw)
}

pub fn parse_plan(raw: &str) -> Result<SplitPlan, PlanError> {
    let plan: SplitPlan = toml::from_str(raw)?;
    plan.validate()?;
    let hash = plan.schema_hash()?;
    info!("plan_schema_hash={hash} splits={}", plan.splits.len());
    Ok(plan)
}

impl SplitPlan {
    /// blake3 over the plan's JSON form, hex encoded.
    pub fn schema_hash(&self) -> Result<String, PlanError> {
        let bytes = serde_json::to_vec(self)?;
        let mut hasher = Hasher::new();
        hasher.update(&bytes);
        Ok(hasher.finalize().to_hex().to_string())
    }

    pub fn validate(&self) -> Result<(), PlanError> {
        if self.version != PLAN_VERSION {
            return Err(PlanError::Invalid(format!(
                "unsupported version {}, expected {PLAN_VERSION}",
                self.version
            )));
        }

        let mut seen = HashSet::new();
        for split in &self.splits {
            if split.label.trim().is_empty() {
                return Err(PlanError::Invalid("split label must not be empty".into()));
            }
            if !seen.insert(split.label.as_str()) {
                return Err(PlanError::Invalid(format!(
                    "duplicate split label `{}`",
                    split.label
                )));
            }
            match (&split.weights, split.discount_pct) {
                (Some(_), Some(_)) => {
                    return Err(PlanError::Invalid(format!(
                        "split `{}` sets both weights and discount_pct",
                        split.label
                    )))
                }
                (None, None) => {
                    return Err(PlanError::Invalid(format!(
                        "split `{}` needs weights or discount_pct",
                        split.label
                    )))
                }
                (Some(weights), None) => {
                    if let Some(parties) = &split.parties {
                        if parties.len() != weights.len() {
                            return Err(PlanError::Invalid(format!(
                                "split `{}` names {} parties for {} weights",
                                split.label,
                                parties.len(),
                                weights.len()
                            )));
                        }
                    }
                }
                (None, Some(_)) => {
                    if split.parties.is_some() {
                        return Err(PlanError::Invalid(format!(
                            "split `{}` cannot name parties for a discount",
                            split.label
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Executes every split in order, stopping at the first failure.
    pub fn run(&self) -> Result<Vec<SplitOutcome>, PlanError> {
        self.splits.iter().map(SplitCfg::run).collect()
    }
}

impl SplitCfg {
    pub fn run(&self) -> Result<SplitOutcome, PlanError> {
        let amount = Money(self.amount_cents);
        let wrap = |source| PlanError::Split {
            label: self.label.clone(),
            source,
        };

        let (parties, weights, allocations) = match (&self.weights, self.discount_pct) {
            (_, Some(pct)) => {
                let d = discount(amount, pct).map_err(wrap)?;
                let p = pct as u64;
                (
                    vec!["discounted".to_string(), "saved".to_string()],
                    vec![100 - p, p],
                    vec![d.discounted, d.saved],
                )
            }
            (Some(weights), None) => {
                let allocations = allocate(amount, weights).map_err(wrap)?;
                let parties = match &self.parties {
                    Some(parties) => parties.clone(),
                    None => (0..weights.len()).map(|idx| format!("p{idx}")).collect(),
                };
                (parties, weights.clone(), allocations)
            }
            (None, None) => {
                return Err(PlanError::Invalid(format!(
                    "split `{}` needs weights or discount_pct",
                    self.label
                )))
            }
        };

        Ok(SplitOutcome {
            label: self.label.clone(),
            amount,
            parties,
            weights,
            allocations,
        })
    }
}
