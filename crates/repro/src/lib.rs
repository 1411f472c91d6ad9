//! Canonical, hashable records of allocation runs.
//!
//! A [`RunRecord`] captures every split a run produced. Its canonical JSON is
//! stable for identical inputs, so the blake3 digest can be stored next to a
//! ledger and compared later.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const RECORD_SCHEMA: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunMeta {
    pub schema: u32,
    pub plan: String,
    pub plan_hash: String,
}

/// One allocation as it appears in the ledger. Amounts are raw sub-units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub label: String,
    pub amount: i64,
    pub parties: Vec<String>,
    pub weights: Vec<u64>,
    pub allocations: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub meta: RunMeta,
    pub entries: Vec<AllocationEntry>,
}

impl RunRecord {
    pub fn new(meta: RunMeta) -> Self {
        Self {
            meta,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: AllocationEntry) {
        self.entries.push(entry);
    }

    /// Pretty JSON with struct field order and a trailing newline.
    pub fn canonical_json(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    pub fn hash_hex(&self) -> Result<String, serde_json::Error> {
        let text = self.canonical_json()?;
        Ok(blake3::hash(text.as_bytes()).to_hex().to_string())
    }

    pub fn read_from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let data = fs::read_to_string(path)?;
        serde_json::from_str(&data).map_err(io::Error::from)
    }

    pub fn write_to_path(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let text = self.canonical_json().map_err(io::Error::from)?;
        fs::write(path, text)
    }
}

pub fn hash_record(rec: &RunRecord) -> Result<String, serde_json::Error> {
    rec.hash_hex()
}
