#[cfg(feature = "alloc_logs")]
use std::env;
#[cfg(feature = "alloc_logs")]
use std::fs::{self, OpenOptions};
#[cfg(feature = "alloc_logs")]
use std::io::{Error as IoError, ErrorKind, Write};
#[cfg(feature = "alloc_logs")]
use std::path::{Path, PathBuf};

#[cfg(feature = "alloc_logs")]
use serde_json::json;

use crate::money::Money;

pub const LOG_DIR_ENV: &str = "DOUGH_ALLOC_LOG_DIR";

/// Appends one JSON line describing a finished allocation.
///
/// Failures go to stderr; the allocation itself is never affected.
#[cfg(feature = "alloc_logs")]
pub fn log_allocation(amount: Money, weights: &[u64], allocations: &[Money], remainder: i128) {
    if let Err(err) = append_entry(&resolve_log_path(), amount, weights, allocations, remainder) {
        eprintln!("allocation log error: {err}");
    }
}

#[cfg(feature = "alloc_logs")]
fn append_entry(
    path: &Path,
    amount: Money,
    weights: &[u64],
    allocations: &[Money],
    remainder: i128,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let record = json!({
        "amount": amount,
        "weights": weights,
        "remainder": remainder.to_string(),
        "allocations": allocations,
    });
    let line = serde_json::to_string(&record).map_err(json_err)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")
}

#[cfg(feature = "alloc_logs")]
fn resolve_log_path() -> PathBuf {
    let dir = match env::var_os(LOG_DIR_ENV) {
        Some(dir) => PathBuf::from(dir),
        None => env::temp_dir().join("dough-alloc"),
    };
    dir.join("allocations.jsonl")
}

#[cfg(feature = "alloc_logs")]
fn json_err(err: serde_json::Error) -> IoError {
    IoError::new(ErrorKind::Other, err)
}

#[cfg(not(feature = "alloc_logs"))]
pub fn log_allocation(_amount: Money, _weights: &[u64], _allocations: &[Money], _remainder: i128) {}

#[cfg(all(test, feature = "alloc_logs"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn writes_jsonl_entry() {
        let dir = tempdir().expect("dir");
        let path = dir.path().join("nested/allocations.jsonl");
        let allocations = [Money(34), Money(33), Money(33)];
        append_entry(&path, Money(100), &[1, 1, 1], &allocations, 1).expect("append");
        append_entry(&path, Money(-5), &[1, 1], &[Money(-3), Money(-2)], -1).expect("append");

        let data = fs::read_to_string(&path).expect("log file");
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 2, "{data}");
        assert!(lines[0].contains("\"allocations\":[34,33,33]"), "{data}");
        assert!(lines[0].contains("\"remainder\":\"1\""), "{data}");
        assert!(lines[1].contains("\"remainder\":\"-1\""), "{data}");
    }

    #[test]
    fn default_log_path_is_outside_the_crate() {
        if env::var_os(LOG_DIR_ENV).is_some() {
            return;
        }
        let path = resolve_log_path();
        assert!(path.starts_with(env::temp_dir()), "{}", path.display());
        assert!(!path.starts_with(env!("CARGO_MANIFEST_DIR")));
    }
}
