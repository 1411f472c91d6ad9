use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use log::{debug, info};
use serde::Serialize;

use dough::{load_plan, SplitOutcome};
use repro::{AllocationEntry, RunMeta, RunRecord, RECORD_SCHEMA};

#[derive(Debug, Parser)]
#[command(
    name = "split-sim",
    version,
    about = "Run a split plan through the allocator and write the ledger"
)]
struct Args {
    /// TOML split plan to execute.
    #[arg(long)]
    plan: PathBuf,
    /// CSV ledger destination.
    #[arg(long, default_value = "target/splits.csv")]
    out: PathBuf,
    /// Also write the canonical run record here.
    #[arg(long)]
    record: Option<PathBuf>,
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    if let Err(err) = init_logging(args.verbose).and_then(|_| run(&args)) {
        eprintln!("{err:?}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => simplelog::LevelFilter::Info,
        1 => simplelog::LevelFilter::Debug,
        _ => simplelog::LevelFilter::Trace,
    };
    let mut cfg = simplelog::ConfigBuilder::new();
    cfg.set_time_level(simplelog::LevelFilter::Error)
        .set_location_level(simplelog::LevelFilter::Off)
        .set_target_level(simplelog::LevelFilter::Off)
        .set_thread_level(simplelog::LevelFilter::Off);
    simplelog::TermLogger::init(
        level,
        cfg.build(),
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )
    .context("failed to initialise logger")
}

fn run(args: &Args) -> Result<()> {
    let plan = load_plan(&args.plan)
        .with_context(|| format!("loading plan {}", args.plan.display()))?;
    let outcomes = plan.run()?;
    debug!("executed {} splits", outcomes.len());

    write_ledger(&args.out, &outcomes)
        .with_context(|| format!("writing ledger {}", args.out.display()))?;

    let mut record = RunRecord::new(RunMeta {
        schema: RECORD_SCHEMA,
        plan: args.plan.display().to_string(),
        plan_hash: plan.schema_hash()?,
    });
    for outcome in &outcomes {
        record.push(to_entry(outcome));
    }
    info!("run_hash={}", record.hash_hex()?);

    if let Some(path) = &args.record {
        create_parent(path)?;
        record
            .write_to_path(path)
            .with_context(|| format!("writing record {}", path.display()))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct LedgerRow<'a> {
    label: &'a str,
    party: &'a str,
    weight: u64,
    allocation_cents: i64,
}

fn write_ledger(path: &Path, outcomes: &[SplitOutcome]) -> Result<()> {
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    for outcome in outcomes {
        let rows = outcome
            .parties
            .iter()
            .zip(&outcome.weights)
            .zip(&outcome.allocations);
        for ((party, weight), allocation) in rows {
            writer.serialize(LedgerRow {
                label: &outcome.label,
                party,
                weight: *weight,
                allocation_cents: allocation.as_i64(),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

fn to_entry(outcome: &SplitOutcome) -> AllocationEntry {
    AllocationEntry {
        label: outcome.label.clone(),
        amount: outcome.amount.as_i64(),
        parties: outcome.parties.clone(),
        weights: outcome.weights.clone(),
        allocations: outcome.allocations.iter().map(|m| m.as_i64()).collect(),
    }
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
