//! Shared evaluation pipeline used by every CLI command.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! defaults -> config/benchmark overrides -> snapshot -> evaluate (one deal or a batch)
//!
//! The command handlers can then focus on presentation (printing vs exporting).

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{info, warn};

use crate::cli::SettingsArgs;
use crate::context::{EvaluationContext, SharedContext};
use crate::domain::{BatchEntry, EvaluationReport};
use crate::error::{AppError, EvalError};
use crate::eval::ensure_complete;
use crate::io::{DealRequest, IngestRow, load_deals, read_benchmarks, read_config_patch};

pub const CONFIG_ENV: &str = "DEAL_EVAL_CONFIG";
pub const BENCHMARKS_ENV: &str = "DEAL_EVAL_BENCHMARKS";

/// All computed outputs of a CSV batch run.
#[derive(Debug, Clone)]
pub struct BatchRun {
    pub entries: Vec<BatchEntry>,
    pub rows_read: usize,
}

impl BatchRun {
    pub fn failed(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_ok()).count()
    }
}

/// Build the shared context from defaults, override files and flags.
///
/// Precedence (lowest first): built-in defaults, `--config`/`$DEAL_EVAL_CONFIG`,
/// `--benchmarks`/`$DEAL_EVAL_BENCHMARKS`, individual threshold flags.
pub fn build_context(settings: &SettingsArgs) -> Result<SharedContext, AppError> {
    dotenvy::dotenv().ok();

    let shared = SharedContext::new(EvaluationContext::default());

    if let Some(path) = settings.config.clone().or_else(|| env_path(CONFIG_ENV)) {
        let patch = read_config_patch(&path)?;
        shared
            .update_config(&patch)
            .map_err(|e| AppError::new(2, format!("Invalid config '{}': {e}", path.display())))?;
        info!(path = %path.display(), "loaded config overrides");
    }

    if let Some(path) = settings.benchmarks.clone().or_else(|| env_path(BENCHMARKS_ENV)) {
        let updates = read_benchmarks(&path)?;
        shared
            .update_benchmarks(&updates)
            .map_err(|e| AppError::new(2, format!("Invalid benchmarks '{}': {e}", path.display())))?;
        info!(path = %path.display(), entries = updates.len(), "loaded benchmark overrides");
    }

    let flags = settings.config_patch();
    if !flags.is_empty() {
        shared.update_config(&flags)?;
    }

    Ok(shared)
}

/// Evaluate one deal, applying its per-request override if it has one.
pub fn evaluate_request(
    request: &DealRequest,
    context: &EvaluationContext,
    strict: bool,
) -> Result<EvaluationReport, EvalError> {
    let report = context.evaluate_with(&request.deal, request.config.as_ref())?;
    if strict {
        ensure_complete(&report)?;
    }
    Ok(report)
}

/// Evaluate every row independently; output order matches input order.
///
/// A row that failed to parse, or whose deal fails evaluation, becomes an
/// error entry; the other rows are unaffected.
pub fn run_batch(rows: Vec<IngestRow>, context: &EvaluationContext, strict: bool) -> Vec<BatchEntry> {
    rows.into_par_iter()
        .map(|row| evaluate_row(row, context, strict))
        .collect()
}

/// Load a deal-list CSV and evaluate it against one snapshot.
pub fn run_csv_batch(path: &Path, context: &EvaluationContext, strict: bool) -> Result<BatchRun, AppError> {
    let ingest = load_deals(path)?;
    let rows_read = ingest.rows_read();
    if rows_read == 0 {
        return Err(AppError::new(3, format!("No deal rows found in '{}'.", path.display())));
    }

    info!(rows = rows_read, rejected = ingest.rows_rejected(), "evaluating batch");
    let run = BatchRun {
        entries: run_batch(ingest.rows, context, strict),
        rows_read,
    };
    info!(evaluated = rows_read - run.failed(), failed = run.failed(), "batch finished");
    Ok(run)
}

fn evaluate_row(row: IngestRow, context: &EvaluationContext, strict: bool) -> BatchEntry {
    let IngestRow {
        line,
        company_name,
        deal,
    } = row;
    let company_name = company_name.unwrap_or_else(|| format!("(line {line})"));

    let outcome = deal.and_then(|deal| {
        let report = context.evaluate(&deal)?;
        if strict {
            ensure_complete(&report)?;
        }
        Ok(report)
    });

    if let Err(err) = &outcome {
        warn!(line, company = %company_name, error = %err, "deal not evaluated");
    }

    BatchEntry {
        line,
        company_name,
        outcome,
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    std::env::var_os(var).filter(|v| !v.is_empty()).map(PathBuf::from)
}
