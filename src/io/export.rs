//! Export evaluation results to CSV and JSON.
//!
//! The CSV is meant for spreadsheets (one row per deal, lists joined with `;`);
//! the JSON keeps the full report shape per deal.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::domain::{BatchEntry, EvaluationReport};
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct BatchDocument<'a> {
    generated_at: String,
    results: Vec<BatchRecord<'a>>,
}

#[derive(Debug, Serialize)]
struct BatchRecord<'a> {
    line: usize,
    company_name: &'a str,
    metrics: Option<&'a EvaluationReport>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ReportDocument<'a> {
    generated_at: String,
    company_name: &'a str,
    metrics: &'a EvaluationReport,
}

/// Build the JSON document for a batch (also used for `--json` stdout output).
pub fn batch_json(entries: &[BatchEntry]) -> Result<String, AppError> {
    let doc = BatchDocument {
        generated_at: timestamp(),
        results: entries.iter().map(batch_record).collect(),
    };
    serde_json::to_string_pretty(&doc).map_err(|e| AppError::new(4, format!("Failed to encode results JSON: {e}")))
}

/// Build the JSON document for a single report.
pub fn report_json(company_name: &str, report: &EvaluationReport) -> Result<String, AppError> {
    let doc = ReportDocument {
        generated_at: timestamp(),
        company_name,
        metrics: report,
    };
    serde_json::to_string_pretty(&doc).map_err(|e| AppError::new(4, format!("Failed to encode report JSON: {e}")))
}

pub fn write_batch_json(path: &Path, entries: &[BatchEntry]) -> Result<(), AppError> {
    write_text(path, &batch_json(entries)?)
}

pub fn write_report_json(path: &Path, company_name: &str, report: &EvaluationReport) -> Result<(), AppError> {
    write_text(path, &report_json(company_name, report)?)
}

/// Write one CSV row per batch entry.
pub fn write_batch_csv(path: &Path, entries: &[BatchEntry]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writer
        .write_record([
            "line",
            "company_name",
            "status",
            "growth_rates",
            "growth_rate_assessment",
            "implied_multiple",
            "industry_multiple",
            "discount_rate_assessment",
            "interest_rate_assessment",
            "valuation_assessment",
            "runway_assessment",
            "months_of_cash",
            "notes",
        ])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for entry in entries {
        let row = match &entry.outcome {
            Ok(report) => vec![
                entry.line.to_string(),
                entry.company_name.clone(),
                "ok".to_string(),
                join(report.growth_rates.iter().map(|r| fmt_opt(*r, 4))),
                join(report.growth_rate_assessment.iter().map(|c| c.to_string())),
                fmt_opt(report.implied_multiple, 6),
                format!("{:.4}", report.industry_multiple),
                report.discount_rate_assessment.to_string(),
                report.interest_rate_assessment.to_string(),
                report.valuation_assessment.to_string(),
                report.runway_assessment.to_string(),
                fmt_opt(report.months_of_cash, 4),
                join(report.issues.iter().map(|i| i.to_string())),
            ],
            Err(err) => {
                let mut row = vec![entry.line.to_string(), entry.company_name.clone(), "error".to_string()];
                row.extend(std::iter::repeat_n(String::new(), 9));
                row.push(err.to_string());
                row
            }
        };
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

fn batch_record(entry: &BatchEntry) -> BatchRecord<'_> {
    let (metrics, error) = match &entry.outcome {
        Ok(report) => (Some(report), None),
        Err(err) => (None, Some(err.to_string())),
    };
    BatchRecord {
        line: entry.line,
        company_name: &entry.company_name,
        metrics,
        error,
    }
}

fn write_text(path: &Path, text: &str) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{text}").map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    value.map(|v| format!("{v:.decimals$}")).unwrap_or_default()
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(";")
}
