//! CSV ingest for deal lists.
//!
//! One deal per row. The `yearly_revenue` cell holds every year's revenue,
//! comma-separated and quoted (`"18500,775000,6325000"`).
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level results**: a bad row becomes an error entry for that row and
//!   never stops the rows after it
//! - **No evaluation here**: rows come out as `DealInput`s

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DealInput, SecurityType};
use crate::error::{AppError, EvalError};

const REQUIRED_COLUMNS: [&str; 8] = [
    "company_name",
    "industry",
    "ask",
    "valuation_cap",
    "security_type",
    "discount_rate",
    "interest",
    "yearly_revenue",
];

/// One data row of the CSV, parsed or not.
#[derive(Debug, Clone)]
pub struct IngestRow {
    /// 1-based line number in the file (header is line 1).
    pub line: usize,
    /// Company name if the row got far enough to have one.
    pub company_name: Option<String>,
    pub deal: Result<DealInput, EvalError>,
}

/// Ingest output: every data row in file order.
#[derive(Debug, Clone)]
pub struct DealIngest {
    pub rows: Vec<IngestRow>,
}

impl DealIngest {
    pub fn rows_read(&self) -> usize {
        self.rows.len()
    }

    pub fn rows_rejected(&self) -> usize {
        self.rows.iter().filter(|r| r.deal.is_err()).count()
    }
}

/// Load a deal-list CSV from disk.
pub fn load_deals(path: &Path) -> Result<DealIngest, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;
    parse_deals(file)
}

/// Parse a deal-list CSV from any reader.
pub fn parse_deals<R: Read>(input: R) -> Result<DealIngest, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // Physical line of the record start; blank lines and quoted newlines shift it.
        let position = match &result {
            Ok(record) => record.position(),
            Err(e) => e.position(),
        };
        let line = position.map_or(idx + 2, |p| p.line() as usize);

        let row = match result {
            Ok(record) => IngestRow {
                line,
                company_name: get_optional(&record, &header_map, "company_name").map(str::to_string),
                deal: parse_row(&record, &header_map),
            },
            Err(e) => IngestRow {
                line,
                company_name: None,
                deal: Err(EvalError::invalid("row", format!("CSV parse error: {e}"))),
            },
        };
        rows.push(row);
    }

    Ok(DealIngest { rows })
}

/// Parse a revenue cell (`"100, 200, 400"`, optionally bracketed) into years.
pub fn parse_revenue_series(cell: &str) -> Result<Vec<f64>, EvalError> {
    let inner = cell.trim().trim_start_matches('[').trim_end_matches(']');
    if inner.trim().is_empty() {
        return Err(EvalError::invalid("yearly_revenue", "no revenue figures"));
    }

    inner
        .split(',')
        .enumerate()
        .map(|(idx, part)| {
            parse_amount(part).ok_or_else(|| {
                EvalError::invalid(
                    "yearly_revenue",
                    format!("year {} ('{}') is not a number", idx + 1, part.trim()),
                )
            })
        })
        .collect()
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !header_map.contains_key(*name))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::new(
        2,
        format!("Missing required column(s): {}", missing.join(", ")),
    ))
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<DealInput, EvalError> {
    let company_name = get_required(record, header_map, "company_name")?.to_string();
    let industry = get_required(record, header_map, "industry")?.to_string();
    let security_type: SecurityType = get_required(record, header_map, "security_type")?.into();

    let ask = required_amount(record, header_map, "ask")?;
    let valuation_cap = required_amount(record, header_map, "valuation_cap")?;
    let discount_rate = required_amount(record, header_map, "discount_rate")?;
    let interest = required_amount(record, header_map, "interest")?;

    let yearly_revenue = parse_revenue_series(get_required(record, header_map, "yearly_revenue")?)?;

    let monthly_burn = optional_amount(record, header_map, "monthly_burn")?.unwrap_or(0.0);
    let current_cash = optional_amount(record, header_map, "current_cash")?.unwrap_or(0.0);
    let previous_raise = optional_amount(record, header_map, "previous_raise")?.unwrap_or(0.0);
    let months_of_cash = optional_amount(record, header_map, "months_of_cash")?;

    Ok(DealInput {
        company_name,
        industry,
        ask,
        valuation_cap,
        security_type,
        discount_rate,
        interest,
        yearly_revenue,
        monthly_burn,
        current_cash,
        previous_raise,
        months_of_cash,
    })
}

fn required_amount(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<f64, EvalError> {
    let raw = get_required(record, header_map, name)?;
    parse_amount(raw).ok_or_else(|| EvalError::invalid(name, format!("'{raw}' is not a number")))
}

fn optional_amount(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<Option<f64>, EvalError> {
    let Some(raw) = get_optional(record, header_map, name) else {
        return Ok(None);
    };
    parse_amount(raw)
        .map(Some)
        .ok_or_else(|| EvalError::invalid(name, format!("'{raw}' is not a number")))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, EvalError> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| EvalError::invalid(name, "column missing"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| EvalError::invalid(name, "value missing"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a monetary amount, ignoring `$`, `_` and inner spaces.
fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.trim().chars().filter(|c| !matches!(c, '$' | '_' | ' ')).collect();
    let v = cleaned.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
