//! Read deal, config and benchmark JSON files.
//!
//! A deal file is either a bare `DealInput` object or the request envelope
//! `{"data": {...}, "config": {...}}` where `config` is an optional partial
//! override for that deal only.
//!
//! Config and benchmark files may be bare objects or wrapped the way the
//! `deal config --json` / `deal industries --json` output wraps them
//! (`{"config": {...}}`, `{"industry_multiples": {...}}`), so one run's output
//! can be fed straight back in.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::{ConfigPatch, DealInput, IndustryMultiples};
use crate::error::{AppError, EvalError};

/// A deal plus its optional per-request config override.
#[derive(Debug, Clone, PartialEq)]
pub struct DealRequest {
    pub deal: DealInput,
    pub config: Option<ConfigPatch>,
}

pub fn read_deal_json(path: &Path) -> Result<DealRequest, AppError> {
    let text = read_text(path, "deal JSON")?;
    parse_deal_json(&text).map_err(|e| AppError::new(2, format!("Invalid deal JSON '{}': {e}", path.display())))
}

pub fn parse_deal_json(text: &str) -> Result<DealRequest, EvalError> {
    let value: Value = serde_json::from_str(text).map_err(|e| EvalError::invalid("deal", e.to_string()))?;

    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            let data = map.remove("data").unwrap_or(Value::Null);
            let deal = from_value::<DealInput>(data, "data")?;
            let config = match map.remove("config") {
                None | Some(Value::Null) => None,
                Some(raw) => Some(from_value::<ConfigPatch>(raw, "config")?),
            };
            Ok(DealRequest { deal, config })
        }
        other => Ok(DealRequest {
            deal: from_value::<DealInput>(other, "deal")?,
            config: None,
        }),
    }
}

pub fn read_config_patch(path: &Path) -> Result<ConfigPatch, AppError> {
    let text = read_text(path, "config JSON")?;
    parse_wrapped::<ConfigPatch>(&text, "config")
        .map_err(|e| AppError::new(2, format!("Invalid config JSON '{}': {e}", path.display())))
}

pub fn read_benchmarks(path: &Path) -> Result<IndustryMultiples, AppError> {
    let text = read_text(path, "benchmark JSON")?;
    parse_wrapped::<IndustryMultiples>(&text, "industry_multiples")
        .map_err(|e| AppError::new(2, format!("Invalid benchmark JSON '{}': {e}", path.display())))
}

/// Parse `T`, unwrapping a single-key `{ "<wrapper>": ... }` envelope if present.
fn parse_wrapped<T: DeserializeOwned>(text: &str, wrapper: &str) -> Result<T, EvalError> {
    let value: Value = serde_json::from_str(text).map_err(|e| EvalError::invalid(wrapper, e.to_string()))?;
    let value = match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key(wrapper) => {
            map.remove(wrapper).unwrap_or(Value::Null)
        }
        other => other,
    };
    from_value(value, wrapper)
}

fn from_value<T: DeserializeOwned>(value: Value, what: &str) -> Result<T, EvalError> {
    serde_json::from_value(value).map_err(|e| EvalError::invalid(what, e.to_string()))
}

fn read_text(path: &Path, what: &str) -> Result<String, AppError> {
    fs::read_to_string(path).map_err(|e| AppError::new(2, format!("Failed to read {what} '{}': {e}", path.display())))
}
