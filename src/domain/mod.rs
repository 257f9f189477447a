//! Domain types used throughout the evaluator.
//!
//! This module defines:
//!
//! - deal inputs (`DealInput`, `SecurityType`)
//! - evaluation thresholds (`EvaluationConfig`, `ConfigPatch`, policy enums)
//! - the industry benchmark table (`IndustryMultiples`)
//! - evaluation outputs (`EvaluationReport` and its assessment labels)

pub mod benchmarks;
pub mod types;

pub use benchmarks::*;
pub use types::*;
