//! Deal evaluation.
//!
//! Responsibilities:
//!
//! - revenue growth rates and growth tiers (`growth`)
//! - discount / interest / valuation / runway assessments (`assess`)
//! - the end-to-end evaluator and input validation (`engine`)

pub mod assess;
pub mod engine;
pub mod growth;

pub use engine::{ensure_complete, evaluate, validate};
