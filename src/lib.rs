//! `deal-eval` library crate.
//!
//! The binary (`deal`) is a thin wrapper around this library so that:
//!
//! - evaluation logic is testable without spawning processes
//! - the evaluator can be embedded behind other front ends (an HTTP service, a notebook)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod context;
pub mod domain;
pub mod error;
pub mod eval;
pub mod io;
pub mod logging;
pub mod report;
