//! Reporting utilities: rendering evaluation reports, batch summaries and the
//! active config/benchmark tables for the terminal.

pub mod format;

pub use format::*;
