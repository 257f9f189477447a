//! Input/output helpers.
//!
//! - CSV deal-list ingest (`ingest`)
//! - deal / config / benchmark JSON readers (`deal`)
//! - result exports (CSV/JSON) (`export`)

pub mod deal;
pub mod export;
pub mod ingest;

pub use deal::*;
pub use export::*;
pub use ingest::*;
