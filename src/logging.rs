//! Logging setup.
//!
//! Logs go to stderr so stdout carries only reports and JSON.

use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::error::AppError;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbose` picks debug over warn.
pub fn init_logging(verbose: bool) -> Result<(), AppError> {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("deal_eval={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::new(4, format!("Failed to initialize logging: {e}")))
}
