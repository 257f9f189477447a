//! Command-line parsing for the deal evaluator.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the evaluation code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{ConfigPatch, MultipleMode, RunwayPolicy};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "deal", version, about = "Early-stage term sheet evaluator")]
pub struct Cli {
    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a single deal from a JSON file or from flags.
    Eval(EvalArgs),
    /// Evaluate every row of a deal-list CSV.
    Batch(BatchArgs),
    /// Print the effective evaluation config.
    Config(ShowArgs),
    /// Print the effective industry benchmark table.
    Industries(ShowArgs),
}

/// Where thresholds and benchmarks come from. Available on every subcommand.
#[derive(Debug, Args, Clone, Default)]
pub struct SettingsArgs {
    /// JSON config override file (falls back to $DEAL_EVAL_CONFIG).
    #[arg(long, global = true, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// JSON industry-multiple override file (falls back to $DEAL_EVAL_BENCHMARKS).
    #[arg(long, global = true, value_name = "JSON")]
    pub benchmarks: Option<PathBuf>,

    /// How months of cash is obtained for the runway assessment.
    #[arg(long, global = true, value_enum)]
    pub runway_policy: Option<RunwayPolicy>,

    /// Report only the first-year implied multiple, or one per year as well.
    #[arg(long, global = true, value_enum)]
    pub multiple_mode: Option<MultipleMode>,

    /// Modeled discount rate (fraction, e.g. 0.20).
    #[arg(long, global = true)]
    pub modeled_discount_rate: Option<f64>,

    /// Modeled interest rate (fraction, e.g. 0.06).
    #[arg(long, global = true)]
    pub modeled_interest_rate: Option<f64>,

    /// Growth threshold for the aggressive tier (fraction, 5.0 = 500%).
    #[arg(long, global = true)]
    pub modeled_revenue_growth_aggressive: Option<f64>,

    /// Growth threshold for the standard tier (fraction, 0.5 = 50%).
    #[arg(long, global = true)]
    pub modeled_revenue_growth_standard: Option<f64>,

    /// Band below the industry multiple still considered fair (fraction).
    #[arg(long, global = true)]
    pub modeled_valuation_threshold: Option<f64>,

    /// Months of runway above which runway is adequate.
    #[arg(long, global = true)]
    pub modeled_cash_months: Option<f64>,

    /// Verbose logging (debug level) on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl SettingsArgs {
    /// Flag overrides as a config patch (only flags that were given).
    pub fn config_patch(&self) -> ConfigPatch {
        ConfigPatch {
            modeled_discount_rate: self.modeled_discount_rate,
            modeled_interest_rate: self.modeled_interest_rate,
            modeled_revenue_growth_aggressive: self.modeled_revenue_growth_aggressive,
            modeled_revenue_growth_standard: self.modeled_revenue_growth_standard,
            modeled_revenue_growth_low: None,
            modeled_valuation_threshold: self.modeled_valuation_threshold,
            modeled_cash_months: self.modeled_cash_months,
            runway_policy: self.runway_policy,
            multiple_mode: self.multiple_mode,
        }
    }
}

/// Options for evaluating one deal.
#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    /// Deal JSON (bare deal, or `{"data": ..., "config": ...}`).
    #[arg(long, value_name = "JSON", conflicts_with = "company")]
    pub deal: Option<PathBuf>,

    #[command(flatten)]
    pub inline: InlineDealArgs,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Write the report JSON to a file.
    #[arg(long, value_name = "JSON")]
    pub export: Option<PathBuf>,

    /// Fail instead of reporting undefined metrics (zero revenue or burn).
    #[arg(long)]
    pub strict: bool,
}

/// A deal given directly on the command line.
#[derive(Debug, Args, Clone, Default)]
pub struct InlineDealArgs {
    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub industry: Option<String>,

    #[arg(long)]
    pub ask: Option<f64>,

    #[arg(long)]
    pub valuation_cap: Option<f64>,

    /// "Convertible Note", "SAFE", "Common Equity", "Preferred Equity", or any other label.
    #[arg(long)]
    pub security_type: Option<String>,

    #[arg(long)]
    pub discount_rate: Option<f64>,

    #[arg(long)]
    pub interest: Option<f64>,

    /// Yearly revenue, earliest first (e.g. `--revenue 100,200,400`).
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub revenue: Vec<f64>,

    #[arg(long)]
    pub monthly_burn: Option<f64>,

    #[arg(long)]
    pub current_cash: Option<f64>,

    #[arg(long)]
    pub months_of_cash: Option<f64>,

    #[arg(long)]
    pub previous_raise: Option<f64>,
}

/// Options for batch evaluation.
#[derive(Debug, Args, Clone)]
pub struct BatchArgs {
    /// Deal-list CSV (one deal per row; `yearly_revenue` is a quoted comma list).
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// Print results as JSON instead of a table.
    #[arg(long)]
    pub json: bool,

    /// Export per-deal results to CSV.
    #[arg(long = "export-csv", value_name = "CSV")]
    pub export_csv: Option<PathBuf>,

    /// Export per-deal results to JSON.
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Report rows with undefined metrics (zero revenue or burn) as failed.
    #[arg(long)]
    pub strict: bool,
}

/// Options for the `config` / `industries` views.
#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Print as JSON (re-loadable with `--config` / `--benchmarks`).
    #[arg(long)]
    pub json: bool,
}
