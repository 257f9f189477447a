//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - builds the evaluation context from defaults and overrides
//! - dispatches to the command handlers (printing and optional exports)

use clap::Parser;
use serde_json::json;
use tracing::info;

use crate::cli::{BatchArgs, Command, EvalArgs, InlineDealArgs, ShowArgs};
use crate::context::SharedContext;
use crate::domain::{DealInput, SecurityType};
use crate::error::{AppError, EvalError};
use crate::io::{DealRequest, read_deal_json};

pub mod pipeline;

/// Entry point for the `deal` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init_logging(cli.settings.verbose)?;

    let shared = pipeline::build_context(&cli.settings)?;

    match cli.command {
        Command::Eval(args) => handle_eval(args, &shared),
        Command::Batch(args) => handle_batch(args, &shared),
        Command::Config(args) => handle_config(args, &shared),
        Command::Industries(args) => handle_industries(args, &shared),
    }
}

fn handle_eval(args: EvalArgs, shared: &SharedContext) -> Result<(), AppError> {
    let request = match &args.deal {
        Some(path) => read_deal_json(path)?,
        None => DealRequest {
            deal: inline_deal(&args.inline)?,
            config: None,
        },
    };

    let snapshot = shared.snapshot();
    let report = pipeline::evaluate_request(&request, &snapshot, args.strict)?;
    info!(company = %request.deal.company_name, issues = report.issues.len(), "deal evaluated");

    if args.json {
        println!("{}", crate::io::report_json(&request.deal.company_name, &report)?);
    } else {
        let config = match &request.config {
            Some(patch) => snapshot.config().merged(patch),
            None => snapshot.config().clone(),
        };
        print!("{}", crate::report::format_report(&request.deal, &report, &config));
    }

    if let Some(path) = &args.export {
        crate::io::write_report_json(path, &request.deal.company_name, &report)?;
        eprintln!("Wrote {}", path.display());
    }

    Ok(())
}

fn handle_batch(args: BatchArgs, shared: &SharedContext) -> Result<(), AppError> {
    let snapshot = shared.snapshot();
    let run = pipeline::run_csv_batch(&args.csv, &snapshot, args.strict)?;

    if args.json {
        println!("{}", crate::io::batch_json(&run.entries)?);
    } else {
        print!("{}", crate::report::format_batch_summary(&run.entries));
    }

    if let Some(path) = &args.export_csv {
        crate::io::write_batch_csv(path, &run.entries)?;
        eprintln!("Wrote {}", path.display());
    }
    if let Some(path) = &args.export_json {
        crate::io::write_batch_json(path, &run.entries)?;
        eprintln!("Wrote {}", path.display());
    }

    if run.failed() == run.rows_read {
        return Err(AppError::new(3, "No deal in the batch could be evaluated."));
    }
    Ok(())
}

fn handle_config(args: ShowArgs, shared: &SharedContext) -> Result<(), AppError> {
    let config = shared.config();
    if args.json {
        print_json(&json!({ "config": config }))
    } else {
        print!("{}", crate::report::format_config(&config));
        Ok(())
    }
}

fn handle_industries(args: ShowArgs, shared: &SharedContext) -> Result<(), AppError> {
    let benchmarks = shared.benchmarks();
    if args.json {
        print_json(&json!({ "industry_multiples": benchmarks }))
    } else {
        print!("{}", crate::report::format_benchmarks(&benchmarks));
        Ok(())
    }
}

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value).map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))?;
    println!("{text}");
    Ok(())
}

/// Build a deal from `eval` flags.
///
/// Company, industry, valuation cap, security type and revenue are required;
/// the money and rate fields that some instruments don't carry default to zero.
pub fn inline_deal(args: &InlineDealArgs) -> Result<DealInput, EvalError> {
    let company_name = args
        .company
        .clone()
        .ok_or_else(|| EvalError::invalid("company_name", "missing (pass --company or --deal)"))?;
    let industry = args
        .industry
        .clone()
        .ok_or_else(|| EvalError::invalid("industry", "missing (pass --industry)"))?;
    let valuation_cap = args
        .valuation_cap
        .ok_or_else(|| EvalError::invalid("valuation_cap", "missing (pass --valuation-cap)"))?;
    let security_type: SecurityType = args
        .security_type
        .as_deref()
        .ok_or_else(|| EvalError::invalid("security_type", "missing (pass --security-type)"))?
        .into();

    Ok(DealInput {
        company_name,
        industry,
        ask: args.ask.unwrap_or(0.0),
        valuation_cap,
        security_type,
        discount_rate: args.discount_rate.unwrap_or(0.0),
        interest: args.interest.unwrap_or(0.0),
        yearly_revenue: args.revenue.clone(),
        monthly_burn: args.monthly_burn.unwrap_or(0.0),
        current_cash: args.current_cash.unwrap_or(0.0),
        previous_raise: args.previous_raise.unwrap_or(0.0),
        months_of_cash: args.months_of_cash,
    })
}
