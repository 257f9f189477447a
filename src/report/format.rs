//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the evaluator stays free of presentation concerns
//! - output changes are localized

use crate::domain::{BatchEntry, DealInput, EvaluationConfig, EvaluationReport, IndustryMultiples, RunwayPolicy};

/// Per-deal metrics block.
pub fn format_report(deal: &DealInput, report: &EvaluationReport, config: &EvaluationConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!("Metrics for {}:\n", deal.company_name));
    out.push_str(&format!("Industry: {}\n", deal.industry));
    out.push_str(&format!("Security Type: {}\n", deal.security_type));

    out.push_str("Growth Rates and Assessments:\n");
    if report.growth_rates.is_empty() {
        out.push_str("  (single year of revenue)\n");
    }
    for (i, (rate, tier)) in report
        .growth_rates
        .iter()
        .zip(&report.growth_rate_assessment)
        .enumerate()
    {
        let year = i + 1;
        match rate {
            Some(rate) => out.push_str(&format!("  Year {year} to {}: {rate:.2}% - {tier}\n", year + 1)),
            None => out.push_str(&format!("  Year {year} to {}: N/A - {tier}\n", year + 1)),
        }
    }

    out.push_str(&format!("Implied Multiple: {}\n", fmt_opt(report.implied_multiple)));
    if let Some(multiples) = &report.implied_multiples {
        let parts: Vec<String> = multiples.iter().map(|m| fmt_opt(*m)).collect();
        out.push_str(&format!("Implied Multiples by Year: [{}]\n", parts.join(", ")));
    }
    out.push_str(&format!("Industry Multiple: {:.2}\n", report.industry_multiple));

    let runway_source = match config.runway_policy {
        RunwayPolicy::Computed => "cash / burn",
        RunwayPolicy::Supplied => "supplied",
    };
    out.push_str(&format!(
        "Months of Cash: {} ({runway_source})\n",
        fmt_opt(report.months_of_cash)
    ));

    out.push_str(&format!("Discount Rate Assessment: {}\n", report.discount_rate_assessment));
    out.push_str(&format!("Interest Rate Assessment: {}\n", report.interest_rate_assessment));
    out.push_str(&format!("Valuation Assessment: {}\n", report.valuation_assessment));
    out.push_str(&format!("Runway Assessment: {}\n", report.runway_assessment));

    if !report.issues.is_empty() {
        out.push_str("Notes:\n");
        for issue in &report.issues {
            out.push_str(&format!("  - {issue}\n"));
        }
    }

    out
}

/// One line per batch row plus a totals footer.
pub fn format_batch_summary(entries: &[BatchEntry]) -> String {
    let mut out = String::new();
    out.push_str(
        format!(
            "{:<5} {:<24} {:>9} {:<20} {:<11} {:<18} {:<18}\n",
            "line", "company", "multiple", "valuation", "runway", "discount", "interest"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<5} {:-<24} {:-<9} {:-<20} {:-<11} {:-<18} {:-<18}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for entry in entries {
        let line = match &entry.outcome {
            Ok(report) => format!(
                "{:<5} {:<24} {:>9} {:<20} {:<11} {:<18} {:<18}",
                entry.line,
                truncate(&entry.company_name, 24),
                fmt_opt(report.implied_multiple),
                report.valuation_assessment.label(),
                report.runway_assessment.label(),
                report.discount_rate_assessment.label(),
                report.interest_rate_assessment.label(),
            ),
            Err(err) => format!(
                "{:<5} {:<24} error: {err}",
                entry.line,
                truncate(&entry.company_name, 24),
            ),
        };
        out.push_str(line.trim_end());
        out.push('\n');
    }

    let failed = entries.iter().filter(|e| !e.is_ok()).count();
    out.push_str(&format!(
        "\n{} deal(s): {} evaluated, {} failed\n",
        entries.len(),
        entries.len() - failed,
        failed
    ));
    out
}

pub fn format_config(config: &EvaluationConfig) -> String {
    let mut out = String::new();
    out.push_str("Evaluation config:\n");
    out.push_str(&format!("  modeled_discount_rate             {:.4}\n", config.modeled_discount_rate));
    out.push_str(&format!("  modeled_interest_rate             {:.4}\n", config.modeled_interest_rate));
    out.push_str(&format!(
        "  modeled_revenue_growth_aggressive {:.4} ({:.0}%)\n",
        config.modeled_revenue_growth_aggressive,
        config.modeled_revenue_growth_aggressive * 100.0
    ));
    out.push_str(&format!(
        "  modeled_revenue_growth_standard   {:.4} ({:.0}%)\n",
        config.modeled_revenue_growth_standard,
        config.modeled_revenue_growth_standard * 100.0
    ));
    out.push_str(&format!(
        "  modeled_revenue_growth_low        {:.4} (not used as a tier boundary)\n",
        config.modeled_revenue_growth_low
    ));
    out.push_str(&format!("  modeled_valuation_threshold       {:.4}\n", config.modeled_valuation_threshold));
    out.push_str(&format!("  modeled_cash_months               {:.2}\n", config.modeled_cash_months));
    out.push_str(&format!("  runway_policy                     {:?}\n", config.runway_policy));
    out.push_str(&format!("  multiple_mode                     {:?}\n", config.multiple_mode));
    out
}

pub fn format_benchmarks(benchmarks: &IndustryMultiples) -> String {
    let mut out = String::new();
    out.push_str(format!("{:<36} {:>8}\n", "industry", "multiple").trim_end());
    out.push('\n');
    out.push_str(format!("{:-<36} {:-<8}\n", "", "").trim_end());
    out.push('\n');
    for (name, multiple) in benchmarks.iter() {
        let value = match multiple {
            Some(m) => format!("{m:.3}"),
            None => "-".to_string(),
        };
        out.push_str(format!("{:<36} {:>8}", truncate(name, 36), value).trim_end());
        out.push('\n');
    }
    out.push_str(&format!("\n{} industries; unlisted or '-' use the default multiple\n", benchmarks.len()));
    out
}

fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v:.2}"),
        _ => "N/A".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
