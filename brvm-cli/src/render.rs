//! Report rendering: terminal table, JSON and CSV.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use brvm_core::analysis::AnalysisReport;
use brvm_core::domain::Signal;
use brvm_core::explain::summarize;
use brvm_core::opportunity::Opportunity;
use brvm_core::risk::RiskRecommendation;
use clap::ValueEnum;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

pub fn render(report: &AnalysisReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => render_table(report),
        OutputFormat::Json => render_json(report),
        OutputFormat::Csv => render_csv(report),
    }
}

/// Full report as pretty JSON.
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize AnalysisReport to JSON")
}

/// Ranked opportunities as CSV, one row per instrument.
///
/// Risk columns are empty when the run did no position sizing.
pub fn render_csv(report: &AnalysisReport) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "rank",
        "symbol",
        "date",
        "signal",
        "score",
        "close",
        "short_ma",
        "long_ma",
        "oscillator",
        "change_pct",
        "quantity",
        "stop_loss",
        "take_profit",
        "trailing_stop",
        "capital_at_risk",
        "potential_gain",
        "rationale",
    ])?;

    for (i, o) in report.opportunities.iter().enumerate() {
        let set = &o.indicators;
        let risk_col =
            |f: fn(&RiskRecommendation) -> String| o.risk.as_ref().map(f).unwrap_or_default();
        let record: Vec<String> = vec![
            (i + 1).to_string(),
            o.symbol.clone(),
            o.as_of().to_string(),
            o.signal.as_str().to_string(),
            format!("{:.2}", o.score),
            format!("{:.2}", o.close),
            format!("{:.2}", set.short_ma),
            format!("{:.2}", set.long_ma),
            format!("{:.2}", set.oscillator),
            fmt_optional(set.change_pct, 2),
            risk_col(|r| r.quantity.to_string()),
            risk_col(|r| format!("{:.2}", r.stop_loss)),
            risk_col(|r| format!("{:.2}", r.take_profit)),
            risk_col(|r| format!("{:.2}", r.trailing_stop)),
            risk_col(|r| format!("{:.2}", r.capital_at_risk)),
            risk_col(|r| format!("{:.2}", r.potential_gain)),
            summarize(&o.rationale),
        ];
        wtr.write_record(&record)?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Human-readable report for the terminal.
pub fn render_table(report: &AnalysisReport) -> Result<String> {
    let mut out = String::new();
    let summary = &report.summary;

    writeln!(out)?;
    writeln!(out, "=== BRVM Opportunities ===")?;
    if let Some(as_of) = report.as_of {
        writeln!(out, "As of:          {as_of}")?;
    }
    writeln!(out, "Run:            {}", &report.run_id[..report.run_id.len().min(16)])?;
    writeln!(
        out,
        "Instruments:    {} analyzed, {} excluded",
        summary.analyzed, summary.excluded
    )?;
    let counts: Vec<String> = Signal::ALL
        .iter()
        .map(|s| format!("{s} {}", summary.count(*s)))
        .collect();
    writeln!(out, "Signals:        {}", counts.join(", "))?;
    if let Some(mean) = summary.mean_oscillator {
        writeln!(out, "Mean osc.:      {mean:.1}")?;
    }
    if let (Some(best), Some(score)) = (&summary.best, summary.max_score) {
        writeln!(out, "Best:           {best} ({score:.1})")?;
    }

    writeln!(out)?;
    if report.opportunities.is_empty() {
        writeln!(out, "No opportunity passes the filters.")?;
    } else {
        writeln!(
            out,
            "{:>4}  {:<8} {:<12} {:>6} {:>10} {:>6} {:>8} {:>8} {:>10} {:>10}",
            "#", "Symbol", "Signal", "Score", "Close", "Osc", "Chg%", "Qty", "Stop", "Target"
        )?;
        for (i, o) in report.opportunities.iter().enumerate() {
            write_row(&mut out, i + 1, o)?;
        }

        writeln!(out)?;
        writeln!(out, "--- Rationale ---")?;
        for o in &report.opportunities {
            writeln!(out, "{:<8} {}", o.symbol, summarize(&o.rationale))?;
        }
    }

    if !report.excluded.is_empty() {
        writeln!(out)?;
        writeln!(out, "--- Excluded ---")?;
        for e in &report.excluded {
            writeln!(out, "{:<8} {}", e.symbol, e.reason)?;
        }
    }

    Ok(out)
}

fn write_row(out: &mut String, rank: usize, o: &Opportunity) -> std::fmt::Result {
    let (qty, stop, target) = match &o.risk {
        Some(r) => (
            r.quantity.to_string(),
            format!("{:.2}", r.stop_loss),
            format!("{:.2}", r.take_profit),
        ),
        None => ("-".into(), "-".into(), "-".into()),
    };
    writeln!(
        out,
        "{:>4}  {:<8} {:<12} {:>6.1} {:>10.2} {:>6.1} {:>8} {:>8} {:>10} {:>10}",
        rank,
        o.symbol,
        o.signal.as_str(),
        o.score,
        o.close,
        o.indicators.oscillator,
        fmt_optional(o.indicators.change_pct, 1),
        qty,
        stop,
        target
    )
}

fn fmt_optional(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:+.decimals$}")
    } else {
        String::new()
    }
}
