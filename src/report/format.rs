//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays free of presentation concerns
//! - output changes are localized (and easy to snapshot in tests)

use std::path::Path;

use chrono::NaiveDate;

use crate::app::pipeline::{DayReport, ProductStatus, RunOutput};
use crate::domain::DataProduct;
use crate::io::ingest::{ParseStats, ParsedFile};

/// Per-date summary of a `run` / `plot` invocation.
pub fn format_run_summary(run: &RunOutput) -> String {
    let mut out = String::new();

    out.push_str("=== swx - ACE daily charts ===\n");
    match (run.days.first(), run.days.last()) {
        (Some(first), Some(last)) => out.push_str(&format!(
            "Dates: {} .. {} ({} days)\n",
            first.date.format("%Y%m%d"),
            last.date.format("%Y%m%d"),
            run.days.len()
        )),
        _ => out.push_str("Dates: none\n"),
    }

    for day in &run.days {
        out.push('\n');
        out.push_str(&format_day(day));
    }

    out.push_str(&format!("\nTotal: {}\n", fmt_stats(&run.totals())));
    out.push_str(&format!("Charts written: {}\n", run.chart_count()));
    out
}

fn format_day(day: &DayReport) -> String {
    let mut out = format!("{}\n", day.date.format("%Y%m%d"));

    for p in &day.products {
        match &p.status {
            ProductStatus::Parsed(stats) => {
                out.push_str(&format!("  {:<7} {}\n", p.product.display_name(), fmt_stats(stats)));
            }
            ProductStatus::Unavailable(reason) => {
                out.push_str(&format!("  {:<7} skipped: {reason}\n", p.product.display_name()));
            }
        }
    }

    let lens: Vec<String> = day
        .series_len
        .iter()
        .map(|(q, n)| format!("{}={n}", q.slug()))
        .collect();
    out.push_str(&format!("  series  {}\n", lens.join(" ")));

    if day.charts.is_empty() {
        out.push_str("  charts  none\n");
    }
    for (_, path) in &day.charts {
        out.push_str(&format!("  chart   {}\n", path.display()));
    }
    for path in &day.exports {
        out.push_str(&format!("  export  {}\n", path.display()));
    }
    if let Some(preview) = &day.preview {
        out.push('\n');
        out.push_str(preview);
    }

    out
}

fn fmt_stats(stats: &ParseStats) -> String {
    let mut s = format!(
        "records={} absent={} rejected={}",
        stats.parsed,
        stats.absent,
        stats.rejected_total()
    );
    if !stats.rejected.is_empty() {
        let parts: Vec<String> = stats
            .rejected
            .iter()
            .map(|(kind, n)| format!("{}: {n}", kind.display_name()))
            .collect();
        s.push_str(&format!(" ({})", parts.join(", ")));
    }
    s
}

/// Summary of a single-file `parse` invocation.
pub fn format_parse_summary(
    path: &Path,
    product: DataProduct,
    date: NaiveDate,
    parsed: &ParsedFile,
    max_errors: usize,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("File: {}\n", path.display()));
    out.push_str(&format!(
        "Product: {} | Date: {}\n",
        product.display_name(),
        date.format("%Y%m%d")
    ));
    out.push_str(&format!(
        "Lines: {} | ignored={} | {}\n",
        parsed.stats.lines,
        parsed.stats.ignored,
        fmt_stats(&parsed.stats)
    ));
    out.push_str(&format!("Observations: {}\n", parsed.observations.len()));

    if !parsed.row_errors.is_empty() && max_errors > 0 {
        out.push_str("\nRejected lines:\n");
        for err in parsed.row_errors.iter().take(max_errors) {
            out.push_str(&format!("  line {:>5}: {}\n", err.line, err.reason));
        }
        let hidden = parsed.row_errors.len().saturating_sub(max_errors);
        if hidden > 0 {
            out.push_str(&format!("  ... {hidden} more\n"));
        }
    }

    out
}
