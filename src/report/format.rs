//! Formatted terminal output for the analysis report.
//!
//! We keep formatting code in one place so the statistics stay testable and
//! output changes are localized.

use crate::domain::Observation;
use crate::math::{CorrelationBand, Describe, Summary};

/// Rows shown by the preview table.
pub const HEAD_ROWS: usize = 5;

/// First `n` rows of the table.
pub fn format_head(observations: &[Observation], n: usize) -> String {
    let mut out = String::new();
    push_row(&mut out, format!("{:<10} {:>10} {:>10}", "fecha", "t2m", "rh2m"));
    push_row(&mut out, format!("{:-<10} {:-<10} {:-<10}", "", "", ""));
    for o in observations.iter().take(n) {
        push_row(
            &mut out,
            format!("{:<10} {:>10} {:>10}", o.date, fmt_opt(o.temperature, 2), fmt_opt(o.humidity, 2)),
        );
    }
    if observations.is_empty() {
        out.push_str("(no rows)\n");
    }
    out
}

/// `describe()`-style table for both measurement columns.
pub fn format_summary(summary: &Summary) -> String {
    let t = &summary.temperature;
    let h = &summary.humidity;

    let mut out = String::new();
    push_row(&mut out, format!("{:<6} {:>12} {:>12}", "", "t2m", "rh2m"));
    push_row(&mut out, format!("{:<6} {:>12} {:>12}", "count", t.count, h.count));

    let stats: [(&str, fn(&Describe) -> Option<f64>); 7] = [
        ("mean", |d| d.mean),
        ("std", |d| d.std),
        ("min", |d| d.min),
        ("25%", |d| d.q25),
        ("50%", |d| d.median),
        ("75%", |d| d.q75),
        ("max", |d| d.max),
    ];
    for (label, get) in stats {
        push_row(
            &mut out,
            format!("{label:<6} {:>12} {:>12}", fmt_opt(get(t), 6), fmt_opt(get(h), 6)),
        );
    }
    out
}

/// Top humid days table.
pub fn format_top_humidity(rows: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str("Top days with highest humidity:\n");
    push_row(&mut out, format!("{:<10} {:>8}", "fecha", "rh2m"));
    for o in rows {
        push_row(&mut out, format!("{:<10} {:>8}", o.date, fmt_opt(o.humidity, 2)));
    }
    out
}

/// Correlation value plus its interpretation.
pub fn format_correlation(correlation: Option<f64>, band: CorrelationBand) -> String {
    let value = correlation.map(|c| format!("{c:.3}")).unwrap_or_else(|| "n/a".to_string());
    format!(
        "Pearson correlation T2M vs RH2M: {value}\nInterpretation: {}\n",
        band.interpretation()
    )
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(v) => format!("{v:.decimals$}"),
        None => "NaN".to_string(),
    }
}
