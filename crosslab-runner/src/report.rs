//! Markdown study report — metadata plus the two-column KPI table.
//!
//! Number formats follow the classic presentation of this comparison:
//! CAGR as a one-decimal percent, Sharpe with two decimals, max drawdown
//! as a whole percent, total return as a one-decimal multiple. An
//! undefined KPI renders `n/a`, never a fake zero.

use crosslab_core::data::DataSource;
use crosslab_core::kpi::KpiBundle;

use crate::result::StudyResult;

/// Render an optional fraction as a percent with the given precision.
pub fn fmt_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}%", decimals, v * 100.0),
        None => "n/a".to_string(),
    }
}

/// Render an optional scalar with two decimals.
pub fn fmt_scalar(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

/// Render an optional growth multiple, e.g. `3.1x`.
pub fn fmt_multiple(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}x"),
        None => "n/a".to_string(),
    }
}

/// Generate the Markdown report for a single study.
pub fn generate_report(result: &StudyResult) -> String {
    let mut md = String::with_capacity(1024);

    md.push_str(&format!("# Crossover Study: {}\n\n", result.symbol));

    // Metadata
    md.push_str("## Metadata\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Symbol | {} |\n", result.symbol));
    md.push_str(&format!("| Source | {} |\n", result.source.label()));
    md.push_str(&format!(
        "| Period | {} to {} |\n",
        result.start_date, result.end_date
    ));
    md.push_str(&format!("| Bars | {} |\n", result.bar_count));
    md.push_str(&format!(
        "| Indicator | {} {}/{} |\n",
        result.params.indicator.label(),
        result.params.short_window,
        result.params.long_window
    ));
    md.push_str(&format!(
        "| Baseline | {} |\n",
        result.kpis.baseline_mode.label()
    ));
    md.push_str(&format!(
        "| Risk-free rate | {} |\n",
        fmt_percent(Some(result.params.risk_free_rate), 1)
    ));
    md.push_str(&format!(
        "| Signal transitions | {} ({} buys, {} sells) |\n",
        result.transition_count,
        result.frame.buys().count(),
        result.frame.sells().count()
    ));
    if result.source == DataSource::Synthetic {
        md.push_str("| Data | **SYNTHETIC** |\n");
    }
    md.push('\n');

    // KPI comparison
    md.push_str("## KPI Comparison\n\n");
    md.push_str("| KPI | Long only w/ signal | Long only w/o signal |\n");
    md.push_str("| --- | ---: | ---: |\n");
    push_kpi_rows(&mut md, &result.kpis.gated, &result.kpis.baseline);
    md.push('\n');

    if !result.warnings.is_empty() {
        md.push_str("## Warnings\n\n");
        for warn in &result.warnings {
            md.push_str(&format!("- {warn}\n"));
        }
        md.push('\n');
    }

    md
}

fn push_kpi_rows(md: &mut String, gated: &KpiBundle, baseline: &KpiBundle) {
    md.push_str(&format!(
        "| CAGR | {} | {} |\n",
        fmt_percent(gated.cagr, 1),
        fmt_percent(baseline.cagr, 1)
    ));
    md.push_str(&format!(
        "| Sharpe ratio | {} | {} |\n",
        fmt_scalar(gated.sharpe),
        fmt_scalar(baseline.sharpe)
    ));
    md.push_str(&format!(
        "| Max Drawdown | {} | {} |\n",
        fmt_percent(gated.max_drawdown, 0),
        fmt_percent(baseline.max_drawdown, 0)
    ));
    md.push_str(&format!(
        "| Total return multiple | {} | {} |\n",
        fmt_multiple(gated.total_return_multiple),
        fmt_multiple(baseline.total_return_multiple)
    ));
}
