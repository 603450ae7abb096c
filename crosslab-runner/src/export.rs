//! Persistence of study results — JSON manifests, CSV extracts, and
//! artifact directories.
//!
//! - JSON round-trips the whole [`StudyResult`], guarded by a schema version
//! - CSV extracts cover the cumulative curves and the trade events
//! - `save_artifacts` writes one timestamped directory per study with the
//!   manifest, both CSVs, and the Markdown report side by side

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use crosslab_core::returns::ReturnsSeries;

use crate::report::generate_report;
use crate::result::{StudyResult, SCHEMA_VERSION};

/// Serialize a study result to pretty-printed JSON.
pub fn export_json(result: &StudyResult) -> Result<String> {
    serde_json::to_string_pretty(result).context("failed to serialize study result to JSON")
}

/// Deserialize a study result from JSON, rejecting manifests written by a
/// newer schema than this build understands.
pub fn import_json(json: &str) -> Result<StudyResult> {
    let result: StudyResult =
        serde_json::from_str(json).context("failed to parse study result JSON")?;
    if result.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            result.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(result)
}

/// Cumulative growth curves as CSV: one row per bar, columns
/// `date,gated,baseline`. Undefined points become empty cells.
pub fn export_curves_csv(result: &StudyResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "gated", "baseline"])
        .context("failed to write CSV header")?;

    for (t, date) in result.series.dates().iter().enumerate() {
        wtr.write_record([
            date.to_string(),
            curve_cell(&result.gated, t),
            curve_cell(&result.baseline, t),
        ])
        .context("failed to write CSV row")?;
    }

    let bytes = wtr
        .into_inner()
        .context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Trade events as CSV: one row per signal transition, columns
/// `date,side,anchor`.
pub fn export_events_csv(result: &StudyResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "side", "anchor"])
        .context("failed to write CSV header")?;

    for marker in &result.frame.markers {
        wtr.write_record([
            marker.date.to_string(),
            marker.side.label().to_string(),
            format!("{:.6}", marker.anchor),
        ])
        .context("failed to write CSV row")?;
    }

    let bytes = wtr
        .into_inner()
        .context("failed to flush CSV writer")?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

fn curve_cell(returns: &Option<ReturnsSeries>, t: usize) -> String {
    returns
        .as_ref()
        .and_then(|r| r.cumulative.get(t).copied().flatten())
        .map(|v| format!("{v:.6}"))
        .unwrap_or_default()
}

/// Write the full artifact set for one study under `base_dir`.
///
/// Creates `{symbol}_{timestamp}/` containing `manifest.json`,
/// `curves.csv`, `events.csv`, and `report.md`, and returns the
/// directory path.
pub fn save_artifacts(result: &StudyResult, base_dir: &Path) -> Result<PathBuf> {
    let dir_name = format!(
        "{}_{}",
        result.symbol,
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let dir = base_dir.join(dir_name);
    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create artifact directory {}", dir.display()))?;

    let manifest = export_json(result)?;
    let curves = export_curves_csv(result)?;
    let events = export_events_csv(result)?;
    let report = generate_report(result);

    write_artifact(&dir, "manifest.json", &manifest)?;
    write_artifact(&dir, "curves.csv", &curves)?;
    write_artifact(&dir, "events.csv", &events)?;
    write_artifact(&dir, "report.md", &report)?;

    Ok(dir)
}

/// Load a study result back from an artifact directory's manifest.
pub fn load_artifacts(dir: &Path) -> Result<StudyResult> {
    let manifest_path = dir.join("manifest.json");
    let json = fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

fn write_artifact(dir: &Path, name: &str, content: &str) -> Result<()> {
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::params::StudyParams;
    use crate::pipeline::study_from_closes;

    fn sample_result() -> StudyResult {
        let params = StudyParams {
            symbol: "TEST".into(),
            short_window: 1,
            long_window: 3,
            ..StudyParams::default()
        };
        let closes = [10.0, 10.0, 10.0, 20.0, 20.0, 20.0, 5.0, 5.0, 5.0];
        study_from_closes(&params, &closes)
    }

    // ── JSON ──

    #[test]
    fn json_roundtrip() {
        let result = sample_result();
        let json = export_json(&result).unwrap();
        let restored = import_json(&json).unwrap();

        assert_eq!(restored.schema_version, SCHEMA_VERSION);
        assert_eq!(restored.symbol, result.symbol);
        assert_eq!(restored.bar_count, result.bar_count);
        assert_eq!(restored.transition_count, result.transition_count);
        assert_eq!(restored.kpis.gated, result.kpis.gated);
        assert_eq!(restored.kpis.baseline, result.kpis.baseline);
        assert_eq!(restored.frame.markers.len(), result.frame.markers.len());
    }

    #[test]
    fn json_accepts_current_version() {
        let json = export_json(&sample_result()).unwrap();
        assert!(json.contains("\"schema_version\": 1"));
        assert!(import_json(&json).is_ok());
    }

    #[test]
    fn json_rejects_newer_version() {
        let json = export_json(&sample_result()).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["schema_version"] = serde_json::json!(99);

        let err = import_json(&value.to_string()).unwrap_err();
        assert!(err
            .to_string()
            .contains("unsupported schema version 99 (max supported: 1)"));
    }

    #[test]
    fn json_rejects_garbage() {
        assert!(import_json("not json at all").is_err());
    }

    // ── CSV ──

    #[test]
    fn curves_csv_has_row_per_bar() {
        let result = sample_result();
        let csv = export_curves_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,gated,baseline");
        assert_eq!(lines.len(), 1 + result.bar_count);
        // The entry-anchored baseline is undefined on day 0, so its cell
        // is empty while the gated curve starts at 1.
        assert_eq!(lines[1], "2024-01-02,1.000000,");
        assert!(lines[5].starts_with("2024-01-06,"));
    }

    #[test]
    fn curves_csv_is_all_holes_without_returns() {
        let params = StudyParams {
            symbol: "TEST".into(),
            short_window: 1,
            long_window: 2,
            ..StudyParams::default()
        };
        let result = study_from_closes(&params, &[100.0]);
        assert!(result.gated.is_none());

        let csv = export_curves_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2024-01-02,,");
    }

    #[test]
    fn events_csv_lists_transitions() {
        let result = sample_result();
        let csv = export_events_csv(&result).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,side,anchor");
        assert_eq!(lines.len(), 1 + result.transition_count);
        assert_eq!(lines[1], "2024-01-06,BUY,20.000000");
        assert_eq!(lines[2], "2024-01-08,SELL,5.000000");
    }

    // ── Artifact directories ──

    #[test]
    fn save_load_artifacts_roundtrip() {
        let result = sample_result();
        let tmp = tempfile::tempdir().unwrap();

        let dir = save_artifacts(&result, tmp.path()).unwrap();
        assert!(dir.starts_with(tmp.path()));
        for name in ["manifest.json", "curves.csv", "events.csv", "report.md"] {
            assert!(dir.join(name).exists(), "missing artifact {name}");
        }

        let restored = load_artifacts(&dir).unwrap();
        assert_eq!(restored.symbol, result.symbol);
        assert_eq!(restored.bar_count, result.bar_count);
        assert_eq!(restored.kpis.gated, result.kpis.gated);
    }

    #[test]
    fn load_artifacts_reports_missing_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        let err = load_artifacts(tmp.path()).unwrap_err();
        assert!(err.to_string().contains("manifest.json"));
    }
}
