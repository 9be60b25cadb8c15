use anyhow::Context;
use clap::ValueEnum;
use spectrocore::calibration::ManualReport;
use spectrocore::{BatchReport, CalibrationModel};
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::workflow::runner::WorkflowResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

pub fn render(result: &WorkflowResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(result)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("serializing workflow result")
        }
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.4}", v))
}

fn render_model(out: &mut String, model: &CalibrationModel) {
    let _ = writeln!(out, "Calibration curve: {}", model);
    let _ = writeln!(
        out,
        "Standards: {}  correlation r = {}",
        model.points,
        optional(Some(model.correlation).filter(|r| r.is_finite()))
    );
}

fn render_batch(out: &mut String, batch: &BatchReport) {
    render_model(out, &batch.model);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<16} {:>12} {:>14} {:>12} {:>10} {:>14}",
        "Sample", "Absorbance", "Concentration", "|Deviation|", "RPD %", "Horwitz CV %"
    );
    for result in &batch.results {
        let marker = if result.below_detection { "*" } else { "" };
        let _ = writeln!(
            out,
            "{:<16} {:>12.4} {:>14} {:>12} {:>10} {:>14}",
            result.label,
            result.absorbance,
            format!("{:.4}{}", result.concentration, marker),
            optional(result.deviation_from_mean),
            optional(result.rpd_percent),
            optional(result.horwitz_cv_percent),
        );
    }
    if batch.results.iter().any(|r| r.below_detection) {
        let _ = writeln!(out, "* below detection, reported as 0");
    }

    let summary = &batch.summary;
    let _ = writeln!(out);
    let _ = writeln!(out, "Mean concentration:      {:.4}", summary.mean_concentration);
    let _ = writeln!(
        out,
        "%RSD (RMS deviation):    {:.4}",
        summary.rms_deviation_percent
    );
    let _ = writeln!(
        out,
        "Textbook RSD %:          {}",
        optional(summary.textbook_rsd_percent)
    );
    let _ = writeln!(
        out,
        "Mean Horwitz CV %:       {}",
        optional(summary.mean_horwitz_cv)
    );
    let _ = writeln!(out, "HorRat:                  {}", optional(summary.horrat));
}

fn render_manual(out: &mut String, report: &ManualReport) {
    let _ = writeln!(
        out,
        "Entered curve: y = {:.4}x + {:.4}",
        report.curve.slope, report.curve.intercept
    );
    match &report.regression {
        Some(regression) => {
            let _ = writeln!(
                out,
                "Mass regression: slope {:.4}  intercept {:.4}  R² {:.4}",
                regression.slope, regression.intercept, regression.r_squared
            );
        }
        None => {
            let _ = writeln!(out, "Mass regression: n/a (needs 2 distinct masses)");
        }
    }
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>10} {:>12} {:>14} {:>12} {:>10} {:>12}",
        "Mass (g)", "Absorbance", "Concentration", "Predicted", "RPD %", "Accuracy %"
    );
    for row in &report.rows {
        let _ = writeln!(
            out,
            "{:>10.4} {:>12.4} {:>14.4} {:>12} {:>10} {:>12}",
            row.mass,
            row.absorbance,
            row.concentration,
            optional(row.predicted_absorbance),
            optional(row.rpd_vs_fit),
            optional(row.accuracy_vs_fit),
        );
    }
}

pub fn render_text(result: &WorkflowResult) -> String {
    let mut out = String::new();
    if let Some(model) = &result.model {
        render_model(&mut out, model);
    }
    if let Some(batch) = &result.batch {
        render_batch(&mut out, batch);
    }
    if let Some(manual) = &result.manual {
        if !out.is_empty() {
            let _ = writeln!(out);
        }
        render_manual(&mut out, manual);
    }
    out
}

/// Appends `report` to the log at `path`, creating parent directories.
pub fn append_to_log(path: &Path, report: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report log {}", path.display()))?;
    file.write_all(report.as_bytes())?;
    if !report.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectrocore::calibration::{ManualCurve, MassReading};
    use spectrocore::{CalibrationEngine, SampleMeasurement, StandardPoint};

    fn batch_result() -> WorkflowResult {
        let engine = CalibrationEngine::new();
        let model = engine
            .fit(&[
                StandardPoint::new(0.0, 0.0),
                StandardPoint::new(1.0, 0.5),
                StandardPoint::new(2.0, 1.0),
            ])
            .unwrap();
        let batch = engine
            .run_batch(
                &model,
                &[
                    SampleMeasurement::new("S1", 0.25),
                    SampleMeasurement::new("blank", -0.1),
                ],
            )
            .unwrap();
        WorkflowResult {
            batch: Some(batch),
            ..Default::default()
        }
    }

    #[test]
    fn text_report_lists_samples_and_summary() {
        let text = render_text(&batch_result());
        assert!(text.contains("Calibration curve: y = 0.5000x + 0.0000"));
        assert!(text.contains("S1"));
        assert!(text.contains("0.0000*"));
        assert!(text.contains("below detection"));
        assert!(text.contains("%RSD (RMS deviation)"));
    }

    #[test]
    fn json_report_is_parseable() {
        let json = render(&batch_result(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["batch"]["results"][0]["label"], "S1");
        assert!(value["manual"].is_null());
    }

    #[test]
    fn hand_built_model_renders_without_fit_quality() {
        let mut out = String::new();
        render_model(&mut out, &CalibrationModel::from_parameters(0.5, 0.0));
        assert!(out.contains("Calibration curve: y = 0.5000x + 0.0000\n"));
        assert!(out.contains("correlation r = n/a"));
        assert!(!out.contains("NaN"));
    }

    #[test]
    fn manual_report_without_regression_renders_placeholders() {
        let engine = CalibrationEngine::new();
        let manual = engine
            .evaluate_manual(
                &ManualCurve {
                    intercept: 0.0,
                    slope: 2.0,
                },
                &[MassReading::new(0.5, 0.4)],
            )
            .unwrap();
        let text = render_text(&WorkflowResult {
            manual: Some(manual),
            ..Default::default()
        });
        assert!(text.contains("Mass regression: n/a"));
        assert!(text.contains("0.2000"));
    }

    #[test]
    fn report_log_is_appended() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/report.log");
        append_to_log(&path, "first").unwrap();
        append_to_log(&path, "second\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
