use std::sync::Arc;

use crate::calibration::horwitz;
use crate::interface::sanitize::ensure_finite;
use crate::math::regression::least_squares;
use crate::math::stats::StatsHelper;
use crate::prelude::{
    BatchReport, CalibrationError, CalibrationLine, CalibrationModel, CalibrationResult,
    SampleBatchSummary, SampleMeasurement, SampleResult, StandardPoint,
};
use crate::telemetry::{LogManager, MetricsRecorder};

/// Fitted slopes below this magnitude cannot be inverted reliably.
pub const MIN_USABLE_SLOPE: f64 = 1e-6;

/// Fits Beer's-law calibration curves and quantifies unknowns against them.
///
/// The engine keeps no state between calls; the optional metrics recorder
/// only counts what passed through it.
pub struct CalibrationEngine {
    logger: LogManager,
    metrics: Option<Arc<MetricsRecorder>>,
}

impl CalibrationEngine {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
            metrics: None,
        }
    }

    pub fn with_metrics(metrics: Arc<MetricsRecorder>) -> Self {
        Self {
            logger: LogManager::new(),
            metrics: Some(metrics),
        }
    }

    /// Fits absorbance on concentration by ordinary least squares.
    pub fn fit(&self, standards: &[StandardPoint]) -> CalibrationResult<CalibrationModel> {
        let model = self.track(fit_standards(standards))?;
        if let Some(metrics) = &self.metrics {
            metrics.record_fit();
        }
        self.logger.record(&format!(
            "fitted {} standards: {}",
            standards.len(),
            model
        ));
        Ok(model)
    }

    /// Back-calculates one sample's concentration, clamping negatives to zero.
    ///
    /// Deviation and RPD stay unset until the batch is summarized.
    pub fn quantify(
        &self,
        model: &CalibrationModel,
        sample: &SampleMeasurement,
    ) -> CalibrationResult<SampleResult> {
        self.track(quantify_at(model, 0, sample))
    }

    /// Computes batch statistics and fills in each result's deviation fields.
    pub fn summarize(
        &self,
        results: &mut [SampleResult],
    ) -> CalibrationResult<SampleBatchSummary> {
        let summary = self.track(summarize_results(results))?;
        self.logger.detail(&format!(
            "summarized {} samples: mean {:.4}, rms deviation {:.4}",
            summary.sample_count, summary.mean_concentration, summary.rms_deviation_percent
        ));
        Ok(summary)
    }

    /// Quantifies every sample against `model` and summarizes the batch.
    pub fn run_batch(
        &self,
        model: &CalibrationModel,
        samples: &[SampleMeasurement],
    ) -> CalibrationResult<BatchReport> {
        let quantified = samples
            .iter()
            .enumerate()
            .map(|(index, sample)| quantify_at(model, index, sample))
            .collect::<CalibrationResult<Vec<_>>>();
        let mut results = self.track(quantified)?;

        let clamped = results.iter().filter(|r| r.below_detection).count();
        if clamped > 0 {
            self.logger
                .record(&format!("{} samples below detection, clamped to 0", clamped));
        }

        let summary = self.summarize(&mut results)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_samples(results.len());
        }

        Ok(BatchReport {
            model: model.clone(),
            results,
            summary,
        })
    }

    pub(crate) fn logger(&self) -> &LogManager {
        &self.logger
    }

    pub(crate) fn track<T>(&self, outcome: CalibrationResult<T>) -> CalibrationResult<T> {
        if let Err(err) = &outcome {
            if let Some(metrics) = &self.metrics {
                metrics.record_error();
            }
            self.logger.reject(&err.to_string());
        }
        outcome
    }
}

impl Default for CalibrationEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn fit_standards(standards: &[StandardPoint]) -> CalibrationResult<CalibrationModel> {
    let pairs = standards
        .iter()
        .enumerate()
        .map(|(index, point)| -> CalibrationResult<(f64, f64)> {
            Ok((
                ensure_finite("concentration", index, point.concentration)?,
                ensure_finite("absorbance", index, point.absorbance)?,
            ))
        })
        .collect::<CalibrationResult<Vec<_>>>()?;

    let line = least_squares(&pairs)?;
    // Written so that a NaN slope also fails.
    if !(line.slope.abs() >= MIN_USABLE_SLOPE) {
        return Err(CalibrationError::DegenerateFit { slope: line.slope });
    }

    Ok(CalibrationModel {
        slope: line.slope,
        intercept: line.intercept,
        correlation: line.correlation,
        r_squared: line.r_squared,
        points: standards.len(),
    })
}

fn quantify_at(
    model: &CalibrationModel,
    index: usize,
    sample: &SampleMeasurement,
) -> CalibrationResult<SampleResult> {
    ensure_finite("slope", 0, model.slope)?;
    ensure_finite("intercept", 0, model.intercept)?;
    let absorbance = ensure_finite("absorbance", index, sample.absorbance)?;
    let raw = model.invert(absorbance)?;
    let below_detection = raw < 0.0;
    let concentration = if below_detection { 0.0 } else { raw };

    Ok(SampleResult {
        label: sample.label.clone(),
        absorbance,
        concentration,
        below_detection,
        deviation_from_mean: None,
        rpd_percent: None,
        horwitz_cv_percent: horwitz::horwitz_cv_percent(concentration),
    })
}

fn summarize_results(results: &mut [SampleResult]) -> CalibrationResult<SampleBatchSummary> {
    if results.is_empty() {
        return Err(CalibrationError::EmptyBatch);
    }

    let concentrations = results
        .iter()
        .enumerate()
        .map(|(index, result)| ensure_finite("concentration", index, result.concentration))
        .collect::<CalibrationResult<Vec<_>>>()?;
    let mean = StatsHelper::mean(&concentrations).ok_or(CalibrationError::EmptyBatch)?;

    let mut deviations = Vec::with_capacity(results.len());
    let mut horwitz_values = Vec::new();
    for result in results.iter_mut() {
        let deviation = (result.concentration - mean).abs();
        result.deviation_from_mean = Some(deviation);
        result.rpd_percent = (mean != 0.0).then(|| deviation / mean * 100.0);
        result.horwitz_cv_percent = horwitz::horwitz_cv_percent(result.concentration);
        if let Some(cv) = result.horwitz_cv_percent {
            horwitz_values.push(cv);
        }
        deviations.push(deviation);
    }

    let textbook_rsd_percent = StatsHelper::sample_std_dev(&concentrations)
        .filter(|_| mean > 0.0)
        .map(|sd| sd / mean * 100.0);
    let horrat = textbook_rsd_percent.and_then(|rsd| horwitz::horrat(rsd, mean));

    Ok(SampleBatchSummary {
        sample_count: results.len(),
        mean_concentration: mean,
        rms_deviation_percent: StatsHelper::rms(&deviations),
        textbook_rsd_percent,
        mean_horwitz_cv: StatsHelper::mean(&horwitz_values),
        horrat,
    })
}
