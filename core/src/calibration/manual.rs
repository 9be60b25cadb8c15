//! Quantification against a user-entered curve.
//!
//! The entered intercept and slope drive the concentrations. A separate
//! regression of absorbance on sample mass is fitted from the same rows and
//! only reported; it never feeds back into the concentrations. When the rows
//! cannot support a regression (one row, or every mass equal) the report
//! still carries the concentrations and leaves the fit columns empty.

use serde::{Deserialize, Serialize};

use crate::calibration::engine::CalibrationEngine;
use crate::calibration::precision::{accuracy_vs_reference, rpd_vs_reference};
use crate::interface::sanitize::ensure_finite;
use crate::math::regression::least_squares;
use crate::prelude::{CalibrationLine, CalibrationResult};

/// Curve parameters typed in by the analyst rather than fitted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManualCurve {
    pub intercept: f64,
    pub slope: f64,
}

impl Default for ManualCurve {
    fn default() -> Self {
        Self {
            intercept: 0.0,
            slope: 1.0,
        }
    }
}

impl CalibrationLine for ManualCurve {
    fn slope(&self) -> f64 {
        self.slope
    }

    fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Sample mass (grams) and its absorbance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassReading {
    pub mass: f64,
    pub absorbance: f64,
}

impl MassReading {
    pub fn new(mass: f64, absorbance: f64) -> Self {
        Self { mass, absorbance }
    }
}

/// Fit quality of absorbance against mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionSummary {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl RegressionSummary {
    pub fn predict(&self, mass: f64) -> f64 {
        self.slope * mass + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualRowResult {
    pub mass: f64,
    pub absorbance: f64,
    /// From the entered curve, not clamped.
    pub concentration: f64,
    pub predicted_absorbance: Option<f64>,
    pub rpd_vs_fit: Option<f64>,
    pub accuracy_vs_fit: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualReport {
    pub curve: ManualCurve,
    pub regression: Option<RegressionSummary>,
    pub rows: Vec<ManualRowResult>,
}

/// Inverts the entered curve without clamping negative results.
pub fn quantify_manual(curve: &ManualCurve, absorbance: f64) -> CalibrationResult<f64> {
    curve.invert(absorbance)
}

impl CalibrationEngine {
    /// Quantifies each row against `curve` and reports a mass regression alongside.
    pub fn evaluate_manual(
        &self,
        curve: &ManualCurve,
        rows: &[MassReading],
    ) -> CalibrationResult<ManualReport> {
        self.track(evaluate_rows(curve, rows)).map(|report| {
            match &report.regression {
                Some(regression) => self.logger().record(&format!(
                    "manual curve over {} rows, mass regression R² {:.4}",
                    report.rows.len(),
                    regression.r_squared
                )),
                None => self.logger().detail(&format!(
                    "manual curve over {} rows, mass regression not available",
                    report.rows.len()
                )),
            }
            report
        })
    }
}

fn evaluate_rows(curve: &ManualCurve, rows: &[MassReading]) -> CalibrationResult<ManualReport> {
    ensure_finite("intercept", 0, curve.intercept)?;
    ensure_finite("slope", 0, curve.slope)?;
    let pairs = rows
        .iter()
        .enumerate()
        .map(|(index, row)| -> CalibrationResult<(f64, f64)> {
            Ok((
                ensure_finite("mass", index, row.mass)?,
                ensure_finite("absorbance", index, row.absorbance)?,
            ))
        })
        .collect::<CalibrationResult<Vec<_>>>()?;

    let concentrations = rows
        .iter()
        .map(|row| quantify_manual(curve, row.absorbance))
        .collect::<CalibrationResult<Vec<_>>>()?;

    // A single row or equal masses leave no regression; concentrations still stand.
    let regression = least_squares(&pairs).ok().map(|line| RegressionSummary {
        slope: line.slope,
        intercept: line.intercept,
        r_squared: line.r_squared,
    });

    let rows = rows
        .iter()
        .zip(concentrations)
        .map(|(row, concentration)| {
            let predicted = regression.map(|fit| fit.predict(row.mass));
            ManualRowResult {
                mass: row.mass,
                absorbance: row.absorbance,
                concentration,
                predicted_absorbance: predicted,
                rpd_vs_fit: predicted.and_then(|p| rpd_vs_reference(row.absorbance, p)),
                accuracy_vs_fit: predicted.and_then(|p| accuracy_vs_reference(row.absorbance, p)),
            }
        })
        .collect();

    Ok(ManualReport {
        curve: *curve,
        regression,
        rows,
    })
}
