use serde::{Deserialize, Serialize};
use std::fmt;

/// Reference sample of known concentration used to build the calibration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardPoint {
    pub concentration: f64,
    pub absorbance: f64,
}

impl StandardPoint {
    pub fn new(concentration: f64, absorbance: f64) -> Self {
        Self {
            concentration,
            absorbance,
        }
    }
}

/// Absorbance reading of an unknown sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleMeasurement {
    pub label: String,
    pub absorbance: f64,
}

impl SampleMeasurement {
    pub fn new(label: impl Into<String>, absorbance: f64) -> Self {
        Self {
            label: label.into(),
            absorbance,
        }
    }
}

/// Linear absorbance-versus-concentration model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub slope: f64,
    pub intercept: f64,
    pub correlation: f64,
    pub r_squared: f64,
    /// Number of standards the model was fitted from. Zero for hand-built models.
    pub points: usize,
}

impl CalibrationModel {
    /// Builds a model from known parameters without fitting.
    ///
    /// Correlation and R² are NaN: no standards back them.
    pub fn from_parameters(slope: f64, intercept: f64) -> Self {
        Self {
            slope,
            intercept,
            correlation: f64::NAN,
            r_squared: f64::NAN,
            points: 0,
        }
    }

    /// Absorbance predicted for `concentration`.
    pub fn predict(&self, concentration: f64) -> f64 {
        self.slope * concentration + self.intercept
    }
}

impl fmt::Display for CalibrationModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "y = {:.4}x {} {:.4}",
            self.slope,
            if self.intercept < 0.0 { '-' } else { '+' },
            self.intercept.abs()
        )?;
        if self.r_squared.is_finite() {
            write!(f, " (R² = {:.4})", self.r_squared)?;
        }
        Ok(())
    }
}

/// Per-sample outcome of quantification and batch summarization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleResult {
    pub label: String,
    pub absorbance: f64,
    pub concentration: f64,
    /// True when the raw inversion was negative and clamped to zero.
    pub below_detection: bool,
    /// Filled by `summarize`.
    pub deviation_from_mean: Option<f64>,
    /// RPD against the batch mean, filled by `summarize`.
    pub rpd_percent: Option<f64>,
    pub horwitz_cv_percent: Option<f64>,
}

/// Cross-sample statistics over one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleBatchSummary {
    pub sample_count: usize,
    pub mean_concentration: f64,
    /// Root-mean-square of the absolute deviations from the mean. This is the
    /// figure the bench calculators label "%RSD"; it is not the textbook RSD.
    pub rms_deviation_percent: f64,
    /// Sample standard deviation over the mean, in percent.
    pub textbook_rsd_percent: Option<f64>,
    pub mean_horwitz_cv: Option<f64>,
    /// Textbook RSD over the Horwitz CV predicted at the batch mean.
    pub horrat: Option<f64>,
}

/// Fitted model, quantified samples and their summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub model: CalibrationModel,
    pub results: Vec<SampleResult>,
    pub summary: SampleBatchSummary,
}

/// Errors raised at the boundary of the calibration computation.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("insufficient data: need at least 2 points with 2 distinct x values, got {points} points with {distinct} distinct")]
    InsufficientData { points: usize, distinct: usize },
    #[error("degenerate fit: slope {slope:e} cannot be inverted")]
    DegenerateFit { slope: f64 },
    #[error("empty batch: no samples to summarize")]
    EmptyBatch,
    #[error("invalid input: {field}[{index}] = {value:?} is not a finite number")]
    InvalidInput {
        field: String,
        index: usize,
        value: String,
    },
}

pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// A straight line that can be inverted from absorbance back to concentration.
pub trait CalibrationLine {
    fn slope(&self) -> f64;
    fn intercept(&self) -> f64;

    /// Raw inversion `(absorbance - intercept) / slope`, no clamping.
    fn invert(&self, absorbance: f64) -> CalibrationResult<f64> {
        let slope = self.slope();
        if slope == 0.0 {
            return Err(CalibrationError::DegenerateFit { slope });
        }
        Ok((absorbance - self.intercept()) / slope)
    }
}

impl CalibrationLine for CalibrationModel {
    fn slope(&self) -> f64 {
        self.slope
    }

    fn intercept(&self) -> f64 {
        self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_display_renders_equation() {
        let model = CalibrationModel {
            r_squared: 0.99,
            ..CalibrationModel::from_parameters(0.5, -0.02)
        };
        assert_eq!(model.to_string(), "y = 0.5000x - 0.0200 (R² = 0.9900)");
    }

    #[test]
    fn hand_built_model_claims_no_fit_quality() {
        let model = CalibrationModel::from_parameters(0.5, -0.02);
        assert!(model.correlation.is_nan());
        assert!(model.r_squared.is_nan());
        assert_eq!(model.points, 0);
        assert_eq!(model.to_string(), "y = 0.5000x - 0.0200");
    }

    #[test]
    fn invert_rejects_zero_slope() {
        let model = CalibrationModel::from_parameters(0.0, 0.1);
        assert_eq!(
            model.invert(0.4),
            Err(CalibrationError::DegenerateFit { slope: 0.0 })
        );
    }

    #[test]
    fn invert_is_unclamped() {
        let model = CalibrationModel::from_parameters(2.0, 1.0);
        assert_eq!(model.invert(0.0).unwrap(), -0.5);
    }
}
