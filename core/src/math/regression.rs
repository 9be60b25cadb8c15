//! Ordinary least-squares fit of a straight line.

use crate::math::stats::StatsHelper;
use crate::prelude::{CalibrationError, CalibrationResult};

/// Result of a simple linear regression `y = intercept + slope * x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson correlation between x and y, clamped to [-1, 1].
    pub correlation: f64,
    pub r_squared: f64,
}

/// Fits `y` on `x` for the given `(x, y)` pairs.
///
/// slope = cov(x, y) / var(x), intercept = mean(y) - slope * mean(x).
/// Inputs are expected to be finite; callers validate them first. Sums that
/// overflow to a non-finite line are reported as `DegenerateFit`.
///
/// When every `y` is identical the correlation is undefined and reported as 0,
/// while R² is 1 because the flat line reproduces every point.
pub fn least_squares(points: &[(f64, f64)]) -> CalibrationResult<LineFit> {
    let xs: Vec<f64> = points.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = points.iter().map(|&(_, y)| y).collect();

    let distinct = StatsHelper::distinct_count(&xs);
    if points.len() < 2 || distinct < 2 {
        return Err(CalibrationError::InsufficientData {
            points: points.len(),
            distinct,
        });
    }

    let x_mean = StatsHelper::mean(&xs).unwrap_or_default();
    let y_mean = StatsHelper::mean(&ys).unwrap_or_default();

    let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
    for (&x, &y) in xs.iter().zip(ys.iter()) {
        let dx = x - x_mean;
        let dy = y - y_mean;
        sxx += dx * dx;
        syy += dy * dy;
        sxy += dx * dy;
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    if !slope.is_finite() || !intercept.is_finite() {
        return Err(CalibrationError::DegenerateFit { slope });
    }

    let (correlation, r_squared) = if syy > 0.0 {
        let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        (r, r * r)
    } else {
        (0.0, 1.0)
    };
    if !correlation.is_finite() {
        return Err(CalibrationError::DegenerateFit { slope });
    }

    Ok(LineFit {
        slope,
        intercept,
        correlation,
        r_squared,
    })
}
