//! Horwitz precision benchmark.
//!
//! The Horwitz equation predicts the between-laboratory coefficient of
//! variation from the analyte mass fraction `C`: `CV% = 2^(1 - 0.5 log10 C)`.

/// Parts per million in a unit mass fraction.
pub const PPM_PER_UNIT: f64 = 1_000_000.0;

/// Converts a ppm concentration to a decimal mass fraction.
pub fn mass_fraction(ppm: f64) -> f64 {
    ppm / PPM_PER_UNIT
}

/// Predicted CV in percent for a concentration in ppm.
///
/// Undefined for non-positive concentrations.
pub fn horwitz_cv_percent(ppm: f64) -> Option<f64> {
    let fraction = mass_fraction(ppm);
    if fraction > 0.0 && fraction.is_finite() {
        Some(2f64.powf(1.0 - 0.5 * fraction.log10()))
    } else {
        None
    }
}

/// Horwitz ratio: observed RSD over the predicted CV at `ppm`.
pub fn horrat(observed_rsd_percent: f64, ppm: f64) -> Option<f64> {
    horwitz_cv_percent(ppm).map(|predicted| observed_rsd_percent / predicted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn unit_fraction_gives_two_percent() {
        assert_eq!(horwitz_cv_percent(1_000_000.0), Some(2.0));
    }

    #[test]
    fn one_ppm_gives_sixteen_percent() {
        assert_relative_eq!(horwitz_cv_percent(1.0).unwrap(), 16.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_and_negative_are_undefined() {
        assert_eq!(horwitz_cv_percent(0.0), None);
        assert_eq!(horwitz_cv_percent(-5.0), None);
    }

    #[test]
    fn horrat_divides_by_prediction() {
        assert_relative_eq!(horrat(8.0, 1.0).unwrap(), 0.5, epsilon = 1e-9);
        assert_eq!(horrat(8.0, 0.0), None);
    }
}
