pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        Some(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    pub fn rms(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = samples.iter().map(|&v| v * v).sum();
        (sum_sq / samples.len() as f64).sqrt()
    }

    /// Sample standard deviation (n - 1 denominator).
    pub fn sample_std_dev(samples: &[f64]) -> Option<f64> {
        if samples.len() < 2 {
            return None;
        }
        let mean = Self::mean(samples)?;
        let sum_sq: f64 = samples.iter().map(|&v| (v - mean).powi(2)).sum();
        Some((sum_sq / (samples.len() - 1) as f64).sqrt())
    }

    /// Number of distinct values, treating `0.0` and `-0.0` as equal.
    pub fn distinct_count(samples: &[f64]) -> usize {
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        sorted.dedup_by(|a, b| a == b);
        sorted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rms_zero_sequence_yields_zero() {
        assert_eq!(StatsHelper::rms(&[]), 0.0);
        assert_eq!(StatsHelper::rms(&[0.0, 0.0]), 0.0);
    }

    #[test]
    fn rms_handles_single_value() {
        assert_eq!(StatsHelper::rms(&[4.0]), 4.0);
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(StatsHelper::mean(&[]), None);
        assert_eq!(StatsHelper::mean(&[1.0, 2.0, 3.0]), Some(2.0));
    }

    #[test]
    fn sample_std_dev_uses_bessel_correction() {
        let sd = StatsHelper::sample_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        approx::assert_relative_eq!(sd, (32.0f64 / 7.0).sqrt());
        assert_eq!(StatsHelper::sample_std_dev(&[1.0]), None);
    }

    #[test]
    fn distinct_count_collapses_repeats() {
        assert_eq!(StatsHelper::distinct_count(&[1.0, 1.0, 2.0, -0.0, 0.0]), 3);
        assert_eq!(StatsHelper::distinct_count(&[]), 0);
    }
}
