use anyhow::ensure;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use spectrocore::StandardPoint;

/// Configuration for generating a synthetic Beer's-law standard series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticStandards {
    pub slope: f64,
    pub intercept: f64,
    pub concentrations: Vec<f64>,
    /// Half-width of the uniform absorbance jitter.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SyntheticStandards {
    fn default() -> Self {
        Self {
            slope: 0.045,
            intercept: 0.002,
            concentrations: vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0],
            noise: 0.002,
            seed: 0,
        }
    }
}

pub fn build_standards(config: &SyntheticStandards) -> anyhow::Result<Vec<StandardPoint>> {
    ensure!(
        config.noise.is_finite() && config.noise >= 0.0,
        "synthetic noise must be a non-negative number, got {}",
        config.noise
    );

    let mut rng = StdRng::seed_from_u64(config.seed);
    let standards = config
        .concentrations
        .iter()
        .map(|&concentration| {
            let jitter = if config.noise > 0.0 {
                rng.gen_range(-config.noise..config.noise)
            } else {
                0.0
            };
            StandardPoint::new(
                concentration,
                config.slope * concentration + config.intercept + jitter,
            )
        })
        .collect();

    Ok(standards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spectrocore::CalibrationEngine;

    #[test]
    fn generator_is_reproducible_for_a_seed() {
        let config = SyntheticStandards {
            seed: 13,
            ..Default::default()
        };
        assert_eq!(build_standards(&config).unwrap(), build_standards(&config).unwrap());
    }

    #[test]
    fn noiseless_series_lies_on_the_line() {
        let config = SyntheticStandards {
            noise: 0.0,
            ..Default::default()
        };
        let standards = build_standards(&config).unwrap();
        assert_eq!(standards.len(), 6);
        assert_eq!(standards[2].absorbance, 0.045 * 4.0 + 0.002);
    }

    #[test]
    fn fit_recovers_generating_slope() {
        let standards = build_standards(&SyntheticStandards::default()).unwrap();
        let model = CalibrationEngine::new().fit(&standards).unwrap();
        assert!((model.slope - 0.045).abs() < 0.002);
        assert!(model.r_squared > 0.99);
    }

    #[test]
    fn negative_noise_is_rejected() {
        let config = SyntheticStandards {
            noise: -1.0,
            ..Default::default()
        };
        assert!(build_standards(&config).is_err());
    }
}
