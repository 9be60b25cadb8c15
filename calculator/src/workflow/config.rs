use anyhow::Context;
use serde::{Deserialize, Serialize};
use spectrocore::calibration::ManualCurve;
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::standards::SyntheticStandards;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Headerless `concentration,absorbance` CSV.
    pub standards: Option<PathBuf>,
    /// Headerless `label,absorbance` (or bare `absorbance`) CSV.
    pub samples: Option<PathBuf>,
    /// Headerless `gram,absorbansi` CSV for the manual-curve mode.
    pub mass_readings: Option<PathBuf>,
    pub manual: Option<ManualCurve>,
    /// Generates standards when no standards file is given.
    pub synthetic: Option<SyntheticStandards>,
    /// Read unparseable cells as 0.0 instead of failing.
    pub lenient: bool,
    pub report_path: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        standards: Option<PathBuf>,
        samples: Option<PathBuf>,
        mass_readings: Option<PathBuf>,
        intercept: Option<f64>,
        slope: Option<f64>,
        lenient: bool,
        report_path: Option<PathBuf>,
    ) -> Self {
        let manual = (intercept.is_some() || slope.is_some()).then(|| {
            let defaults = ManualCurve::default();
            ManualCurve {
                intercept: intercept.unwrap_or(defaults.intercept),
                slope: slope.unwrap_or(defaults.slope),
            }
        });
        Self {
            standards,
            samples,
            mass_readings,
            manual,
            synthetic: None,
            lenient,
            report_path,
        }
    }

    /// Values set in `overrides` win over the ones in `self`.
    pub fn override_with(self, overrides: WorkflowConfig) -> Self {
        Self {
            standards: overrides.standards.or(self.standards),
            samples: overrides.samples.or(self.samples),
            mass_readings: overrides.mass_readings.or(self.mass_readings),
            manual: overrides.manual.or(self.manual),
            synthetic: overrides.synthetic.or(self.synthetic),
            lenient: overrides.lenient || self.lenient,
            report_path: overrides.report_path.or(self.report_path),
        }
    }

    pub fn has_inputs(&self) -> bool {
        self.standards.is_some() || self.synthetic.is_some() || self.mass_readings.is_some()
    }
}
