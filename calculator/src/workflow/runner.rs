use crate::generator::standards::build_standards;
use crate::ingest::csv_input::{read_mass_readings, read_samples, read_standards};
use crate::workflow::config::WorkflowConfig;
use anyhow::{bail, Context};
use serde::Serialize;
use spectrocore::calibration::ManualReport;
use spectrocore::{BatchReport, CalibrationEngine, CalibrationModel};
use std::sync::Arc;

#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowResult {
    /// Present when standards were fitted but no samples were supplied.
    pub model: Option<CalibrationModel>,
    pub batch: Option<BatchReport>,
    pub manual: Option<ManualReport>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    engine: Arc<CalibrationEngine>,
}

impl Runner {
    pub fn new(config: WorkflowConfig, engine: Arc<CalibrationEngine>) -> Self {
        Self { config, engine }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        if !self.config.has_inputs() {
            bail!("nothing to calculate: supply standards, synthetic standards or mass readings");
        }
        let lenient = self.config.lenient;
        let mut result = WorkflowResult::default();

        let standards = if let Some(path) = &self.config.standards {
            Some(read_standards(path, lenient)?)
        } else if let Some(synthetic) = &self.config.synthetic {
            Some(build_standards(synthetic).context("generating synthetic standards")?)
        } else {
            None
        };

        match (standards, &self.config.samples) {
            (Some(standards), samples) => {
                let model = self
                    .engine
                    .fit(&standards)
                    .context("fitting calibration curve")?;
                if let Some(path) = samples {
                    let samples = read_samples(path, lenient)?;
                    let batch = self
                        .engine
                        .run_batch(&model, &samples)
                        .context("quantifying samples")?;
                    result.batch = Some(batch);
                } else {
                    result.model = Some(model);
                }
            }
            (None, Some(path)) => {
                bail!(
                    "samples in {} need standards to be quantified against",
                    path.display()
                );
            }
            (None, None) => {}
        }

        if let Some(path) = &self.config.mass_readings {
            let rows = read_mass_readings(path, lenient)?;
            let curve = self.config.manual.unwrap_or_default();
            let report = self
                .engine
                .evaluate_manual(&curve, &rows)
                .context("evaluating manual calibration curve")?;
            result.manual = Some(report);
        }

        Ok(result)
    }
}
