use serde::{Deserialize, Serialize};
use spectrocore::calibration::ManualReport;
use spectrocore::{BatchReport, CalibrationModel};

use crate::workflow::runner::WorkflowResult;

/// Latest results served to HTTP clients.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportModel {
    pub model: Option<CalibrationModel>,
    pub batch: Option<BatchReport>,
    pub manual: Option<ManualReport>,
}

impl From<&WorkflowResult> for ReportModel {
    fn from(result: &WorkflowResult) -> Self {
        Self {
            model: result.model.clone(),
            batch: result.batch.clone(),
            manual: result.manual.clone(),
        }
    }
}
