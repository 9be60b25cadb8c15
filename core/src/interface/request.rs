use serde::{Deserialize, Serialize};

use crate::calibration::manual::{ManualCurve, MassReading};
use crate::prelude::{SampleMeasurement, StandardPoint};

/// Standards plus unknowns, quantified against a curve fitted from the standards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationRequest {
    pub standards: Vec<StandardPoint>,
    #[serde(default)]
    pub samples: Vec<SampleMeasurement>,
}

/// User-entered curve plus mass/absorbance rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualRequest {
    pub curve: ManualCurve,
    pub rows: Vec<MassReading>,
}
