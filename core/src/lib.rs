//! Calibration and quantification core for Beer's-law spectrophotometry.
//!
//! Standards of known concentration are fitted to a straight line, unknown
//! samples are read back through it, and the batch is scored with the
//! precision figures bench chemists report (RPD, RSD, Horwitz CV).

pub mod calibration;
pub mod interface;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use calibration::CalibrationEngine;
pub use prelude::{
    BatchReport, CalibrationError, CalibrationModel, CalibrationResult, SampleBatchSummary,
    SampleMeasurement, SampleResult, StandardPoint,
};
