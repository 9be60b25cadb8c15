pub mod engine;
pub mod horwitz;
pub mod manual;
pub mod precision;

pub use engine::{CalibrationEngine, MIN_USABLE_SLOPE};
pub use manual::{ManualCurve, ManualReport, ManualRowResult, MassReading, RegressionSummary};
