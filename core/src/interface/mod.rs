pub mod request;
pub mod sanitize;

pub use request::{CalibrationRequest, ManualRequest};
pub use sanitize::{ensure_finite, parse_number, parse_or_default};
