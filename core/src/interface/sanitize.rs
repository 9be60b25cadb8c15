//! Boundary helpers that turn caller-supplied text into engine input.
//!
//! The engine itself is strict. Callers that want the forgiving behaviour of
//! a form field (blank or garbled text reads as a default) opt in through
//! [`parse_or_default`].

use crate::prelude::{CalibrationError, CalibrationResult};

/// Rejects NaN and infinities, naming the offending field and position.
pub fn ensure_finite(field: &str, index: usize, value: f64) -> CalibrationResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalibrationError::InvalidInput {
            field: field.to_string(),
            index,
            value: value.to_string(),
        })
    }
}

/// Parses `text` as a finite number.
pub fn parse_number(field: &str, index: usize, text: &str) -> CalibrationResult<f64> {
    let invalid = || CalibrationError::InvalidInput {
        field: field.to_string(),
        index,
        value: text.to_string(),
    };
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

/// Parses `text` as a finite number, falling back to `default` on failure.
pub fn parse_or_default(text: &str, default: f64) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => default,
    }
}
