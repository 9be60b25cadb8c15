//! Relative difference measures.
//!
//! `rpd_vs_reference` and `accuracy_vs_reference` compute the same magnitude
//! for positive readings; they differ only in where the absolute value is
//! taken. Both are kept because reports name them separately.

/// `|actual - reference| / actual * 100`. Undefined when `actual` is zero.
pub fn rpd_vs_reference(actual: f64, reference: f64) -> Option<f64> {
    if actual == 0.0 {
        return None;
    }
    Some((actual - reference).abs() / actual * 100.0)
}

/// `|(actual - reference) / actual| * 100`. Undefined when `actual` is zero.
pub fn accuracy_vs_reference(actual: f64, reference: f64) -> Option<f64> {
    if actual == 0.0 {
        return None;
    }
    Some(((actual - reference) / actual).abs() * 100.0)
}

/// Textbook relative percent difference between duplicate results.
pub fn duplicate_rpd(first: f64, second: f64) -> Option<f64> {
    let mean = (first + second) / 2.0;
    if mean == 0.0 {
        return None;
    }
    Some((first - second).abs() / mean * 100.0)
}
