pub mod regression;
pub mod stats;

pub use regression::{least_squares, LineFit};
pub use stats::StatsHelper;
