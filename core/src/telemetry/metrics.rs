use serde::Serialize;
use std::sync::Mutex;

/// Counters shared between the engine and whoever serves its results.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub fits: usize,
    pub samples: usize,
    pub errors: usize,
}

#[derive(Default)]
struct Metrics {
    fits: usize,
    samples: usize,
    errors: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_fit(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fits += 1;
        }
    }

    pub fn record_samples(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples += count;
        }
    }

    pub fn record_error(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.errors += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                fits: metrics.fits,
                samples: metrics.samples,
                errors: metrics.errors,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_accumulate() {
        let metrics = MetricsRecorder::new();
        metrics.record_fit();
        metrics.record_samples(3);
        metrics.record_samples(2);
        metrics.record_error();
        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                fits: 1,
                samples: 5,
                errors: 1
            }
        );
    }
}
