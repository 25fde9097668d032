use serde::Serialize;
use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub processed_rows: usize,
    pub valid_measurements: usize,
    pub unsampled_rows: usize,
    pub degenerate_readings: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_processed(&self, rows: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.processed_rows += rows;
        }
    }

    pub fn record_valid(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.valid_measurements += 1;
        }
    }

    pub fn record_unsampled(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.unsampled_rows += 1;
        }
    }

    pub fn record_degenerate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.degenerate_readings += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
