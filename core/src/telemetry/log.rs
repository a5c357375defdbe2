use log::info;

use crate::telemetry::metrics::GenerationMetrics;

/// Progress reporter for a dataset generation run.
pub struct ProgressLog {
    run: String,
}

impl ProgressLog {
    pub fn new(run: impl Into<String>) -> Self {
        Self { run: run.into() }
    }

    pub fn split_finished(&self, split: &str, signal_rows: usize, noise_rows: usize) {
        info!(
            "[{}] done with {} split: {} signal rows, {} noise rows",
            self.run, split, signal_rows, noise_rows
        );
    }

    pub fn run_finished(&self, metrics: &GenerationMetrics) {
        let (signal_rows, noise_rows) = metrics.snapshot();
        info!(
            "[{}] generated {} rows ({} signal, {} noise) across {} splits",
            self.run,
            signal_rows + noise_rows,
            signal_rows,
            noise_rows,
            metrics.splits()
        );
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::new("dataset")
    }
}
