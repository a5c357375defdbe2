use std::cell::Cell;

/// Row counters for one generation run.
#[derive(Debug, Default)]
pub struct GenerationMetrics {
    signal_rows: Cell<usize>,
    noise_rows: Cell<usize>,
    splits: Cell<usize>,
}

impl GenerationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_signal(&self, rows: usize) {
        self.signal_rows.set(self.signal_rows.get() + rows);
    }

    pub fn record_noise(&self, rows: usize) {
        self.noise_rows.set(self.noise_rows.get() + rows);
    }

    pub fn record_split(&self) {
        self.splits.set(self.splits.get() + 1);
    }

    /// Returns `(signal_rows, noise_rows)`.
    pub fn snapshot(&self) -> (usize, usize) {
        (self.signal_rows.get(), self.noise_rows.get())
    }

    pub fn splits(&self) -> usize {
        self.splits.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_accumulate_rows() {
        let metrics = GenerationMetrics::new();
        metrics.record_signal(8);
        metrics.record_noise(2);
        metrics.record_signal(4);
        metrics.record_split();
        assert_eq!(metrics.snapshot(), (12, 2));
        assert_eq!(metrics.splits(), 1);
    }
}
