use ndarray::{Array3, Axis};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::dataset::event::{ClassParameter, Event};
use crate::math::stats::StatsHelper;
use crate::prelude::{SynthError, SynthResult};
use crate::processing::{FeatureLayout, ThermalNoise};
use crate::telemetry::{GenerationMetrics, ProgressLog};

/// Label reserved for noise-only rows.
pub const NOISE_LABEL: i64 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitName {
    Train,
    Test,
    Val,
    /// Pooled set when splitting is disabled.
    All,
}

impl SplitName {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitName::Train => "train",
            SplitName::Test => "test",
            SplitName::Val => "val",
            SplitName::All => "all",
        }
    }
}

impl fmt::Display for SplitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Feature tensor `(rows, channels, samples)` with one label per row.
///
/// Signal rows come first, in event order, followed by the noise-only rows.
/// `params` holds the swept parameter of each signal row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledSplit {
    pub features: Array3<f32>,
    pub labels: Vec<i64>,
    pub params: Vec<f64>,
}

impl LabeledSplit {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn signal_rows(&self) -> usize {
        self.labels.iter().filter(|&&l| l != NOISE_LABEL).count()
    }

    pub fn noise_rows(&self) -> usize {
        self.len() - self.signal_rows()
    }

    pub fn class_counts(&self) -> BTreeMap<i64, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Scales every channel of every row by `1 / max|x|` over its samples so
    /// values land in `[-1, 1]`. All-zero channels are left as they are.
    pub fn normalized(&self) -> Array3<f32> {
        let mut features = self.features.clone();
        for mut row in features.outer_iter_mut() {
            for mut channel in row.outer_iter_mut() {
                let peak = match channel.as_slice() {
                    Some(values) => StatsHelper::max_abs(values),
                    None => channel.iter().fold(0.0f32, |acc, v| acc.max(v.abs())),
                };
                if peak > 0.0 {
                    channel.mapv_inplace(|v| v / peak);
                }
            }
        }
        features
    }
}

/// How many noise-only rows a split receives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseQuota {
    /// Enough rows to make up this fraction of the finished split.
    Fraction(f64),
    /// As many noise rows as signal rows.
    MatchSignal,
}

impl NoiseQuota {
    pub fn rows(&self, signal_rows: usize) -> SynthResult<usize> {
        match *self {
            NoiseQuota::Fraction(fraction) => {
                let rows = (fraction / (1.0 - fraction)) * signal_rows as f64;
                // `usize::MAX as f64` rounds up, so equality already overflows.
                if !rows.is_finite() || rows < 0.0 || rows >= usize::MAX as f64 {
                    return Err(SynthError::InvalidConfig(format!(
                        "noise fraction {} over {} signal rows does not fit a row count",
                        fraction, signal_rows
                    )));
                }
                Ok(rows as usize)
            }
            NoiseQuota::MatchSignal => Ok(signal_rows),
        }
    }
}

/// Row counts of one split, checked against the size of its feature tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitShape {
    pub signal_rows: usize,
    pub noise_rows: usize,
}

impl SplitShape {
    pub fn plan(plan: &SplitPlan<'_>, channels: usize, sample_count: usize) -> SynthResult<Self> {
        let signal_rows = plan
            .events
            .len()
            .checked_mul(plan.copies)
            .ok_or_else(|| overflow(plan.name, "signal rows"))?;
        let noise_rows = plan.noise.rows(signal_rows)?;
        let shape = Self {
            signal_rows,
            noise_rows,
        };
        let elements = shape
            .total()
            .ok_or_else(|| overflow(plan.name, "total rows"))?
            .checked_mul(channels)
            .and_then(|n| n.checked_mul(sample_count))
            .ok_or_else(|| overflow(plan.name, "feature elements"))?;
        match elements.checked_mul(std::mem::size_of::<f32>()) {
            Some(bytes) if bytes <= isize::MAX as usize => Ok(shape),
            _ => Err(overflow(plan.name, "feature bytes")),
        }
    }

    pub fn total(&self) -> Option<usize> {
        self.signal_rows.checked_add(self.noise_rows)
    }
}

fn overflow(split: SplitName, what: &str) -> SynthError {
    SynthError::InvalidConfig(format!("overflow computing {} of the {} split", what, split))
}

/// Events, copy count and noise quota for one split.
pub struct SplitPlan<'a> {
    pub name: SplitName,
    pub events: Vec<&'a Event>,
    pub copies: usize,
    pub noise: NoiseQuota,
}

/// Shared state threaded through every split of one generation run.
pub struct SplitContext<'r> {
    pub layout: FeatureLayout,
    pub sample_count: usize,
    pub parameter: ClassParameter,
    pub noise: &'r mut ThermalNoise,
    pub metrics: &'r GenerationMetrics,
    pub progress: &'r ProgressLog,
}

impl SplitContext<'_> {
    /// Draws every realization of `plan` straight into a preallocated tensor.
    pub fn synthesize<F>(&mut self, plan: &SplitPlan<'_>, label_of: F) -> SynthResult<LabeledSplit>
    where
        F: Fn(&Event) -> SynthResult<i64>,
    {
        let SplitShape {
            signal_rows,
            noise_rows,
        } = SplitShape::plan(plan, self.layout.channels(), self.sample_count)?;
        let total = signal_rows + noise_rows;

        let mut features =
            Array3::<f32>::zeros((total, self.layout.channels(), self.sample_count));
        let mut labels = Vec::with_capacity(total);
        let mut params = Vec::with_capacity(signal_rows);

        let mut row = 0;
        for event in &plan.events {
            let label = label_of(event)?;
            for _ in 0..plan.copies {
                let realization = self.noise.realize(&event.signal);
                self.layout
                    .fill(&realization, features.index_axis_mut(Axis(0), row));
                labels.push(label);
                params.push(event.parameter(self.parameter));
                row += 1;
            }
        }

        let silence = vec![Complex64::new(0.0, 0.0); self.sample_count];
        for _ in 0..noise_rows {
            let realization = self.noise.realize(&silence);
            self.layout
                .fill(&realization, features.index_axis_mut(Axis(0), row));
            labels.push(NOISE_LABEL);
            row += 1;
        }

        self.metrics.record_signal(signal_rows);
        self.metrics.record_noise(noise_rows);
        self.metrics.record_split();
        self.progress
            .split_finished(plan.name.as_str(), signal_rows, noise_rows);

        Ok(LabeledSplit {
            features,
            labels,
            params,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn noise_quota_matches_fraction_of_final_split() {
        assert_eq!(NoiseQuota::Fraction(0.2).rows(40).unwrap(), 10);
        assert_eq!(NoiseQuota::Fraction(0.0).rows(40).unwrap(), 0);
        assert_eq!(NoiseQuota::Fraction(0.5).rows(7).unwrap(), 7);
        assert_eq!(NoiseQuota::MatchSignal.rows(12).unwrap(), 12);
    }

    #[test]
    fn noise_quota_rejects_counts_beyond_usize() {
        assert!(matches!(
            NoiseQuota::Fraction(0.999_999_999).rows(usize::MAX / 4),
            Err(SynthError::InvalidConfig(_))
        ));
    }

    #[test]
    fn split_shape_rejects_oversized_tensors() {
        let event = Event::new(85.0, 18_600.0, vec![Complex64::new(1.0, 0.0); 8]);
        let copies_overflow = SplitPlan {
            name: SplitName::Train,
            events: vec![&event; 4],
            copies: usize::MAX / 2 + 1,
            noise: NoiseQuota::Fraction(0.0),
        };
        assert!(matches!(
            SplitShape::plan(&copies_overflow, 2, 8),
            Err(SynthError::InvalidConfig(_))
        ));

        let elements_overflow = SplitPlan {
            name: SplitName::Test,
            events: vec![&event; 2],
            copies: usize::MAX / 8,
            noise: NoiseQuota::MatchSignal,
        };
        assert!(matches!(
            SplitShape::plan(&elements_overflow, 2, 8),
            Err(SynthError::InvalidConfig(_))
        ));

        let fits = SplitPlan {
            name: SplitName::Val,
            events: vec![&event; 3],
            copies: 2,
            noise: NoiseQuota::MatchSignal,
        };
        let shape = SplitShape::plan(&fits, 3, 8).unwrap();
        assert_eq!(shape.signal_rows, 6);
        assert_eq!(shape.total(), Some(12));
    }

    #[test]
    fn class_counts_and_row_kinds() {
        let split = LabeledSplit {
            features: Array3::zeros((4, 2, 1)),
            labels: vec![1, 2, 2, 0],
            params: vec![0.0, 20.0, 20.0],
        };
        assert_eq!(split.signal_rows(), 3);
        assert_eq!(split.noise_rows(), 1);
        let counts = split.class_counts();
        assert_eq!(counts[&0], 1);
        assert_eq!(counts[&2], 2);
    }

    #[test]
    fn normalization_bounds_each_channel() {
        let split = LabeledSplit {
            features: array![[[2.0, -4.0], [0.0, 0.0]], [[0.5, 0.25], [-3.0, 1.5]]],
            labels: vec![1, 0],
            params: vec![1.0],
        };
        let expected: Array3<f32> =
            array![[[0.5, -1.0], [0.0, 0.0]], [[1.0, 0.5], [-1.0, 0.5]]];
        assert_eq!(split.normalized(), expected);
    }
}
