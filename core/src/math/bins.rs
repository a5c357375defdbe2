//! Contiguous class bins over a swept parameter.
//!
//! Unique parameter values are divided into contiguous groups the same way
//! `numpy.array_split` sizes them, and each group's smallest value becomes a
//! lower edge. Bin `k` covers `[edge_k, edge_{k+1})`; the last bin covers
//! `[edge_last, max]`. Lookup is a binary search over the edges, so every
//! in-range value lands in exactly one bin.

use serde::{Deserialize, Serialize};

use crate::prelude::{SynthError, SynthResult};

/// Group sizes for dividing `len` items into `parts` contiguous groups.
/// The first `len % parts` groups receive one extra item.
pub fn array_split_sizes(len: usize, parts: usize) -> Vec<usize> {
    if parts == 0 {
        return Vec::new();
    }
    let base = len / parts;
    let extra = len % parts;
    (0..parts).map(|idx| base + usize::from(idx < extra)).collect()
}

/// Sorted, deduplicated copy of `values`. NaN is rejected.
pub fn unique_sorted(values: &[f64]) -> SynthResult<Vec<f64>> {
    if values.iter().any(|v| v.is_nan()) {
        return Err(SynthError::InvalidConfig(
            "class parameter contains NaN".into(),
        ));
    }
    let mut unique = values.to_vec();
    unique.sort_by(f64::total_cmp);
    unique.dedup();
    Ok(unique)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassBins {
    lower_edges: Vec<f64>,
    upper: f64,
}

impl ClassBins {
    pub fn from_values(values: &[f64], n_classes: usize) -> SynthResult<Self> {
        if n_classes <= 1 {
            return Err(SynthError::InvalidConfig(format!(
                "multiclass generation needs more than one class, got {}",
                n_classes
            )));
        }
        let unique = unique_sorted(values)?;
        if unique.len() < n_classes {
            return Err(SynthError::InvalidConfig(format!(
                "cannot split {} distinct parameter values into {} classes",
                unique.len(),
                n_classes
            )));
        }

        let mut lower_edges = Vec::with_capacity(n_classes);
        let mut cursor = 0;
        for size in array_split_sizes(unique.len(), n_classes) {
            lower_edges.push(unique[cursor]);
            cursor += size;
        }

        Ok(Self {
            lower_edges,
            upper: unique[unique.len() - 1],
        })
    }

    pub fn len(&self) -> usize {
        self.lower_edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower_edges.is_empty()
    }

    pub fn edges(&self) -> &[f64] {
        &self.lower_edges
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// 1-based class label of the bin holding `value`.
    pub fn label(&self, value: f64) -> SynthResult<i64> {
        let low = self.lower_edges.first().copied().unwrap_or(f64::NAN);
        if !(value >= low && value <= self.upper) {
            return Err(SynthError::Unbinned {
                value,
                low,
                high: self.upper,
            });
        }
        let bin = self.lower_edges.partition_point(|&edge| edge <= value);
        Ok(bin as i64)
    }
}
