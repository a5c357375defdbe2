use ndarray::ArrayViewMut2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::prelude::{SynthError, SynthResult};

/// Channel layout of one feature tensor row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureLayout {
    /// `[real, imag]`
    #[default]
    IqOnly,
    /// `[real, imag, real^2 + imag^2]`
    IqPower,
}

impl FeatureLayout {
    pub fn channels(&self) -> usize {
        match self {
            FeatureLayout::IqOnly => 2,
            FeatureLayout::IqPower => 3,
        }
    }

    pub fn from_channel_count(channels: usize) -> SynthResult<Self> {
        match channels {
            2 => Ok(FeatureLayout::IqOnly),
            3 => Ok(FeatureLayout::IqPower),
            other => Err(SynthError::InvalidConfig(format!(
                "feature tensors have 2 or 3 channels, got {}",
                other
            ))),
        }
    }

    /// Writes one realization into a `(channels, samples)` row.
    pub fn fill(&self, realization: &[Complex64], mut row: ArrayViewMut2<f32>) {
        debug_assert_eq!(row.nrows(), self.channels());
        debug_assert_eq!(row.ncols(), realization.len());
        for (t, value) in realization.iter().enumerate() {
            row[[0, t]] = value.re as f32;
            row[[1, t]] = value.im as f32;
            if *self == FeatureLayout::IqPower {
                row[[2, t]] = value.norm_sqr() as f32;
            }
        }
    }
}
