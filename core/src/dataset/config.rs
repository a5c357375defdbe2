use serde::{Deserialize, Serialize};

use crate::dataset::event::ClassParameter;
use crate::prelude::{SynthError, SynthResult};
use crate::processing::{FeatureLayout, NoiseModel};

/// Shared knobs for binary and multiclass generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Copies per event when the train/test/val split is disabled.
    pub n_copies: usize,
    pub n_copies_train: usize,
    pub n_copies_test: usize,
    /// Target fraction of noise-only rows in the training (or pooled) set.
    pub percent_noise: f64,
    pub noise: NoiseModel,
    pub layout: FeatureLayout,
    pub seed: u64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            n_copies: 32,
            n_copies_train: 32,
            n_copies_test: 8,
            percent_noise: 0.2,
            noise: NoiseModel::default(),
            layout: FeatureLayout::IqOnly,
            seed: 0,
        }
    }
}

impl SynthesisConfig {
    pub fn validate(&self) -> SynthResult<()> {
        if !(0.0..1.0).contains(&self.percent_noise) {
            return Err(SynthError::InvalidConfig(format!(
                "percent_noise must lie in [0, 1), got {}",
                self.percent_noise
            )));
        }
        self.noise.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MulticlassOptions {
    pub class_parameter: ClassParameter,
    pub n_classes: usize,
    /// Produce train/test/val; otherwise a single pooled set.
    pub split: bool,
    /// Label every signal row 1 instead of binning the class parameter.
    pub binary: bool,
}

impl Default for MulticlassOptions {
    fn default() -> Self {
        Self {
            class_parameter: ClassParameter::PitchAngle,
            n_classes: 4,
            split: true,
            binary: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_noise_must_stay_below_one() {
        let mut config = SynthesisConfig::default();
        assert!(config.validate().is_ok());
        config.percent_noise = 1.0;
        assert!(config.validate().is_err());
        config.percent_noise = -0.1;
        assert!(config.validate().is_err());
    }
}
