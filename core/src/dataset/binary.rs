use std::collections::BTreeMap;

use crate::dataset::config::SynthesisConfig;
use crate::dataset::event::{parity_split, ClassParameter, EventSet};
use crate::dataset::file::{DatasetFile, DatasetMeta};
use crate::dataset::split::{NoiseQuota, SplitContext, SplitName, SplitPlan};
use crate::prelude::{SignalDomain, SynthError, SynthResult};
use crate::processing::{FeatureLayout, ThermalNoise};
use crate::telemetry::{GenerationMetrics, ProgressLog};

/// Signal-vs-noise dataset over pitch-angle-sorted events.
///
/// Train rows come from even sorted positions, test rows from odd ones. The
/// val split is drawn from the test events again with fresh noise, and the
/// metadata flags it. Rows are always `[real, imag]`.
pub struct BinaryGenerator {
    config: SynthesisConfig,
    domain: SignalDomain,
}

impl BinaryGenerator {
    pub fn new(config: SynthesisConfig) -> SynthResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            domain: SignalDomain::Time,
        })
    }

    /// Records the domain the event signals are expressed in.
    pub fn with_domain(mut self, domain: SignalDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn generate(&self, events: &EventSet) -> SynthResult<DatasetFile> {
        let sample_count = events
            .sample_count()
            .ok_or_else(|| SynthError::InvalidConfig("no events to synthesize from".into()))?;

        let sorted = events.sorted_by(ClassParameter::PitchAngle);
        let (train, test) = parity_split(&sorted);
        let plans = [
            SplitPlan {
                name: SplitName::Train,
                events: train,
                copies: self.config.n_copies_train,
                noise: NoiseQuota::Fraction(self.config.percent_noise),
            },
            SplitPlan {
                name: SplitName::Test,
                events: test.clone(),
                copies: self.config.n_copies_test,
                noise: NoiseQuota::MatchSignal,
            },
            SplitPlan {
                name: SplitName::Val,
                events: test,
                copies: self.config.n_copies_test,
                noise: NoiseQuota::MatchSignal,
            },
        ];

        let mut noise = ThermalNoise::seeded(&self.config.noise, self.config.seed)?;
        let metrics = GenerationMetrics::new();
        let progress = ProgressLog::new("binary");
        let mut context = SplitContext {
            layout: FeatureLayout::IqOnly,
            sample_count,
            parameter: ClassParameter::PitchAngle,
            noise: &mut noise,
            metrics: &metrics,
            progress: &progress,
        };

        let mut splits = BTreeMap::new();
        for plan in &plans {
            splits.insert(plan.name, context.synthesize(plan, |_| Ok(1))?);
        }
        progress.run_finished(&metrics);

        Ok(DatasetFile {
            splits,
            meta: DatasetMeta {
                temperature_k: self.config.noise.temperature_k,
                noise_variance: self.config.noise.variance(),
                class_parameter: ClassParameter::PitchAngle,
                class_edges: Vec::new(),
                layout: FeatureLayout::IqOnly,
                domain: self.domain,
                seed: self.config.seed,
                val_duplicates_test: true,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::event::Event;
    use num_complex::Complex64;

    fn events(pitch_angles: &[f64]) -> EventSet {
        EventSet::new(
            pitch_angles
                .iter()
                .map(|&pa| Event::new(pa, 18_600.0, vec![Complex64::new(1e-8, 0.0); 16]))
                .collect(),
        )
        .unwrap()
    }

    fn config() -> SynthesisConfig {
        SynthesisConfig {
            n_copies_train: 2,
            n_copies_test: 3,
            percent_noise: 0.2,
            seed: 11,
            ..SynthesisConfig::default()
        }
    }

    #[test]
    fn binary_splits_have_expected_row_counts() {
        let dataset = BinaryGenerator::new(config())
            .unwrap()
            .generate(&events(&[30.0, 0.0, 20.0, 10.0]))
            .unwrap();

        let train = dataset.split(SplitName::Train).unwrap();
        assert_eq!(train.features.dim(), (5, 2, 16));
        assert_eq!(train.labels, vec![1, 1, 1, 1, 0]);
        assert_eq!(train.params, vec![0.0, 0.0, 20.0, 20.0]);

        let test = dataset.split(SplitName::Test).unwrap();
        assert_eq!(test.features.dim(), (12, 2, 16));
        assert_eq!(test.signal_rows(), 6);
        assert_eq!(test.params, vec![10.0, 10.0, 10.0, 30.0, 30.0, 30.0]);

        let val = dataset.split(SplitName::Val).unwrap();
        assert_eq!(val.labels, test.labels);
        assert_ne!(val.features, test.features);
        assert!(dataset.meta.val_duplicates_test);
    }

    #[test]
    fn binary_generation_is_reproducible_for_a_seed() {
        let set = events(&[1.0, 2.0, 3.0]);
        let a = BinaryGenerator::new(config()).unwrap().generate(&set).unwrap();
        let b = BinaryGenerator::new(config()).unwrap().generate(&set).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn binary_generation_needs_events() {
        let generator = BinaryGenerator::new(config()).unwrap();
        assert!(generator.generate(&EventSet::default()).is_err());
    }
}
