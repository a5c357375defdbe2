use std::collections::BTreeMap;

use crate::dataset::config::{MulticlassOptions, SynthesisConfig};
use crate::dataset::event::{parity_split, EventSet};
use crate::dataset::file::{DatasetFile, DatasetMeta};
use crate::dataset::split::{NoiseQuota, SplitContext, SplitName, SplitPlan};
use crate::math::bins::ClassBins;
use crate::prelude::{SignalDomain, SynthError, SynthResult};
use crate::processing::ThermalNoise;
use crate::telemetry::{GenerationMetrics, ProgressLog};

/// Dataset whose signal rows are labeled by class bin of a swept parameter.
pub struct MulticlassGenerator {
    config: SynthesisConfig,
    options: MulticlassOptions,
    domain: SignalDomain,
}

impl MulticlassGenerator {
    pub fn new(config: SynthesisConfig, options: MulticlassOptions) -> SynthResult<Self> {
        config.validate()?;
        if !options.binary && options.n_classes <= 1 {
            return Err(SynthError::InvalidConfig(format!(
                "multiclass generation needs more than one class, got {}",
                options.n_classes
            )));
        }
        Ok(Self {
            config,
            options,
            domain: SignalDomain::Time,
        })
    }

    pub fn with_domain(mut self, domain: SignalDomain) -> Self {
        self.domain = domain;
        self
    }

    pub fn generate(&self, events: &EventSet) -> SynthResult<DatasetFile> {
        let sample_count = events
            .sample_count()
            .ok_or_else(|| SynthError::InvalidConfig("no events to synthesize from".into()))?;
        let parameter = self.options.class_parameter;

        let bins = if self.options.binary {
            None
        } else {
            Some(ClassBins::from_values(
                &events.parameters(parameter),
                self.options.n_classes,
            )?)
        };

        let sorted = events.sorted_by(parameter);
        let plans = if self.options.split {
            let (train, test) = parity_split(&sorted);
            vec![
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
            ]
        } else {
            vec![SplitPlan {
                name: SplitName::All,
                events: sorted,
                copies: self.config.n_copies,
                noise: NoiseQuota::Fraction(self.config.percent_noise),
            }]
        };

        let mut noise = ThermalNoise::seeded(&self.config.noise, self.config.seed)?;
        let metrics = GenerationMetrics::new();
        let progress = ProgressLog::new("multiclass");
        let mut context = SplitContext {
            layout: self.config.layout,
            sample_count,
            parameter,
            noise: &mut noise,
            metrics: &metrics,
            progress: &progress,
        };

        let mut splits = BTreeMap::new();
        for plan in &plans {
            let split = context.synthesize(plan, |event| match &bins {
                Some(bins) => bins.label(event.parameter(parameter)),
                None => Ok(1),
            })?;
            splits.insert(plan.name, split);
        }
        progress.run_finished(&metrics);

        Ok(DatasetFile {
            splits,
            meta: DatasetMeta {
                temperature_k: self.config.noise.temperature_k,
                noise_variance: self.config.noise.variance(),
                class_parameter: parameter,
                class_edges: bins.map(|b| b.edges().to_vec()).unwrap_or_default(),
                layout: self.config.layout,
                domain: self.domain,
                seed: self.config.seed,
                val_duplicates_test: self.options.split,
            },
        })
    }
}
