use crate::generator::manifest::EventManifest;
use crate::generator::profile::build_synthetic_events;
use crate::workflow::config::{GenerationMode, WorkflowConfig};
use anyhow::Context;
use iqsynthcore::acquisition::AcquisitionReader;
use iqsynthcore::dataset::{
    BinaryGenerator, DatasetFile, DatasetWriter, EventSet, MulticlassGenerator, SplitName,
};
use log::info;
use std::collections::BTreeMap;
use std::path::PathBuf;

pub struct RunSummary {
    pub output: PathBuf,
    pub temperature_k: f64,
    /// `(signal_rows, noise_rows)` per split.
    pub rows: BTreeMap<SplitName, (usize, usize)>,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Builds the event table from the manifest, or from the synthetic sweep
    /// when no manifest is configured, and moves it into the target domain.
    pub fn load_events(&self) -> anyhow::Result<EventSet> {
        let events = if let Some(path) = &self.config.manifest {
            let manifest = EventManifest::load(path)?;
            let reader = AcquisitionReader::new(self.config.calibration);
            manifest
                .build_events(&reader)
                .with_context(|| format!("building events from {}", path.display()))?
        } else if let Some(synthetic) = &self.config.synthetic {
            build_synthetic_events(synthetic)?
        } else {
            anyhow::bail!("workflow names neither a manifest nor a synthetic event sweep");
        };
        info!(
            "loaded {} events with {} samples each",
            events.len(),
            events.sample_count().unwrap_or(0)
        );
        Ok(events.into_domain(self.config.domain))
    }

    /// Generates the dataset for one noise temperature. Each temperature of a
    /// sweep gets its own seed offset so the noise draws stay independent.
    pub fn generate(
        &self,
        events: &EventSet,
        temperature_k: f64,
        sweep_index: usize,
    ) -> anyhow::Result<DatasetFile> {
        let mut synthesis = self.config.synthesis.clone();
        synthesis.noise = synthesis.noise.with_temperature(temperature_k);
        synthesis.seed = synthesis.seed.wrapping_add(sweep_index as u64);

        let dataset = match self.config.mode {
            GenerationMode::Binary => BinaryGenerator::new(synthesis)
                .context("configuring binary generator")?
                .with_domain(self.config.domain)
                .generate(events)
                .context("generating binary dataset")?,
            GenerationMode::Multiclass => {
                MulticlassGenerator::new(synthesis, self.config.multiclass.clone())
                    .context("configuring multiclass generator")?
                    .with_domain(self.config.domain)
                    .generate(events)
                    .context("generating multiclass dataset")?
            }
        };
        Ok(dataset)
    }

    pub fn execute(&self, events: &EventSet) -> anyhow::Result<Vec<RunSummary>> {
        let mut summaries = Vec::new();
        for (sweep_index, temperature_k) in self.config.temperatures().into_iter().enumerate() {
            let dataset = self.generate(events, temperature_k, sweep_index)?;
            let output = self.config.output_for(temperature_k);
            DatasetWriter::write(&dataset, &output)
                .with_context(|| format!("writing dataset {}", output.display()))?;
            info!("wrote {} rows to {}", dataset.total_rows(), output.display());

            let rows = dataset
                .splits
                .iter()
                .map(|(name, split)| (*name, (split.signal_rows(), split.noise_rows())))
                .collect();
            summaries.push(RunSummary {
                output,
                temperature_k,
                rows,
            });
        }
        Ok(summaries)
    }
}
