use anyhow::Context;
use iqsynthcore::acquisition::Calibration;
use iqsynthcore::dataset::{MulticlassOptions, SynthesisConfig};
use iqsynthcore::SignalDomain;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::generator::profile::SyntheticEventConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Binary,
    #[default]
    Multiclass,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub mode: GenerationMode,
    pub domain: SignalDomain,
    pub output: PathBuf,
    /// YAML list of egg files with their swept parameters.
    pub manifest: Option<PathBuf>,
    /// Used when no manifest is given.
    pub synthetic: Option<SyntheticEventConfig>,
    pub calibration: Calibration,
    pub synthesis: SynthesisConfig,
    pub multiclass: MulticlassOptions,
    /// Noise temperatures to sweep; empty means `synthesis.noise.temperature_k`.
    pub temperatures: Vec<f64>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            mode: GenerationMode::Multiclass,
            domain: SignalDomain::Time,
            output: PathBuf::from("datasets/dataset.json"),
            manifest: None,
            synthetic: None,
            calibration: Calibration::default(),
            synthesis: SynthesisConfig::default(),
            multiclass: MulticlassOptions::default(),
            temperatures: Vec::new(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn temperatures(&self) -> Vec<f64> {
        if self.temperatures.is_empty() {
            vec![self.synthesis.noise.temperature_k]
        } else {
            self.temperatures.clone()
        }
    }

    /// Output path for one temperature of the sweep. Single-temperature runs
    /// write to `output` unchanged.
    pub fn output_for(&self, temperature: f64) -> PathBuf {
        if self.temperatures().len() <= 1 {
            return self.output.clone();
        }
        let stem = self
            .output
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let file_name = match self.output.extension() {
            Some(ext) => format!("{}_temp{}.{}", stem, temperature, ext.to_string_lossy()),
            None => format!("{}_temp{}", stem, temperature),
        };
        self.output.with_file_name(file_name)
    }
}
