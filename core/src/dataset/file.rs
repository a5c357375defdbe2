use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::dataset::event::ClassParameter;
use crate::dataset::split::{LabeledSplit, SplitName};
use crate::prelude::{SignalDomain, SynthResult};
use crate::processing::FeatureLayout;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMeta {
    pub temperature_k: f64,
    pub noise_variance: f64,
    pub class_parameter: ClassParameter,
    /// Lower bin edges; empty when every signal row is labeled 1.
    pub class_edges: Vec<f64>,
    pub layout: FeatureLayout,
    pub domain: SignalDomain,
    pub seed: u64,
    /// The val split is drawn from the same events as the test split.
    pub val_duplicates_test: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetFile {
    pub splits: BTreeMap<SplitName, LabeledSplit>,
    pub meta: DatasetMeta,
}

impl DatasetFile {
    pub fn split(&self, name: SplitName) -> Option<&LabeledSplit> {
        self.splits.get(&name)
    }

    pub fn total_rows(&self) -> usize {
        self.splits.values().map(LabeledSplit::len).sum()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SynthResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Serializes a dataset as a single JSON blob.
pub struct DatasetWriter;

impl DatasetWriter {
    pub fn write<P: AsRef<Path>>(dataset: &DatasetFile, path: P) -> SynthResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, dataset)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn sample_dataset() -> DatasetFile {
        let mut features = Array3::<f32>::zeros((3, 2, 4));
        features[[0, 0, 1]] = 0.25;
        features[[2, 1, 3]] = -1.5e-9;
        let mut splits = BTreeMap::new();
        splits.insert(
            SplitName::Train,
            LabeledSplit {
                features,
                labels: vec![1, 2, 0],
                params: vec![85.5, 88.25],
            },
        );
        DatasetFile {
            splits,
            meta: DatasetMeta {
                temperature_k: 10.0,
                noise_variance: 3.37e-17,
                class_parameter: ClassParameter::PitchAngle,
                class_edges: vec![85.0, 87.0],
                layout: FeatureLayout::IqOnly,
                domain: SignalDomain::Time,
                seed: 9,
                val_duplicates_test: true,
            },
        }
    }

    #[test]
    fn dataset_survives_write_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dataset.json");
        let dataset = sample_dataset();

        DatasetWriter::write(&dataset, &path).unwrap();
        let loaded = DatasetFile::load(&path).unwrap();

        assert_eq!(loaded, dataset);
        assert_eq!(loaded.total_rows(), 3);
        assert!(loaded.split(SplitName::Test).is_none());
    }

    #[test]
    fn split_names_serialize_as_lowercase_keys() {
        let text = serde_json::to_string(&sample_dataset()).unwrap();
        assert!(text.contains("\"train\""));
        assert!(text.contains("\"iq_only\""));
    }
}
