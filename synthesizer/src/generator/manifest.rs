use anyhow::Context;
use iqsynthcore::acquisition::{Acquisition, AcquisitionReader};
use iqsynthcore::dataset::{Event, EventSet};
use iqsynthcore::processing::SignalCombiner;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// One egg file and the parameters of the event it recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: PathBuf,
    pub pitch_angle: f64,
    pub energy: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventManifest {
    pub events: Vec<ManifestEntry>,
}

impl EventManifest {
    /// Loads a manifest; relative egg paths resolve against its directory.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading event manifest {}", path_ref.display()))?;
        let mut manifest: EventManifest = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing event manifest {}", path_ref.display()))?;

        if let Some(base) = path_ref.parent() {
            for entry in &mut manifest.events {
                if entry.path.is_relative() {
                    entry.path = base.join(&entry.path);
                }
            }
        }
        Ok(manifest)
    }

    pub fn build_events(&self, reader: &AcquisitionReader) -> anyhow::Result<EventSet> {
        let events = self
            .events
            .iter()
            .map(|entry| read_event(reader, entry))
            .collect::<anyhow::Result<Vec<_>>>()?;
        EventSet::new(events).context("assembling manifest events")
    }
}

/// Sums the calibrated channels into the event's composite signal.
#[cfg_attr(not(feature = "hdf5"), allow(dead_code))]
pub fn event_from_acquisition(
    entry: &ManifestEntry,
    acquisition: &Acquisition,
) -> anyhow::Result<Event> {
    let signal = SignalCombiner::combine_acquisition(acquisition)
        .with_context(|| format!("combining channels of {}", entry.path.display()))?;
    Ok(Event::new(entry.pitch_angle, entry.energy, signal))
}

#[cfg(feature = "hdf5")]
fn read_event(reader: &AcquisitionReader, entry: &ManifestEntry) -> anyhow::Result<Event> {
    let acquisition = reader
        .read(&entry.path)
        .with_context(|| format!("reading egg {}", entry.path.display()))?;
    event_from_acquisition(entry, &acquisition)
}

#[cfg(not(feature = "hdf5"))]
fn read_event(_reader: &AcquisitionReader, entry: &ManifestEntry) -> anyhow::Result<Event> {
    anyhow::bail!(
        "cannot read {}: built without the `hdf5` feature",
        entry.path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use iqsynthcore::acquisition::{Calibration, RawAcquisition};
    use num_complex::Complex64;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn manifest_paths_resolve_against_manifest_dir() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"events:\n  - path: eggs/pa85.egg\n    pitch_angle: 85.0\n    energy: 18600.0\n  - path: /data/pa86.egg\n    pitch_angle: 86.0\n    energy: 18600.0\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let manifest = EventManifest::load(&path).unwrap();

        let base = path.parent().unwrap();
        assert_eq!(manifest.events[0].path, base.join("eggs/pa85.egg"));
        assert_eq!(manifest.events[1].path, PathBuf::from("/data/pa86.egg"));
        assert_eq!(manifest.events[1].pitch_angle, 86.0);
    }

    #[test]
    fn acquisition_channels_become_one_event_signal() {
        let reader = AcquisitionReader::new(Calibration {
            voltage_range: 4.0,
            bit_depth: 2,
        });
        let raw = RawAcquisition::single_row(
            vec!["channel0".into(), "channel1".into()],
            vec![1.0, 0.0, 3.0, 2.0, 5.0, 5.0, 7.0, 5.0],
        );
        let acquisition = reader.load(&raw).unwrap();
        let entry = ManifestEntry {
            path: PathBuf::from("pa87.egg"),
            pitch_angle: 87.0,
            energy: 18_575.0,
        };

        let event = event_from_acquisition(&entry, &acquisition).unwrap();
        assert_eq!(event.pitch_angle, 87.0);
        assert_eq!(
            event.signal,
            vec![Complex64::new(-2.0, -1.0), Complex64::new(2.0, 1.0)]
        );
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn eggs_need_the_hdf5_feature() {
        let manifest = EventManifest {
            events: vec![ManifestEntry {
                path: PathBuf::from("missing.egg"),
                pitch_angle: 85.0,
                energy: 18_600.0,
            }],
        };
        let err = manifest
            .build_events(&AcquisitionReader::default())
            .unwrap_err();
        assert!(err.to_string().contains("hdf5"));
    }
}
