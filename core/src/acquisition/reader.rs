use log::debug;
use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::acquisition::channel::channel_indices;
use crate::math::stats::StatsHelper;
use crate::prelude::{SynthError, SynthResult};

/// ADC calibration applied after DC-offset removal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// Full-scale voltage range of the digitizer, in volts.
    pub voltage_range: f64,
    pub bit_depth: u32,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            voltage_range: 5.5e-8,
            bit_depth: 8,
        }
    }
}

impl Calibration {
    /// Volts per ADC count.
    pub fn scale(&self) -> f64 {
        self.voltage_range / f64::from(self.bit_depth).exp2()
    }
}

/// Uncalibrated contents of one acquisition container.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAcquisition {
    pub channel_names: Vec<String>,
    /// First acquisition row, channel-major with I and Q interleaved per sample.
    pub interleaved: Vec<f64>,
    /// Declared `[rows, row_length]` of the stored acquisition array.
    pub shape: [usize; 2],
}

impl RawAcquisition {
    /// Wraps a single stored row.
    pub fn single_row(channel_names: Vec<String>, interleaved: Vec<f64>) -> Self {
        let shape = [1, interleaved.len()];
        Self {
            channel_names,
            interleaved,
            shape,
        }
    }
}

/// Calibrated complex samples, one row per channel in storage order.
#[derive(Debug, Clone)]
pub struct Acquisition {
    pub channel_indices: Vec<usize>,
    pub samples: Array2<Complex64>,
}

impl Acquisition {
    pub fn channel_count(&self) -> usize {
        self.samples.nrows()
    }

    pub fn sample_count(&self) -> usize {
        self.samples.ncols()
    }
}

/// Anything that can hand over the raw contents of an acquisition.
pub trait AcquisitionSource {
    fn extract(&self) -> SynthResult<RawAcquisition>;
}

impl AcquisitionSource for RawAcquisition {
    fn extract(&self) -> SynthResult<RawAcquisition> {
        Ok(self.clone())
    }
}

pub struct AcquisitionReader {
    calibration: Calibration,
}

impl AcquisitionReader {
    pub fn new(calibration: Calibration) -> Self {
        Self { calibration }
    }

    pub fn calibration(&self) -> Calibration {
        self.calibration
    }

    pub fn load<S: AcquisitionSource>(&self, source: &S) -> SynthResult<Acquisition> {
        let raw = source.extract()?;
        self.calibrate(&raw)
    }

    /// Opens an egg container, extracts its first acquisition and closes the
    /// file before calibrating.
    #[cfg(feature = "hdf5")]
    pub fn read<P: AsRef<std::path::Path>>(&self, path: P) -> SynthResult<Acquisition> {
        let raw = crate::acquisition::egg::EggFile::open(path)?.extract()?;
        self.calibrate(&raw)
    }

    pub fn calibrate(&self, raw: &RawAcquisition) -> SynthResult<Acquisition> {
        let channel_count = raw.channel_names.len();
        if channel_count == 0 {
            return Err(SynthError::Layout("acquisition declares no channels".into()));
        }
        let channel_indices = channel_indices(&raw.channel_names)?;

        let [rows, row_length] = raw.shape;
        if rows == 0 || raw.interleaved.len() != row_length {
            return Err(SynthError::Layout(format!(
                "row of {} values does not match declared shape {:?}",
                raw.interleaved.len(),
                raw.shape
            )));
        }

        let stride = 2 * channel_count;
        if raw.interleaved.is_empty() || raw.interleaved.len() % stride != 0 {
            return Err(SynthError::Layout(format!(
                "{} values cannot hold interleaved I/Q for {} channels",
                raw.interleaved.len(),
                channel_count
            )));
        }
        let sample_count = raw.interleaved.len() / stride;
        let scale = self.calibration.scale();

        let mut samples = Array2::<Complex64>::zeros((channel_count, sample_count));
        for (channel, block) in raw.interleaved.chunks_exact(2 * sample_count).enumerate() {
            let i_mean = StatsHelper::mean(block.iter().step_by(2).copied());
            let q_mean = StatsHelper::mean(block.iter().skip(1).step_by(2).copied());
            for (slot, pair) in samples.row_mut(channel).iter_mut().zip(block.chunks_exact(2)) {
                *slot = Complex64::new((pair[0] - i_mean) * scale, (pair[1] - q_mean) * scale);
            }
            debug!(
                "channel {} calibrated: I offset {:.3}, Q offset {:.3}",
                channel_indices[channel], i_mean, q_mean
            );
        }

        Ok(Acquisition {
            channel_indices,
            samples,
        })
    }
}

impl Default for AcquisitionReader {
    fn default() -> Self {
        Self::new(Calibration::default())
    }
}
