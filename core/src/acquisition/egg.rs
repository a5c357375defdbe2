//! HDF5 "egg" containers written by the digitizer DAQ.
//!
//! Only the first acquisition of the first stream is extracted. Channel names
//! come from the members of the top-level `channels` group.

use hdf5::File;
use ndarray::s;
use std::path::Path;

use crate::acquisition::reader::{AcquisitionSource, RawAcquisition};
use crate::prelude::{SynthError, SynthResult};

pub const ACQUISITION_PATH: &str = "streams/stream0/acquisitions/0";
pub const CHANNELS_GROUP: &str = "channels";

pub struct EggFile {
    file: File,
}

impl EggFile {
    pub fn open<P: AsRef<Path>>(path: P) -> SynthResult<Self> {
        Ok(Self {
            file: File::open(path)?,
        })
    }
}

impl AcquisitionSource for EggFile {
    fn extract(&self) -> SynthResult<RawAcquisition> {
        let channel_names = self.file.group(CHANNELS_GROUP)?.member_names()?;
        let dataset = self.file.dataset(ACQUISITION_PATH)?;

        let shape = dataset.shape();
        if shape.len() != 2 || shape[0] == 0 {
            return Err(SynthError::Layout(format!(
                "expected a 2-D acquisition array with at least one row, found shape {:?}",
                shape
            )));
        }

        let row = dataset.read_slice_1d::<f64, _>(s![0, ..])?;

        Ok(RawAcquisition {
            channel_names,
            interleaved: row.to_vec(),
            shape: [shape[0], shape[1]],
        })
    }
}
