pub mod channel;
#[cfg(feature = "hdf5")]
pub mod egg;
pub mod reader;

pub use channel::parse_channel_index;
#[cfg(feature = "hdf5")]
pub use egg::EggFile;
pub use reader::{Acquisition, AcquisitionReader, AcquisitionSource, Calibration, RawAcquisition};
