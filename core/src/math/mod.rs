pub mod bins;
pub mod fft;
pub mod stats;

pub use bins::ClassBins;
pub use fft::FftHelper;
pub use stats::StatsHelper;
