pub mod combiner;
pub mod features;
pub mod noise;

pub use combiner::SignalCombiner;
pub use features::FeatureLayout;
pub use noise::{NoiseModel, ThermalNoise};
