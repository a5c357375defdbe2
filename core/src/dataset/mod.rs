//! Labeled dataset synthesis from composite event signals.

pub mod binary;
pub mod config;
pub mod event;
pub mod file;
pub mod multiclass;
pub mod split;

pub use binary::BinaryGenerator;
pub use config::{MulticlassOptions, SynthesisConfig};
pub use event::{ClassParameter, Event, EventSet};
pub use file::{DatasetFile, DatasetMeta, DatasetWriter};
pub use multiclass::MulticlassGenerator;
pub use split::{LabeledSplit, SplitName, NOISE_LABEL};
