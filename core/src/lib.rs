//! Core acquisition and dataset-synthesis library for RF I/Q training data.
//!
//! The modules follow the offline pipeline: calibrated acquisitions are
//! combined into one composite signal per event, optionally moved into the
//! frequency domain, and then expanded into labeled noisy realizations.

pub mod acquisition;
pub mod dataset;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use prelude::{SignalDomain, SynthError, SynthResult};
