pub mod log;
pub mod metrics;

pub use log::ProgressLog;
pub use metrics::GenerationMetrics;
