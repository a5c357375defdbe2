use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Common error type for acquisition reading and dataset synthesis.
#[derive(thiserror::Error, Debug)]
pub enum SynthError {
    #[error("acquisition layout: {0}")]
    Layout(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("parameter {value} lies outside the class bins [{low}, {high}]")]
    Unbinned { value: f64, low: f64, high: f64 },
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    #[cfg(feature = "hdf5")]
    #[error("container failure: {0}")]
    Container(#[from] hdf5::Error),
}

pub type SynthResult<T> = Result<T, SynthError>;

/// Domain the composite event signals are expressed in before noise injection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDomain {
    #[default]
    Time,
    Freq,
}

impl SignalDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDomain::Time => "time",
            SignalDomain::Freq => "freq",
        }
    }
}

impl fmt::Display for SignalDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalDomain {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "time" => Ok(SignalDomain::Time),
            "freq" | "frequency" => Ok(SignalDomain::Freq),
            other => Err(format!("unknown signal domain `{}`", other)),
        }
    }
}
