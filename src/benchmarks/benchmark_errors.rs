//! Error types for benchmark operations.

use std::error::Error;
use std::fmt;

use crate::errors::{KernelError, NetworkError};

#[derive(Debug)]
pub enum BenchmarkError {
    ConfigParseError {
        path: String,
        source: serde_json::Error,
    },
    ConfigValidationError {
        field: String,
        message: String,
    },
    IoError {
        source: std::io::Error,
    },
    InvalidRepetitions {
        value: u32,
    },
    InvalidArguments {
        message: String,
    },
    NetworkError {
        source: NetworkError,
    },
    KernelError {
        source: KernelError,
    },
    OutputMismatch {
        kernel: String,
        baseline: String,
    },
}

impl fmt::Display for BenchmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchmarkError::ConfigParseError { path, source } => {
                write!(
                    f,
                    "Failed to parse configuration file '{}': {}",
                    path, source
                )
            }
            BenchmarkError::ConfigValidationError { field, message } => {
                write!(
                    f,
                    "Configuration validation error for field '{}': {}",
                    field, message
                )
            }
            BenchmarkError::IoError { source } => {
                write!(f, "IO error: {}", source)
            }
            BenchmarkError::InvalidRepetitions { value } => {
                write!(
                    f,
                    "Invalid number of repetitions: {}. Must be greater than 0",
                    value
                )
            }
            BenchmarkError::InvalidArguments { message } => {
                write!(f, "Invalid arguments: {}", message)
            }
            BenchmarkError::NetworkError { source } => {
                write!(f, "Couldn't initialize network: {}", source)
            }
            BenchmarkError::KernelError { source } => {
                write!(f, "Kernel selection failed: {}", source)
            }
            BenchmarkError::OutputMismatch { kernel, baseline } => {
                write!(
                    f,
                    "Outputs of the {} kernel do not match the {} baseline",
                    kernel, baseline
                )
            }
        }
    }
}

impl Error for BenchmarkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            BenchmarkError::ConfigParseError { source, .. } => Some(source),
            BenchmarkError::IoError { source } => Some(source),
            BenchmarkError::NetworkError { source } => Some(source),
            BenchmarkError::KernelError { source } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for BenchmarkError {
    fn from(error: std::io::Error) -> Self {
        BenchmarkError::IoError { source: error }
    }
}

impl From<NetworkError> for BenchmarkError {
    fn from(error: NetworkError) -> Self {
        BenchmarkError::NetworkError { source: error }
    }
}

impl From<KernelError> for BenchmarkError {
    fn from(error: KernelError) -> Self {
        BenchmarkError::KernelError { source: error }
    }
}

pub type BenchmarkResult<T> = Result<T, BenchmarkError>;
