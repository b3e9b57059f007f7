//! Error types for network construction and inference.

use std::collections::TryReserveError;

use thiserror::Error;

use crate::allocator::BufferKind;

/// Errors that can occur while building a network or running inference on it.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Couldn't allocate the {buffer} buffer ({elements} elements)")]
    Allocation {
        buffer: BufferKind,
        elements: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("The {what} of the requested topology overflows the addressable size")]
    CapacityOverflow { what: &'static str },

    #[error("Input size mismatch: expected {expected} values, got {actual}")]
    InputSizeMismatch { expected: usize, actual: usize },

    #[error("The network has been torn down and can no longer run inference")]
    TornDown,
}

impl NetworkError {
    /// Returns the buffer whose allocation failed, if this is an allocation error.
    pub fn failed_buffer(&self) -> Option<BufferKind> {
        match self {
            NetworkError::Allocation { buffer, .. } => Some(*buffer),
            _ => None,
        }
    }
}
