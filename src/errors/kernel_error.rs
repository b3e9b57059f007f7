//! Error types for dot-product kernel selection.

use thiserror::Error;

/// Errors that can occur when resolving a dot-product kernel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("Unknown kernel '{name}'. Supported: auto, scalar, sse, sse-dp")]
    UnknownKernel { name: String },

    #[error("The {kind} kernel is not supported by this CPU")]
    KernelUnavailable { kind: String },
}
