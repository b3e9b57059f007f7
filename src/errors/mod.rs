//! Error types for the inference benchmark library.
//!
//! Each concern gets its own error enum so callers can match on the exact
//! failure instead of inspecting a generic `anyhow`/`Box<dyn Error>` wrapper.

mod kernel_error;
mod network_error;

pub use kernel_error::KernelError;
pub use network_error::NetworkError;

/// Result type alias for network construction and inference.
pub type NetworkResult<T> = std::result::Result<T, NetworkError>;

/// Result type alias for dot-product kernel selection.
pub type KernelResult<T> = std::result::Result<T, KernelError>;
