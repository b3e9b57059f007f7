//! Inference latency microbenchmark for fully connected feed-forward networks.
//!
//! The library builds a network with seeded random weights, runs the forward
//! pass with a selectable dot-product kernel (scalar, SSE with a software
//! horizontal reduction, or SSE4.1 `dpps`), and measures how long each pass
//! takes.

pub mod allocator;
pub mod benchmarks;
pub mod errors;
pub mod network;
pub mod topology;
pub mod utils;

pub use allocator::{BufferAllocator, BufferKind, SystemAllocator};
pub use errors::{KernelError, NetworkError};
pub use network::{Network, NetworkState};
pub use topology::Topology;
pub use utils::dot::{DotKernel, KernelChoice, KernelKind};
