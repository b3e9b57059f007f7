//! Low-level numeric helpers shared by the network engine.

pub mod dot;

pub use dot::{DotKernel, KernelChoice, KernelKind, VECTOR_WIDTH, dot_scalar};
