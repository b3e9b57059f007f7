//! Fallible buffer allocation for network construction.
//!
//! Network construction acquires exactly three buffers. Every acquisition goes
//! through a [`BufferAllocator`] so that an out-of-memory condition surfaces as
//! a [`NetworkError::Allocation`] instead of aborting the process.

use std::fmt;

use crate::errors::{NetworkError, NetworkResult};

/// The buffers a network owns, in the order they are allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferKind {
    LayerWidths,
    Weights,
    Activations,
}

impl BufferKind {
    pub const ALL: [BufferKind; 3] = [
        BufferKind::LayerWidths,
        BufferKind::Weights,
        BufferKind::Activations,
    ];
}

impl fmt::Display for BufferKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BufferKind::LayerWidths => "layer widths",
            BufferKind::Weights => "weights",
            BufferKind::Activations => "activations",
        })
    }
}

/// Source of the storage backing a network's buffers.
///
/// Implementations return an empty vector whose capacity is at least
/// `elements`, so filling it up to that length never reallocates.
pub trait BufferAllocator {
    fn allocate<T>(&self, buffer: BufferKind, elements: usize) -> NetworkResult<Vec<T>> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(elements)
            .map_err(|source| NetworkError::Allocation {
                buffer,
                elements,
                source,
            })?;
        Ok(storage)
    }
}

/// Allocates from the global allocator.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {}
