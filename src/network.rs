//! Forward-pass engine for fully connected feed-forward networks.
//!
//! A [`Network`] owns its layer widths, a flat weight buffer and a flat
//! activation buffer. The activation buffer is an arena split into one segment
//! per layer: segment 0 receives a copy of the input, the last segment holds
//! the output. It is rewritten by every call to [`Network::infer`].
//!
//! Weights are stored layer by layer, neuron by neuron, input by input, so the
//! weights of one neuron form a contiguous block as long as the previous layer.

use std::fmt;
use std::ops::Range;

use log::debug;
use rand::Rng;

use crate::allocator::{BufferAllocator, BufferKind, SystemAllocator};
use crate::errors::{NetworkError, NetworkResult};
use crate::topology::Topology;
use crate::utils::dot::DotKernel;

/// Lower bound (inclusive) of the initial weights.
pub const WEIGHT_MIN: f32 = -0.5;

/// Upper bound (exclusive) of the initial weights.
pub const WEIGHT_MAX: f32 = 0.5;

/// Lifecycle of a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkState {
    /// Buffers are allocated and inference can run.
    Ready,
    /// Buffers were released; the network is inert.
    TornDown,
}

/// A linear, fully connected network (no activation functions).
pub struct Network {
    topology: Topology,
    kernel: DotKernel,
    total_node_count: usize,
    weight_count: usize,
    layer_widths: Vec<usize>,
    weights: Vec<f32>,
    activations: Vec<f32>,
    state: NetworkState,
}

impl Network {
    /// Builds a network and fills its weights with values drawn uniformly from
    /// `[WEIGHT_MIN, WEIGHT_MAX)` using `rng`.
    pub fn new<R: Rng>(
        topology: Topology,
        kernel: DotKernel,
        rng: &mut R,
    ) -> NetworkResult<Self> {
        Self::with_allocator(topology, kernel, rng, &SystemAllocator)
    }

    /// Same as [`Network::new`], acquiring buffers from `allocator`.
    ///
    /// If any allocation fails, the buffers acquired so far are released before
    /// the error is returned.
    pub fn with_allocator<R: Rng, A: BufferAllocator>(
        topology: Topology,
        kernel: DotKernel,
        rng: &mut R,
        allocator: &A,
    ) -> NetworkResult<Self> {
        let layer_count = topology.layer_count()?;
        let total_node_count = topology.total_node_count()?;
        let weight_count = topology.weight_count()?;

        let mut layer_widths = allocator.allocate::<usize>(BufferKind::LayerWidths, layer_count)?;
        layer_widths.extend(topology.layer_widths());

        let mut weights = allocator.allocate::<f32>(BufferKind::Weights, weight_count)?;
        weights.extend((0..weight_count).map(|_| rng.random_range(WEIGHT_MIN..WEIGHT_MAX)));

        let mut activations =
            allocator.allocate::<f32>(BufferKind::Activations, total_node_count)?;
        activations.resize(total_node_count, 0.0);

        debug!(
            "Built network {:?} with {} weights, {} nodes, {} kernel",
            layer_widths, weight_count, total_node_count, kernel
        );

        Ok(Self {
            topology,
            kernel,
            total_node_count,
            weight_count,
            layer_widths,
            weights,
            activations,
            state: NetworkState::Ready,
        })
    }

    /// Runs one forward pass and returns the output segment.
    ///
    /// The returned slice borrows the activation buffer, so it stays valid
    /// only until the next call that needs `&mut self`.
    pub fn infer(&mut self, inputs: &[f32]) -> NetworkResult<&[f32]> {
        if self.state == NetworkState::TornDown {
            return Err(NetworkError::TornDown);
        }

        let input_count = self.topology.input_count;
        if inputs.len() != input_count {
            return Err(NetworkError::InputSizeMismatch {
                expected: input_count,
                actual: inputs.len(),
            });
        }

        self.activations[..input_count].copy_from_slice(inputs);

        let kernel = self.kernel;
        let mut weight_cursor = 0usize;
        let mut input_start = 0usize;

        for pair in self.layer_widths.windows(2) {
            let (previous_width, width) = (pair[0], pair[1]);
            let output_start = input_start + previous_width;

            // Everything before `output_start` has been computed already; the
            // current layer is written strictly after it.
            let (computed, pending) = self.activations.split_at_mut(output_start);
            let layer_input = &computed[input_start..];

            for activation in &mut pending[..width] {
                let neuron_weights = &self.weights[weight_cursor..weight_cursor + previous_width];
                *activation = kernel.dot(layer_input, neuron_weights);
                weight_cursor += previous_width;
            }

            input_start = output_start;
        }

        let output = self.output_range();
        Ok(&self.activations[output])
    }

    /// Releases all buffers. Calling it again has no effect.
    pub fn teardown(&mut self) {
        if self.state == NetworkState::TornDown {
            return;
        }

        self.layer_widths = Vec::new();
        self.weights = Vec::new();
        self.activations = Vec::new();
        self.state = NetworkState::TornDown;
        debug!("Network {:?} torn down", self.topology);
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn kernel(&self) -> DotKernel {
        self.kernel
    }

    pub fn state(&self) -> NetworkState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == NetworkState::Ready
    }

    /// Width of each layer; empty once torn down.
    pub fn layer_widths(&self) -> &[usize] {
        &self.layer_widths
    }

    /// The flat weight buffer; empty once torn down.
    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn weight_count(&self) -> usize {
        self.weight_count
    }

    pub fn total_node_count(&self) -> usize {
        self.total_node_count
    }

    /// Index range of the output segment inside the activation buffer.
    pub fn output_range(&self) -> Range<usize> {
        self.total_node_count - self.topology.output_count..self.total_node_count
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("topology", &self.topology)
            .field("kernel", &self.kernel)
            .field("weight_count", &self.weight_count)
            .field("total_node_count", &self.total_node_count)
            .field("state", &self.state)
            .finish()
    }
}
