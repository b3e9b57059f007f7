//! Network topology description.
//!
//! A [`Topology`] fully determines the shape of a network: the widths of the
//! input and output layers, and a stack of equally wide hidden layers between
//! them. It is serializable so it can be embedded in a benchmark configuration.

use serde::{Deserialize, Serialize};

use crate::errors::{NetworkError, NetworkResult};

/// Shape of a fully connected feed-forward network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    pub input_count: usize,
    pub output_count: usize,
    pub hidden_width: usize,
    pub hidden_layer_count: usize,
}

impl Topology {
    pub const fn new(
        input_count: usize,
        output_count: usize,
        hidden_width: usize,
        hidden_layer_count: usize,
    ) -> Self {
        Self {
            input_count,
            output_count,
            hidden_width,
            hidden_layer_count,
        }
    }

    /// Number of layers including the input and output layers.
    pub fn layer_count(&self) -> NetworkResult<usize> {
        self.hidden_layer_count
            .checked_add(2)
            .ok_or(NetworkError::CapacityOverflow {
                what: "layer count",
            })
    }

    /// Width of every layer in order: input, each hidden layer, output.
    pub fn layer_widths(&self) -> impl Iterator<Item = usize> + '_ {
        std::iter::once(self.input_count)
            .chain(std::iter::repeat_n(
                self.hidden_width,
                self.hidden_layer_count,
            ))
            .chain(std::iter::once(self.output_count))
    }

    /// `input_count + output_count + hidden_layer_count * hidden_width`.
    pub fn total_node_count(&self) -> NetworkResult<usize> {
        self.hidden_layer_count
            .checked_mul(self.hidden_width)
            .and_then(|hidden| hidden.checked_add(self.input_count))
            .and_then(|nodes| nodes.checked_add(self.output_count))
            .ok_or(NetworkError::CapacityOverflow {
                what: "total node count",
            })
    }

    /// Sum of `width[l - 1] * width[l]` over consecutive layer pairs.
    pub fn weight_count(&self) -> NetworkResult<usize> {
        let overflow = NetworkError::CapacityOverflow {
            what: "weight count",
        };

        if self.hidden_layer_count == 0 {
            return self.input_count.checked_mul(self.output_count).ok_or(overflow);
        }

        let first = self.input_count.checked_mul(self.hidden_width);
        let interior = self
            .hidden_width
            .checked_mul(self.hidden_width)
            .and_then(|square| square.checked_mul(self.hidden_layer_count - 1));
        let last = self.hidden_width.checked_mul(self.output_count);

        first
            .zip(interior)
            .zip(last)
            .and_then(|((first, interior), last)| {
                first.checked_add(interior)?.checked_add(last)
            })
            .ok_or(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_widths_follow_topology() {
        let topology = Topology::new(5, 2, 7, 3);
        let widths: Vec<usize> = topology.layer_widths().collect();
        assert_eq!(widths, vec![5, 7, 7, 7, 2]);
        assert_eq!(topology.layer_count().unwrap(), widths.len());
    }

    #[test]
    fn test_weight_count_matches_pairwise_sum() {
        for hidden_layers in 0..5 {
            let topology = Topology::new(6, 3, 4, hidden_layers);
            let widths: Vec<usize> = topology.layer_widths().collect();
            let expected: usize = widths.windows(2).map(|pair| pair[0] * pair[1]).sum();
            assert_eq!(topology.weight_count().unwrap(), expected);
        }
    }

    #[test]
    fn test_total_node_count() {
        let topology = Topology::new(324, 2, 600, 1);
        assert_eq!(topology.total_node_count().unwrap(), 926);
        assert_eq!(topology.weight_count().unwrap(), 324 * 600 + 600 * 2);
    }

    #[test]
    fn test_overflowing_topology_is_reported() {
        let topology = Topology::new(usize::MAX, 2, usize::MAX, 1);
        assert!(matches!(
            topology.weight_count(),
            Err(NetworkError::CapacityOverflow { .. })
        ));
        assert!(matches!(
            topology.total_node_count(),
            Err(NetworkError::CapacityOverflow { .. })
        ));
    }
}
