//! Forward-pass engine tests: topology, determinism, output shape and lifecycle.

use annbench::errors::NetworkError;
use annbench::{DotKernel, Network, NetworkState, Topology};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const DELTA: f32 = 1e-4;
const SEED: u64 = 1;

fn build(topology: Topology, kernel: DotKernel, seed: u64) -> Network {
    let mut rng = StdRng::seed_from_u64(seed);
    Network::new(topology, kernel, &mut rng).expect("Network creation should succeed")
}

/// Straightforward matrix-vector reference in `f64`.
fn reference_forward(widths: &[usize], weights: &[f32], inputs: &[f32]) -> Vec<f64> {
    let mut layer: Vec<f64> = inputs.iter().map(|&x| x as f64).collect();
    let mut cursor = 0;
    for pair in widths.windows(2) {
        let mut next = Vec::with_capacity(pair[1]);
        for _ in 0..pair[1] {
            let row = &weights[cursor..cursor + pair[0]];
            next.push(row.iter().zip(&layer).map(|(&w, &x)| w as f64 * x).sum());
            cursor += pair[0];
        }
        layer = next;
    }
    layer
}

#[test]
fn small_network_scenario() {
    let mut network = build(Topology::new(4, 1, 3, 1), DotKernel::scalar(), SEED);

    assert_eq!(network.weight_count(), 4 * 3 + 3 * 1);
    assert_eq!(network.weights().len(), 15);
    assert_eq!(network.total_node_count(), 8);

    let first = network
        .infer(&[1.0, 1.0, 1.0, 1.0])
        .expect("Inference should succeed")
        .to_vec();
    assert_eq!(first.len(), 1);

    let second = network
        .infer(&[1.0, 1.0, 1.0, 1.0])
        .expect("Inference should succeed")
        .to_vec();
    assert_eq!(first, second);
}

#[test]
fn layer_widths_and_weight_count_follow_topology() {
    for hidden_layers in 0..4 {
        let topology = Topology::new(7, 3, 5, hidden_layers);
        let network = build(topology, DotKernel::scalar(), SEED);
        let widths = network.layer_widths();

        assert_eq!(widths.len(), hidden_layers + 2);
        assert_eq!(widths[0], 7);
        assert_eq!(widths[widths.len() - 1], 3);
        assert!(widths[1..widths.len() - 1].iter().all(|&w| w == 5));

        let expected: usize = widths.windows(2).map(|pair| pair[0] * pair[1]).sum();
        assert_eq!(network.weight_count(), expected);
        assert_eq!(network.weights().len(), expected);
    }
}

#[test]
fn weights_are_within_initialization_range() {
    let network = build(Topology::new(32, 4, 16, 2), DotKernel::scalar(), 99);
    assert!(
        network
            .weights()
            .iter()
            .all(|&w| (-0.5..0.5).contains(&w))
    );
    // A uniform draw over this many weights is not constant.
    assert!(network.weights().iter().any(|&w| w != network.weights()[0]));
}

#[test]
fn identical_seeds_produce_identical_networks() {
    let topology = Topology::new(24, 3, 12, 2);
    let mut a = build(topology, DotKernel::scalar(), 42);
    let mut b = build(topology, DotKernel::scalar(), 42);

    let weights_a: Vec<u32> = a.weights().iter().map(|w| w.to_bits()).collect();
    let weights_b: Vec<u32> = b.weights().iter().map(|w| w.to_bits()).collect();
    assert_eq!(weights_a, weights_b);

    let inputs: Vec<f32> = (0..24).map(|i| i as f32 * 0.1).collect();
    let out_a = a.infer(&inputs).unwrap().to_vec();
    let out_b = b.infer(&inputs).unwrap().to_vec();
    assert_eq!(out_a, out_b);
}

#[test]
fn different_seeds_produce_different_weights() {
    let topology = Topology::new(8, 2, 8, 1);
    let a = build(topology, DotKernel::scalar(), 1);
    let b = build(topology, DotKernel::scalar(), 2);
    assert_ne!(a.weights(), b.weights());
}

#[test]
fn output_has_output_count_values_for_any_depth() {
    for hidden_layers in [0usize, 1, 2, 8] {
        let mut network = build(Topology::new(12, 5, 8, hidden_layers), DotKernel::detect(), SEED);
        let output = network.infer(&[0.25; 12]).unwrap();
        assert_eq!(output.len(), 5, "hidden layers: {hidden_layers}");
    }
}

#[test]
fn zero_hidden_layers_is_a_single_dot_product_per_output() {
    let topology = Topology::new(6, 3, 10, 0);
    let mut network = build(topology, DotKernel::scalar(), SEED);

    assert_eq!(network.layer_widths(), &[6, 3]);
    assert_eq!(network.weight_count(), 18);

    let inputs = [1.0, -2.0, 0.5, 3.0, 0.0, -1.0];
    let weights = network.weights().to_vec();
    let output = network.infer(&inputs).unwrap();

    for (neuron, &value) in output.iter().enumerate() {
        let row = &weights[neuron * 6..(neuron + 1) * 6];
        let expected: f32 = row.iter().zip(&inputs).map(|(w, x)| w * x).sum();
        assert!((value - expected).abs() < DELTA);
    }
}

#[test]
fn forward_pass_matches_reference_computation() {
    let mut rng = StdRng::seed_from_u64(5);
    let topology = Topology::new(20, 4, 16, 3);
    let inputs: Vec<f32> = (0..20).map(|_| rng.random_range(-1.0f32..1.0)).collect();

    for kernel in DotKernel::available() {
        let mut network = build(topology, kernel, SEED);
        let widths = network.layer_widths().to_vec();
        let expected = reference_forward(&widths, network.weights(), &inputs);
        let output = network.infer(&inputs).unwrap();

        for (&actual, &expected) in output.iter().zip(&expected) {
            let scale = expected.abs().max(1.0);
            assert!(
                (actual as f64 - expected).abs() <= 1e-4 * scale,
                "{kernel}: {actual} vs {expected}"
            );
        }
    }
}

#[test]
fn all_kernels_agree_on_benchmark_shaped_network() {
    let topology = Topology::new(324, 2, 600, 1);
    let inputs: Vec<f32> = (0..324).map(|i| (i % 17) as f32 / 17.0).collect();

    let mut baseline = build(topology, DotKernel::scalar(), SEED);
    let expected = baseline.infer(&inputs).unwrap().to_vec();

    for kernel in DotKernel::available() {
        let mut network = build(topology, kernel, SEED);
        let output = network.infer(&inputs).unwrap();
        for (&actual, &expected) in output.iter().zip(&expected) {
            let scale = expected.abs().max(1.0);
            assert!((actual - expected).abs() <= 1e-4 * scale, "{kernel}");
        }
    }
}

#[test]
fn output_range_points_at_last_segment() {
    let network = build(Topology::new(4, 2, 3, 2), DotKernel::scalar(), SEED);
    assert_eq!(network.total_node_count(), 12);
    assert_eq!(network.output_range(), 10..12);
}

#[test]
fn wrong_input_length_is_rejected() {
    let mut network = build(Topology::new(4, 1, 3, 1), DotKernel::scalar(), SEED);
    let result = network.infer(&[1.0, 2.0]);
    assert!(matches!(
        result,
        Err(NetworkError::InputSizeMismatch {
            expected: 4,
            actual: 2
        })
    ));
}

#[test]
fn teardown_releases_buffers_and_is_idempotent() {
    let mut network = build(Topology::new(4, 1, 3, 1), DotKernel::scalar(), SEED);
    assert!(network.is_ready());

    network.teardown();
    assert_eq!(network.state(), NetworkState::TornDown);
    assert!(network.weights().is_empty());
    assert!(network.layer_widths().is_empty());

    network.teardown();
    assert_eq!(network.state(), NetworkState::TornDown);

    assert!(matches!(
        network.infer(&[1.0; 4]),
        Err(NetworkError::TornDown)
    ));
}

#[test]
fn networks_can_run_on_separate_threads() {
    let topology = Topology::new(16, 2, 8, 1);
    let expected = build(topology, DotKernel::scalar(), SEED)
        .infer(&[0.5; 16])
        .unwrap()
        .to_vec();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mut network = build(topology, DotKernel::scalar(), SEED);
            std::thread::spawn(move || network.infer(&[0.5; 16]).unwrap().to_vec())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}
