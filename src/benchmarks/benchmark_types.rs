//! Benchmark type definitions and configuration structures.

use serde::{Deserialize, Serialize};

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use crate::topology::Topology;
use crate::utils::dot::{KernelChoice, KernelKind};

/// Width of the benchmark input layer (an 18x18 image).
pub const DEFAULT_INPUT_COUNT: usize = 18 * 18;

/// Width of the benchmark output layer.
pub const DEFAULT_OUTPUT_COUNT: usize = 2;

/// Width of the benchmark hidden layer.
pub const DEFAULT_HIDDEN_WIDTH: usize = 30 * 20;

pub const DEFAULT_HIDDEN_LAYER_COUNT: usize = 1;

pub const DEFAULT_SEED: u64 = 1;

/// Number of timed forward passes.
pub const DEFAULT_REPETITIONS: u32 = 1000;

/// Column header matching [`BenchmarkReport::result_line`].
pub const RESULT_HEADER: &str = "Time(ms) Stddev   Output    Options";

/// Configuration for the inference latency benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    pub name: String,
    pub description: String,
    pub network: Topology,
    pub seed: u64,
    pub repetitions: u32,
    pub warmup_runs: u32,
    pub kernel: KernelChoice,
    /// Replaces the computed build configuration label in the result line.
    pub label: Option<String>,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            name: "inference_latency".to_string(),
            description: "Fully connected network, single hidden layer, linear activations"
                .to_string(),
            network: Topology::new(
                DEFAULT_INPUT_COUNT,
                DEFAULT_OUTPUT_COUNT,
                DEFAULT_HIDDEN_WIDTH,
                DEFAULT_HIDDEN_LAYER_COUNT,
            ),
            seed: DEFAULT_SEED,
            repetitions: DEFAULT_REPETITIONS,
            warmup_runs: 0,
            kernel: KernelChoice::Auto,
            label: None,
        }
    }
}

impl BenchmarkConfig {
    /// Validates the configuration
    pub fn validate(&self) -> BenchmarkResult<()> {
        if self.repetitions == 0 {
            return Err(BenchmarkError::InvalidRepetitions {
                value: self.repetitions,
            });
        }

        if self.network.input_count == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "network.input_count".to_string(),
                message: "Input count must be greater than 0".to_string(),
            });
        }

        // The report carries the first output value.
        if self.network.output_count == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "network.output_count".to_string(),
                message: "Output count must be greater than 0".to_string(),
            });
        }

        if self.network.hidden_layer_count > 0 && self.network.hidden_width == 0 {
            return Err(BenchmarkError::ConfigValidationError {
                field: "network.hidden_width".to_string(),
                message: "Hidden width must be greater than 0 when hidden layers are present"
                    .to_string(),
            });
        }

        Ok(())
    }
}

/// Latency statistics over the timed runs, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimingStats {
    pub mean_secs: f64,
    /// Population standard deviation.
    pub stddev_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
    pub samples: usize,
}

impl TimingStats {
    /// Reduces per-run samples to mean and standard deviation.
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let count = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / count;
        let variance = samples
            .iter()
            .map(|sample| (sample - mean).powi(2))
            .sum::<f64>()
            / count;

        Self {
            mean_secs: mean,
            stddev_secs: variance.sqrt(),
            min_secs: samples.iter().copied().fold(f64::INFINITY, f64::min),
            max_secs: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            samples: samples.len(),
        }
    }

    pub fn mean_ms(&self) -> f64 {
        self.mean_secs * 1000.0
    }
}

/// Outcome of one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchmarkReport {
    pub name: String,
    pub kernel: KernelKind,
    pub label: String,
    pub stats: TimingStats,
    /// Output of the network for the benchmark input.
    pub outputs: Vec<f32>,
}

impl BenchmarkReport {
    pub fn first_output(&self) -> f32 {
        self.outputs.first().copied().unwrap_or_default()
    }

    /// `<mean_ms> <stddev_seconds> <first_output> "<label>"`
    pub fn result_line(&self) -> String {
        format!(
            "{:.6} {:.6} {:.6} \"{}\"",
            self.stats.mean_ms(),
            self.stats.stddev_secs,
            self.first_output(),
            self.label
        )
    }

    pub fn speedup_over(&self, baseline: &BenchmarkReport) -> f64 {
        baseline.stats.mean_secs / self.stats.mean_secs
    }
}
