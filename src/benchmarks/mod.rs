//! Inference latency benchmark.
//!
//! Builds a seeded network, times repeated forward passes and reduces the
//! samples to mean and standard deviation. Several kernels can be compared on
//! the same network and input.

pub mod benchmark_errors;
pub mod benchmark_runner;
pub mod benchmark_types;
pub mod build_label;
pub mod performance_metrics;

pub use benchmark_errors::{BenchmarkError, BenchmarkResult};
pub use benchmark_runner::{BenchmarkRunner, ConfigLoader, KERNEL_OUTPUT_TOLERANCE};
pub use benchmark_types::{BenchmarkConfig, BenchmarkReport, RESULT_HEADER, TimingStats};
pub use build_label::build_config_label;
pub use performance_metrics::{print_performance_analysis, time_runs, verify_outputs_match};
