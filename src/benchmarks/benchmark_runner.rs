//! Core benchmark execution logic.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use log::{error, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::benchmark_errors::{BenchmarkError, BenchmarkResult};
use super::benchmark_types::{BenchmarkConfig, BenchmarkReport, TimingStats};
use super::build_label::build_config_label;
use super::performance_metrics::{time_runs, verify_outputs_match};
use crate::network::Network;
use crate::utils::dot::{DotKernel, KernelKind};

/// Relative tolerance when comparing outputs of different kernels.
pub const KERNEL_OUTPUT_TOLERANCE: f32 = 1e-4;

/// Configuration loader that handles JSON files with fallbacks
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a configuration file, falling back to defaults when it is missing
    pub fn load(path: impl AsRef<Path>) -> BenchmarkResult<BenchmarkConfig> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content, &path.display().to_string()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!(
                    "Config file '{}' not found, using default benchmark configuration",
                    path.display()
                );
                Ok(BenchmarkConfig::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Parse a configuration from its JSON text
    pub fn parse(content: &str, origin: &str) -> BenchmarkResult<BenchmarkConfig> {
        serde_json::from_str(content).map_err(|e| BenchmarkError::ConfigParseError {
            path: origin.to_string(),
            source: e,
        })
    }
}

/// Main benchmark runner
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run the benchmark with the kernel named in the configuration
    pub fn run(config: &BenchmarkConfig) -> BenchmarkResult<BenchmarkReport> {
        config.validate()?;
        let kernel = config.kernel.resolve()?;
        Self::run_with_kernel(config, kernel)
    }

    /// Run the benchmark with an explicit kernel
    pub fn run_with_kernel(
        config: &BenchmarkConfig,
        kernel: DotKernel,
    ) -> BenchmarkResult<BenchmarkReport> {
        config.validate()?;

        let topology = config.network;
        info!(
            "Benchmark '{}': {} inputs -> {} x {} hidden -> {} outputs, {} kernel, {} runs",
            config.name,
            topology.input_count,
            topology.hidden_layer_count,
            topology.hidden_width,
            topology.output_count,
            kernel,
            config.repetitions
        );

        // Weights first, then the input, from the same seeded stream.
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut network = Network::new(topology, kernel, &mut rng).inspect_err(|e| {
            error!("Couldn't initialize network: {}", e);
        })?;
        let inputs: Vec<f32> = (0..topology.input_count)
            .map(|_| rng.random::<f32>())
            .collect();

        for _ in 0..config.warmup_runs {
            network.infer(&inputs)?;
        }

        let samples = time_runs(config.repetitions, || {
            network.infer(&inputs).map(|outputs| {
                std::hint::black_box(outputs);
            })
        })?;
        let stats = TimingStats::from_samples(&samples);
        let outputs = network.infer(&inputs)?.to_vec();
        network.teardown();

        info!(
            "Mean {:.6} ms, stddev {:.6} s over {} runs",
            stats.mean_ms(),
            stats.stddev_secs,
            stats.samples
        );

        Ok(BenchmarkReport {
            name: config.name.clone(),
            kernel: kernel.kind(),
            label: config
                .label
                .clone()
                .unwrap_or_else(|| build_config_label(kernel.kind())),
            stats,
            outputs,
        })
    }

    /// Run the benchmark once per kernel this CPU supports, scalar first, and
    /// check that every kernel reproduces the scalar outputs
    pub fn compare_kernels(config: &BenchmarkConfig) -> BenchmarkResult<Vec<BenchmarkReport>> {
        let mut reports: Vec<BenchmarkReport> = Vec::new();

        for kernel in DotKernel::available() {
            let report = Self::run_with_kernel(config, kernel)?;

            if let Some(baseline) = reports.first() {
                let consistent = verify_outputs_match(
                    &baseline.outputs,
                    &report.outputs,
                    KERNEL_OUTPUT_TOLERANCE,
                );
                if !consistent {
                    error!(
                        "Outputs of the {} kernel diverge from the {} kernel",
                        report.kernel, baseline.kernel
                    );
                    return Err(BenchmarkError::OutputMismatch {
                        kernel: report.kernel.to_string(),
                        baseline: baseline.kernel.to_string(),
                    });
                }
            }

            reports.push(report);
        }

        info!("All {} kernels produced consistent outputs", reports.len());
        Ok(reports)
    }

    /// List kernels and whether this CPU can run them
    pub fn list_kernels() {
        let detected = DotKernel::detect();
        println!("Available kernels:");
        for kind in KernelKind::ALL {
            let status = if !kind.is_supported() {
                "unsupported on this CPU"
            } else if kind == detected.kind() {
                "supported (auto)"
            } else {
                "supported"
            };
            println!("  {:<8} - {}", kind.name(), status);
        }
    }
}
