//! Performance measurement utilities for benchmarks.

use std::time::Instant;

use log::{debug, warn};

use super::benchmark_types::BenchmarkReport;

/// Times `repetitions` calls of `run_once`, one sample per call, in seconds.
///
/// Stops at the first error. The sample buffer is allocated up front so the
/// timed region contains nothing but the call itself.
pub fn time_runs<F, E>(repetitions: u32, mut run_once: F) -> Result<Vec<f64>, E>
where
    F: FnMut() -> Result<(), E>,
{
    let mut samples = Vec::with_capacity(repetitions as usize);
    let progress_step = (repetitions / 10).max(1);

    for i in 0..repetitions {
        let start = Instant::now();
        run_once()?;
        samples.push(start.elapsed().as_secs_f64());

        if (i + 1) % progress_step == 0 {
            debug!("  Progress: {}/{}", i + 1, repetitions);
        }
    }

    Ok(samples)
}

/// Compares two output vectors with a relative tolerance.
pub fn verify_outputs_match(reference: &[f32], candidate: &[f32], tolerance: f32) -> bool {
    if reference.len() != candidate.len() {
        warn!(
            "Output length mismatch: reference={}, candidate={}",
            reference.len(),
            candidate.len()
        );
        return false;
    }

    for (&expected, &actual) in reference.iter().zip(candidate) {
        let scale = expected.abs().max(actual.abs()).max(1.0);
        let diff = (expected - actual).abs();
        if diff > tolerance * scale {
            warn!(
                "Output mismatch: reference={}, candidate={}, diff={}",
                expected, actual, diff
            );
            return false;
        }
    }
    true
}

/// Prints a side-by-side analysis of kernel runs. The first report is the
/// baseline.
pub fn print_performance_analysis(reports: &[BenchmarkReport]) {
    let Some(baseline) = reports.first() else {
        return;
    };

    println!("\n{}", "=".repeat(80));
    println!("Detailed Results");
    println!("{}", "=".repeat(80));

    for report in reports {
        println!("\n📊 {} kernel", report.kernel);
        println!(
            "   Mean time: {:.6} ms (stddev {:.6} ms)",
            report.stats.mean_ms(),
            report.stats.stddev_secs * 1000.0
        );
        println!(
            "   Range: {:.6} ms .. {:.6} ms",
            report.stats.min_secs * 1000.0,
            report.stats.max_secs * 1000.0
        );
        println!("   Runs: {}", report.stats.samples);
        println!("   First output: {:.6}", report.first_output());

        if report.kernel != baseline.kernel {
            println!(
                "   Speedup vs {}: {:.2}x",
                baseline.kernel,
                report.speedup_over(baseline)
            );
        }
    }

    println!("\n{}", "=".repeat(80));
    println!("Performance Analysis");
    println!("{}", "=".repeat(80));

    println!("\n🚀 Speed Rankings (fastest to slowest):");
    let mut sorted: Vec<&BenchmarkReport> = reports.iter().collect();
    sorted.sort_by(|a, b| a.stats.mean_secs.total_cmp(&b.stats.mean_secs));

    for (i, report) in sorted.iter().enumerate() {
        let rank_emoji = match i {
            0 => "🥇",
            1 => "🥈",
            2 => "🥉",
            _ => "  ",
        };
        println!(
            "   {} {}: {:.6} ms",
            rank_emoji,
            report.kernel,
            report.stats.mean_ms()
        );
    }
}
