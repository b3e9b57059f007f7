//! Inference latency benchmark CLI.
//!
//! Without arguments, runs the default benchmark and prints one line:
//! `<mean_ms> <stddev_seconds> <first_output> "<build configuration>"`.

use std::env;

use annbench::KernelChoice;
use annbench::benchmarks::{
    BenchmarkConfig, BenchmarkError, BenchmarkResult, BenchmarkRunner, ConfigLoader,
    RESULT_HEADER, print_performance_analysis,
};
use log::error;

enum Command {
    Run,
    CompareKernels,
    ListKernels,
    PrintHeader,
    Help,
}

struct Options {
    command: Command,
    config_path: Option<String>,
    kernel: Option<KernelChoice>,
}

fn main() {
    // Initialize logger
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        if let BenchmarkError::InvalidArguments { .. } = e {
            eprintln!("{}", e);
            print_usage();
            std::process::exit(2);
        }
        error!("Benchmark execution failed: {}", e);
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> BenchmarkResult<()> {
    let options = parse_args(args)?;

    match options.command {
        Command::PrintHeader => {
            println!("{}", RESULT_HEADER);
            Ok(())
        }
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::ListKernels => {
            BenchmarkRunner::list_kernels();
            Ok(())
        }
        Command::Run => {
            let config = load_config(&options)?;
            let report = BenchmarkRunner::run(&config)?;
            println!("{}", report.result_line());
            Ok(())
        }
        Command::CompareKernels => {
            let config = load_config(&options)?;
            let reports = BenchmarkRunner::compare_kernels(&config)?;
            println!("{}", RESULT_HEADER);
            for report in &reports {
                println!("{}", report.result_line());
            }
            print_performance_analysis(&reports);
            Ok(())
        }
    }
}

fn load_config(options: &Options) -> BenchmarkResult<BenchmarkConfig> {
    let mut config = match &options.config_path {
        Some(path) => ConfigLoader::load(path)?,
        None => BenchmarkConfig::default(),
    };
    if let Some(kernel) = options.kernel {
        config.kernel = kernel;
    }
    Ok(config)
}

fn parse_args(args: &[String]) -> BenchmarkResult<Options> {
    let mut options = Options {
        command: Command::Run,
        config_path: None,
        kernel: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            // Nothing else matters once the header is requested.
            "--print-header-only" => {
                options.command = Command::PrintHeader;
                return Ok(options);
            }
            "--help" | "-h" => options.command = Command::Help,
            "--list-kernels" => options.command = Command::ListKernels,
            "--compare-kernels" => options.command = Command::CompareKernels,
            "--kernel" => {
                let name = next_value(&mut iter, "--kernel")?;
                options.kernel = Some(name.parse()?);
            }
            "--config" => {
                options.config_path = Some(next_value(&mut iter, "--config")?.to_string());
            }
            other => {
                return Err(BenchmarkError::InvalidArguments {
                    message: format!("unknown argument '{}'", other),
                });
            }
        }
    }

    Ok(options)
}

fn next_value<'a>(
    iter: &mut impl Iterator<Item = &'a String>,
    flag: &str,
) -> BenchmarkResult<&'a str> {
    iter.next()
        .map(String::as_str)
        .ok_or_else(|| BenchmarkError::InvalidArguments {
            message: format!("{} requires a value", flag),
        })
}

fn print_usage() {
    println!("Usage:");
    println!("  annbench                          # Run the default benchmark");
    println!("  annbench --print-header-only      # Print the result column header");
    println!("  annbench --kernel <name>          # auto, scalar, sse or sse-dp");
    println!("  annbench --config <path>          # Load a JSON benchmark configuration");
    println!("  annbench --compare-kernels        # Benchmark every supported kernel");
    println!("  annbench --list-kernels           # Show kernel support on this CPU");
}
