//! nvtune - NVML-based GPU tuning tool
//!
//! A command-line tool that applies a power cap percentage and
//! graphics/memory clock offsets to every detected NVIDIA GPU.

use clap::Parser;
use nvtune::cli::args::{generate_completions, Cli};
use nvtune::commands::run_tune;
use nvtune::error::AppError;

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    if let Some(shell) = cli.completions {
        generate_completions(shell);
        return;
    }

    // Vendor-side failures are reported but do not change the exit status;
    // only argument parsing (handled by clap above) exits nonzero.
    if let Err(e) = run_tune(&cli) {
        log::error!("{}", e);
        print_error(&e);
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Nvml(nvtune::error::NvmlError::LibraryNotFound) => {
            eprintln!();
            eprintln!("Hint: Make sure the NVIDIA driver is installed.");
            eprintln!("      On Linux, install the nvidia-utils package.");
        }
        AppError::Nvml(nvtune::error::NvmlError::InsufficientPermissions(_)) => {
            eprintln!();
            eprintln!("Hint: Try running with sudo or as root.");
        }
        AppError::NoGpusFound => {
            eprintln!();
            eprintln!("Hint: Make sure you have an NVIDIA GPU installed.");
            eprintln!("      Check 'nvidia-smi' for GPU detection.");
        }
        _ => {}
    }
}
