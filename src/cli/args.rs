//! CLI argument definitions using clap derive
//!
//! Defines the positional tuning values and global flags.

use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;

/// Power cap applied when the first positional value is omitted
pub const DEFAULT_POWER_CAP_PERCENT: f64 = 60.0;

/// Clock offset applied when the second or third positional value is omitted
pub const DEFAULT_CLOCK_OFFSET_KHZ: i32 = 100_000;

/// NVML-based one-shot GPU tuning tool
///
/// Applies a power cap percentage plus graphics and memory clock offsets
/// to every detected NVIDIA GPU.
#[derive(Parser, Debug)]
#[command(name = "nvtune")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Power cap as a percentage of the default power limit
    #[arg(value_name = "POWER_PERCENT", default_value_t = DEFAULT_POWER_CAP_PERCENT)]
    pub power_percent: f64,

    /// Graphics clock offset in kHz (negative values underclock)
    #[arg(
        value_name = "GFX_OFFSET_KHZ",
        default_value_t = DEFAULT_CLOCK_OFFSET_KHZ,
        allow_hyphen_values = true
    )]
    pub graphics_offset_khz: i32,

    /// Memory clock offset in kHz (negative values underclock)
    #[arg(
        value_name = "MEM_OFFSET_KHZ",
        default_value_t = DEFAULT_CLOCK_OFFSET_KHZ,
        allow_hyphen_values = true
    )]
    pub memory_offset_khz: i32,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Target GPU by index (0-based) instead of all GPUs
    #[arg(long)]
    pub gpu: Option<u32>,

    /// Dry run mode - don't actually apply changes
    #[arg(long)]
    pub dry_run: bool,

    /// Generate shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}
