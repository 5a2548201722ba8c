//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use heapscope_metrics::MetricKind;

#[derive(Parser)]
#[command(
    name = "heapscope",
    version,
    about = "Allocator log analysis - derive memory, rate and latency metrics",
    long_about = "Load memory-allocator event logs and derive diagnostic metrics.\n\n\
                  Each metric is written as a CSV table or JSON document, one file\n\
                  per metric and input."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute metrics for one or more log files and write the artifacts.
    Render(RenderArgs),

    /// List every metric with its artifact name.
    Metrics,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Allocator log files (CSV).
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Directory for artifacts (default: plots).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Metric to compute; repeat for several (default: all).
    #[arg(long = "metric", value_name = "NAME")]
    pub metrics: Vec<MetricKind>,

    /// Artifact format.
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormatArg>,

    /// Width of rate buckets in seconds (default: 1).
    #[arg(long = "bucket-width", value_name = "SECS")]
    pub bucket_width: Option<f64>,

    /// Trailing window of latency percentiles in seconds (default: 10).
    #[arg(long = "window", value_name = "SECS")]
    pub window: Option<f64>,

    /// Indent JSON artifacts.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Fixed number of decimals for floats in CSV artifacts.
    #[arg(long = "precision", value_name = "DIGITS")]
    pub precision: Option<usize>,

    /// TOML settings file with [metrics] and [output] sections.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormatArg {
    Csv,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
