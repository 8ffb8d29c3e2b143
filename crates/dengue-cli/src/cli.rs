//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "denguemx",
    version,
    about = "Yearly dengue situation report for Mexico",
    long_about = "Builds the yearly dengue report from the SSA open-data case files:\n\
                  incidence maps, age/sex profiles, the daily onset calendar and the\n\
                  serotype split, plus the markdown report that ties them together."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
    /// Build the full report for one year.
    Report(ReportArgs),

    /// Run the data quality checks without producing the report.
    Check(CheckArgs),

    /// List the year files found in a data directory.
    Years(YearsArgs),

    /// List the 32 federal entities and their INEGI codes.
    Entities,

    /// Verify the shipped reference tables against their manifest pins.
    Assets(AssetsArgs),
}

#[derive(Parser)]
pub struct ReportArgs {
    /// Directory holding the yearly case files (`2023.csv`, ...).
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Report year (default: the latest year file found).
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<u16>,

    /// Output directory for figures and the report
    /// (default: <DATA_DIR>/reporte).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Assets directory override (takes precedence over DENGUE_ASSETS_DIR).
    #[arg(long = "assets-dir", value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,

    /// Minimum confirmed cases for a municipality to enter the top table.
    #[arg(long = "min-municipal-cases", value_name = "N", default_value_t = 100)]
    pub min_municipal_cases: u64,

    /// Number of municipalities in the top table.
    #[arg(long = "top", value_name = "N", default_value_t = 30)]
    pub top: usize,

    /// Skip both maps even when boundary files are available.
    #[arg(long = "skip-maps")]
    pub skip_maps: bool,

    /// Run ingest, checks and analysis without writing any file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Treat quality warnings as failures (exit code 1).
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct CheckArgs {
    /// Directory holding the yearly case files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,

    /// Year to check (default: the latest year file found).
    #[arg(long = "year", value_name = "YEAR")]
    pub year: Option<u16>,

    /// Also write the quality report as JSON to this path.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,

    /// Treat quality warnings as failures (exit code 1).
    #[arg(long = "strict")]
    pub strict: bool,
}

#[derive(Parser)]
pub struct YearsArgs {
    /// Directory holding the yearly case files.
    #[arg(value_name = "DATA_DIR")]
    pub data_dir: PathBuf,
}

#[derive(Parser)]
pub struct AssetsArgs {
    /// Assets directory override (takes precedence over DENGUE_ASSETS_DIR).
    #[arg(long = "assets-dir", value_name = "DIR")]
    pub assets_dir: Option<PathBuf>,
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
