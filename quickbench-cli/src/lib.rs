#![warn(missing_docs)]
//! QuickBench CLI Library
//!
//! This module provides the CLI infrastructure for benchmark binaries.
//! Use `quickbench::run()` (or `quickbench_cli::run()`) in your main function
//! to discover, run and report every benchmark file selected by
//! `quickbench.toml`.
//!
//! # Example
//!
//! ```ignore
//! use quickbench::prelude::*;
//!
//! #[export]
//! fn bench_parse() {
//!     parse(INPUT);
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     quickbench_cli::run()
//! }
//! ```

mod config;
mod console;
mod discover;
mod executor;

pub use config::*;
pub use console::Console;
pub use discover::{
    BENCH_FILE_SUFFIX, DiscoveryError, RunMode, explicit_files, glob_files, is_benchmark_file,
    select_exports,
};
pub use executor::{
    ModuleFailure, ModulePlan, RunOptions, RunReport, Runner, format_plan, render_report,
};

use clap::Parser;
use quickbench_core::{DEFAULT_ITERATIONS, ModuleLoader, Registry};
use quickbench_report::{DEFAULT_FIXED, OutputFormat};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// QuickBench CLI arguments
#[derive(Parser, Debug)]
#[command(name = "quickbench")]
#[command(author, version, about = "QuickBench - micro-benchmark harness")]
pub struct Cli {
    /// Run only the exports with these exact names
    #[arg(long = "function", num_args = 1.., value_name = "NAME")]
    pub functions: Option<Vec<String>>,

    /// Run only these files, bypassing the include patterns
    #[arg(long = "file", num_args = 1.., value_name = "PATH")]
    pub files: Option<Vec<PathBuf>>,

    /// Number of measured invocations per benchmark
    #[arg(short = 'n', value_name = "N")]
    pub iterations: Option<u32>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Rank the members of `compare*` exports instead of running `bench*` exports
    #[arg(long)]
    pub compare: bool,

    /// Decimal places in rounded output; also reports totalTimeMs
    #[arg(long, value_name = "DIGITS")]
    pub fixed: Option<u32>,

    /// Per-invocation timeout for async benchmarks (e.g. "500ms", "30s")
    #[arg(long, value_name = "DURATION")]
    pub timeout: Option<String>,

    /// Configuration file (default: nearest quickbench.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// List selected exports without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Internal: Absorb cargo bench's --bench flag
    #[arg(long, hide = true)]
    pub bench: bool,
}

impl Cli {
    /// Output format, rejecting `--compare` together with `--json`
    pub fn output_format(&self) -> Result<OutputFormat, CliError> {
        match (self.compare, self.json) {
            (true, true) => Err(CliError::CompareWithJson),
            (false, true) => Ok(OutputFormat::Json),
            _ => Ok(OutputFormat::Console),
        }
    }

    /// Selected run mode
    pub fn mode(&self) -> RunMode {
        if self.compare {
            RunMode::Compare
        } else {
            RunMode::Bench
        }
    }
}

/// Errors that abort a run before or after the benchmarks
#[derive(Debug, Error)]
pub enum CliError {
    /// Comparison tables have no JSON form
    #[error("--compare cannot be combined with --json")]
    CompareWithJson,

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An include pattern is not a valid glob
    #[error(transparent)]
    Pattern(#[from] DiscoveryError),

    /// Writing output failed
    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON report could not be serialized
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Run the QuickBench CLI with the given arguments.
/// This is the main entry point for benchmark binaries.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong. Exits
/// the process with status 1 when any module failed.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the QuickBench CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let runtime = build_runtime()?;
    let loader: Arc<dyn ModuleLoader> = Arc::new(Registry::from_inventory());
    let cwd = std::env::current_dir()?;

    let report = runtime.block_on(execute(&cli, loader, &cwd, std::io::stdout()))?;

    if !report.is_success() {
        eprintln!("\n{} module(s) failed", report.failures.len());
        std::process::exit(1);
    }

    Ok(())
}

/// Single-threaded runtime that drives every module task, with I/O and timers.
fn build_runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        "quickbench=debug"
    } else {
        "quickbench=info"
    };
    // A subscriber may already be installed by the embedding binary
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Load configuration, discover files, run them and write the output to `out`.
///
/// Progress lines are only written in console mode. `--compare` with
/// `--json` fails before anything is loaded or written.
pub async fn execute(
    cli: &Cli,
    loader: Arc<dyn ModuleLoader>,
    cwd: &Path,
    out: impl Write + Send + 'static,
) -> Result<RunReport, CliError> {
    let format = cli.output_format()?;
    let console = Console::with_writer(format.is_console(), out);

    console.progress(format_args!("Looking for config..."));
    let loaded = match &cli.config {
        Some(path) => QuickConfig::load(cwd.join(path))?,
        None => QuickConfig::discover(cwd)?,
    };
    let options = run_options(cli, &loaded.config)?;
    let (mode, fixed) = (options.mode, options.fixed);

    console.progress(format_args!(
        "Looking for benchmarks in {}...",
        loaded.config.include.join(", ")
    ));
    let files = match &cli.files {
        Some(files) => explicit_files(files, cwd),
        None => glob_files(&loaded.config.include, loaded.root())?,
    };

    let runner = Runner::new(loader, options, console.clone());

    if cli.dry_run {
        console.emit(&format_plan(&runner.plan(&files)))?;
        return Ok(RunReport::default());
    }

    let report = runner.run(files).await;
    console.emit(&render_report(&report, format, mode, fixed)?)?;
    Ok(report)
}

/// Layer CLI flags over `quickbench.toml` values.
fn run_options(cli: &Cli, config: &QuickConfig) -> Result<RunOptions, CliError> {
    let mode = cli.mode();
    let explicit_fixed = cli.fixed.or(config.runner.fixed);
    let timeout = cli
        .timeout
        .as_deref()
        .or(config.runner.timeout.as_deref())
        .map(QuickConfig::parse_duration)
        .transpose()?;

    Ok(RunOptions {
        mode,
        functions: cli.functions.clone(),
        iterations: cli
            .iterations
            .or(config.runner.iterations)
            .unwrap_or(DEFAULT_ITERATIONS),
        timeout,
        fixed: explicit_fixed.unwrap_or(DEFAULT_FIXED),
        report_total_time: mode == RunMode::Bench && explicit_fixed.is_some(),
    })
}
