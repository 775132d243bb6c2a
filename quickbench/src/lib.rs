#![warn(missing_docs)]
//! # QuickBench
//!
//! Micro-benchmark harness for Rust: discover benchmark files, warm up and
//! time their exported functions, and report average latencies or ranked
//! comparisons.
//!
//! - **Discovery**: include globs from `quickbench.toml`; only files named
//!   `*bench.rs` are run
//! - **Measurement**: three warm-up calls, then N timed calls per function
//! - **Sync and async**: both kinds of function are measured the same way
//! - **Comparisons**: `compare*` exports return competing implementations,
//!   ranked fastest first with relative slowdowns
//! - **Isolation**: a failing or panicking module is reported and skipped
//!
//! ## Quick Start
//!
//! ```ignore
//! use quickbench::prelude::*;
//!
//! #[export]
//! fn bench_parse() {
//!     parse(INPUT);
//! }
//!
//! #[export]
//! async fn bench_fetch() {
//!     fetch().await;
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     quickbench::run()
//! }
//! ```
//!
//! ## Comparisons
//!
//! ```ignore
//! fn sort_std() { /* ... */ }
//! fn sort_insertion() { /* ... */ }
//!
//! #[export]
//! fn compare_sorts() -> Vec<BenchmarkUnit> {
//!     vec![unit!(sort_std), unit!(sort_insertion)]
//! }
//! ```
//!
//! Run with `cargo bench -- --compare`.

// Re-export core types
pub use quickbench_core::{
    BenchFuture, BenchmarkUnit, ComparisonGroup, DEFAULT_ITERATIONS, Export, ExportDef,
    ExportFactory, ExportKind, FunctionScore, InvokeError, Invoker, LoadError, Module,
    ModuleLoader, Outcome, Registry, Timer, WARMUP_ITERATIONS, time_invocation, unit,
};

// Re-export macros
pub use quickbench_macros::export;

// Re-export report types
pub use quickbench_report::{
    ComparisonRanking, FileResult, FileScores, OutputFormat, RankedEntry, format_ranking_table,
    generate_json_report,
};

// Re-export the harness
pub use quickbench_cli::{
    Cli, CliError, Console, QuickConfig, RunMode, RunOptions, RunReport, Runner, execute,
    run_with_cli,
};

/// Internal re-exports for macro use
#[doc(hidden)]
pub mod internal {
    pub use inventory;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{BenchmarkUnit, export, unit};
}

/// Run the QuickBench CLI harness.
///
/// Call this from your benchmark binary's `main()`:
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     quickbench::run()
/// }
/// ```
pub use quickbench_cli::run;
