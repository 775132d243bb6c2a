//! Benchmark Executor
//!
//! Runs discovered modules and turns their measurements into output.
//!
//! ## Pipeline Overview
//!
//! ```text
//! candidate files (globs or --file)
//!       │
//!       ▼
//! ┌─────────────┐
//! │  execution  │  One task per module: load, select, invoke
//! └──────┬──────┘
//!        │  FileResult / ComparisonRanking, joined in file order
//!        ▼
//! ┌─────────────┐
//! │ formatting  │  Run summary, ranking tables or JSON
//! └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`execution`] - Per-module tasks with failure isolation
//! - [`formatting`] - Final console and JSON output

mod execution;
mod formatting;

pub use execution::{ModuleFailure, ModulePlan, RunOptions, RunReport, Runner};
pub use formatting::{format_plan, render_report};
