#![warn(missing_docs)]
//! QuickBench Report - Results and Rendering
//!
//! Generates the two output formats:
//! - JSON (one array of file results, machine-readable)
//! - Console (run summary and ranked comparison tables)

mod console;
mod json;
mod report;

pub use console::{DEFAULT_FIXED, format_fixed, format_ranking_table, format_run_summary};
pub use json::generate_json_report;
pub use report::{ComparisonRanking, FileResult, FileScores, RankedEntry, round_to};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Progressive human-readable terminal output
    #[default]
    Console,
    /// One JSON document at the end of the run
    Json,
}

impl OutputFormat {
    /// Whether progressive console lines should be printed
    pub fn is_console(self) -> bool {
        matches!(self, OutputFormat::Console)
    }
}
