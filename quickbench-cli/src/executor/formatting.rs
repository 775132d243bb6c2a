//! Output Formatting
//!
//! Final output of a run, written after every module has been joined:
//! - Bench mode, console: `Ran <n> benchmarks.`
//! - Compare mode, console: one ranked table per comparison group
//! - JSON: the file results as one array

use super::execution::{ModulePlan, RunReport};
use crate::discover::RunMode;
use quickbench_report::{
    OutputFormat, format_ranking_table, format_run_summary, generate_json_report,
};

/// Render the final output of a run
///
/// # Arguments
/// * `report` - Joined results of every module
/// * `format` - Console or JSON
/// * `mode` - Bench or compare
/// * `fixed` - Decimal places in ranking tables
pub fn render_report(
    report: &RunReport,
    format: OutputFormat,
    mode: RunMode,
    fixed: u32,
) -> Result<String, serde_json::Error> {
    Ok(match (format, mode) {
        (OutputFormat::Json, _) => {
            let mut output = generate_json_report(&report.files)?;
            output.push('\n');
            output
        }
        (OutputFormat::Console, RunMode::Bench) => format_run_summary(report.total_benchmarks),
        (OutputFormat::Console, RunMode::Compare) => report
            .rankings
            .iter()
            .map(|ranking| format_ranking_table(ranking, fixed))
            .collect(),
    })
}

/// Format a dry-run listing
pub fn format_plan(plans: &[ModulePlan]) -> String {
    let mut output = String::from("QuickBench Plan:\n");
    let mut total = 0;

    for plan in plans {
        output.push_str(&format!("├── {}\n", plan.file));
        if let Some(error) = &plan.error {
            output.push_str(&format!("│   └── error: {}\n", error));
            continue;
        }
        for export in &plan.exports {
            output.push_str(&format!("│   ├── {}\n", export));
            total += 1;
        }
    }

    output.push_str(&format!("{} exports selected.\n", total));
    output
}
