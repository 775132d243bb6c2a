//! Console Formatting
//!
//! Terminal-friendly rendering of run summaries and comparison rankings.

use crate::report::ComparisonRanking;

/// Default number of decimal places in console tables
pub const DEFAULT_FIXED: u32 = 3;

/// Format `value` with exactly `fixed` decimal places
pub fn format_fixed(value: f64, fixed: u32) -> String {
    format!("{:.*}", fixed as usize, value)
}

/// Final line of a benchmark-mode run
pub fn format_run_summary(total_benchmarks: usize) -> String {
    format!("Ran {} benchmarks.\n", total_benchmarks)
}

/// Format one comparison group as an aligned table, fastest first
pub fn format_ranking_table(ranking: &ComparisonRanking, fixed: u32) -> String {
    let rows: Vec<(String, String, String, String)> = ranking
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            (
                index.to_string(),
                entry.name.clone(),
                format_fixed(entry.average_latency_ms, fixed),
                format!("{}x", format_fixed(entry.relative_slowdown, fixed)),
            )
        })
        .collect();

    let rank_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0).max(1);
    let name_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).max(4);
    let runtime_width = rows.iter().map(|r| r.2.len()).max().unwrap_or(0).max(12);
    let slower_width = rows.iter().map(|r| r.3.len()).max().unwrap_or(0).max(12);
    let line_width = rank_width + name_width + runtime_width + slower_width + 6;

    let mut output = String::new();

    output.push('\n');
    output.push_str(&ranking.name);
    output.push('\n');
    output.push_str(&"-".repeat(line_width));
    output.push('\n');

    output.push_str(&format!(
        "{:<rw$}  {:<nw$}  {:>tw$}  {:>sw$}\n",
        "#",
        "name",
        "runtime (ms)",
        "times slower",
        rw = rank_width,
        nw = name_width,
        tw = runtime_width,
        sw = slower_width
    ));

    for (rank, name, runtime, slower) in &rows {
        output.push_str(&format!(
            "{:<rw$}  {:<nw$}  {:>tw$}  {:>sw$}\n",
            rank,
            name,
            runtime,
            slower,
            rw = rank_width,
            nw = name_width,
            tw = runtime_width,
            sw = slower_width
        ));
    }

    output
}
