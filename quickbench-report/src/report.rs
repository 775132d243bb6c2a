//! Report Data Structures

use quickbench_core::FunctionScore;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Average latency per function, in discovery order.
///
/// Serialized as a JSON object whose key order is the insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileScores(Vec<(String, f64)>);

impl FileScores {
    /// Create an empty score map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `average_latency_ms` for `name`, replacing an earlier entry
    pub fn insert(&mut self, name: impl Into<String>, average_latency_ms: f64) {
        let name = name.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = average_latency_ms,
            None => self.0.push((name, average_latency_ms)),
        }
    }

    /// Average latency recorded for `name`
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| *value)
    }

    /// Function names in discovery order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(name, _)| name.as_str())
    }

    /// Entries in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of functions scored
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no function was scored
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FileScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FileScores {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScoresVisitor;

        impl<'de> Visitor<'de> for ScoresVisitor {
            type Value = FileScores;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of function names to latencies")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut scores = FileScores::new();
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    scores.insert(name, value);
                }
                Ok(scores)
            }
        }

        deserializer.deserialize_map(ScoresVisitor)
    }
}

/// Aggregated result for one benchmark module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Module path
    pub file_name: String,
    /// Function name -> average latency in milliseconds
    pub file_scores: FileScores,
    /// Wall-clock span of the whole module, rounded to the configured precision
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_ms: Option<f64>,
    /// Why processing of the module stopped early
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl FileResult {
    /// Create a result with no scores yet
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            file_scores: FileScores::new(),
            total_time_ms: None,
            failure: None,
        }
    }

    /// Whether the module finished without failure
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Single row of a comparison ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    /// Competitor name
    pub name: String,
    /// Average latency in milliseconds
    pub average_latency_ms: f64,
    /// Average latency relative to the fastest competitor (1.0 = fastest)
    pub relative_slowdown: f64,
}

/// Competitors of one comparison group, fastest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRanking {
    /// Comparison name
    pub name: String,
    /// Entries in ascending order of average latency
    pub entries: Vec<RankedEntry>,
}

impl ComparisonRanking {
    /// Rank `scores` by average latency.
    ///
    /// The sort is stable, so equal averages keep discovery order. The
    /// fastest entry anchors every slowdown ratio, including its own 1.0.
    pub fn from_scores(
        name: impl Into<String>,
        scores: impl IntoIterator<Item = FunctionScore>,
    ) -> Self {
        let mut scores: Vec<FunctionScore> = scores.into_iter().collect();
        scores.sort_by(|a, b| a.average_latency_ms.total_cmp(&b.average_latency_ms));

        let fastest = scores.first().map(|s| s.average_latency_ms).unwrap_or(0.0);

        let entries = scores
            .into_iter()
            .enumerate()
            .map(|(rank, score)| RankedEntry {
                relative_slowdown: if rank == 0 {
                    1.0
                } else {
                    slowdown(score.average_latency_ms, fastest)
                },
                name: score.name,
                average_latency_ms: score.average_latency_ms,
            })
            .collect();

        Self {
            name: name.into(),
            entries,
        }
    }
}

fn slowdown(average: f64, fastest: f64) -> f64 {
    if fastest > 0.0 {
        average / fastest
    } else if average > 0.0 {
        f64::INFINITY
    } else {
        1.0
    }
}

/// Round `value` to `fixed` decimal places
pub fn round_to(value: f64, fixed: u32) -> f64 {
    let factor = 10f64.powi(fixed.min(15) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(name: &str, average: f64) -> FunctionScore {
        FunctionScore {
            name: name.to_string(),
            total_latency_ms: average * 3.0,
            average_latency_ms: average,
            iterations: 3,
        }
    }

    #[test]
    fn test_ranking_fast_and_slow() {
        let ranking = ComparisonRanking::from_scores(
            "compare_pair",
            [score("slow", 40.0), score("fast", 10.0)],
        );

        assert_eq!(
            ranking.entries,
            vec![
                RankedEntry {
                    name: "fast".into(),
                    average_latency_ms: 10.0,
                    relative_slowdown: 1.0
                },
                RankedEntry {
                    name: "slow".into(),
                    average_latency_ms: 40.0,
                    relative_slowdown: 4.0
                },
            ]
        );
    }

    #[test]
    fn test_ranking_ties_keep_discovery_order() {
        let ranking = ComparisonRanking::from_scores(
            "compare_ties",
            [score("first", 5.0), score("second", 5.0), score("quick", 1.0)],
        );
        let names: Vec<_> = ranking.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["quick", "first", "second"]);
        assert_eq!(ranking.entries[1].relative_slowdown, 5.0);
    }

    #[test]
    fn test_ranking_zero_latency() {
        let ranking = ComparisonRanking::from_scores(
            "compare_zero",
            [score("a", 0.0), score("b", 0.0), score("c", 2.0)],
        );
        let slowdowns: Vec<_> = ranking.entries.iter().map(|e| e.relative_slowdown).collect();
        assert_eq!(slowdowns, [1.0, 1.0, f64::INFINITY]);
    }

    #[test]
    fn test_empty_ranking() {
        let ranking = ComparisonRanking::from_scores("compare_none", Vec::new());
        assert!(ranking.entries.is_empty());
    }

    #[test]
    fn test_file_scores_keep_insertion_order() {
        let mut scores = FileScores::new();
        scores.insert("bench_zeta", 1.0);
        scores.insert("bench_alpha", 2.0);
        scores.insert("bench_zeta", 3.0);

        assert_eq!(scores.names().collect::<Vec<_>>(), ["bench_zeta", "bench_alpha"]);
        assert_eq!(scores.get("bench_zeta"), Some(3.0));
        assert_eq!(scores.get("missing"), None);
    }

    #[test]
    fn test_file_result_deserializes_from_json() {
        let json = r#"{"fileName":"a_bench.rs","fileScores":{"bench_b":2.5,"bench_a":1.0}}"#;
        let result: FileResult = serde_json::from_str(json).unwrap();

        assert_eq!(result.file_name, "a_bench.rs");
        assert_eq!(result.file_scores.names().collect::<Vec<_>>(), ["bench_b", "bench_a"]);
        assert_eq!(result.total_time_ms, None);
        assert!(result.is_success());
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(12.3456, 2), 12.35);
        assert_eq!(round_to(12.3456, 0), 12.0);
        assert_eq!(round_to(0.0004, 3), 0.0);
    }
}
