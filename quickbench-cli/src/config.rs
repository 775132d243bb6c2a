//! Configuration loading from quickbench.toml
//!
//! QuickBench configuration lives in a `quickbench.toml` file in the project
//! root. The file is discovered by walking up from the current directory, or
//! passed explicitly with `--config`. A missing or malformed file is fatal.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration file name
pub const CONFIG_FILE: &str = "quickbench.toml";

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No configuration file between `start` and the filesystem root
    #[error("no {CONFIG_FILE} found in {} or any parent directory", start.display())]
    NotFound {
        /// Directory the search started from
        start: PathBuf,
    },

    /// The configuration file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// Configuration file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`QuickConfig`]
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// Configuration file
        path: PathBuf,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A duration string could not be parsed
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
}

/// QuickBench configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickConfig {
    /// Glob patterns selecting benchmark files, relative to the config file
    #[serde(default = "default_include", deserialize_with = "one_or_many")]
    pub include: Vec<String>,
    /// Runner defaults
    #[serde(default)]
    pub runner: RunnerConfig,
}

impl Default for QuickConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            runner: RunnerConfig::default(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec!["benches/**/*.rs".to_string()]
}

/// Runner defaults; CLI flags take precedence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Measured invocations per benchmark
    #[serde(default)]
    pub iterations: Option<u32>,
    /// Decimal places in rounded output
    #[serde(default)]
    pub fixed: Option<u32>,
    /// Per-invocation timeout (e.g., "500ms", "30s")
    #[serde(default)]
    pub timeout: Option<String>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(pattern) => vec![pattern],
        OneOrMany::Many(patterns) => patterns,
    })
}

/// A configuration together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// Path of the configuration file
    pub path: PathBuf,
    /// Parsed configuration
    pub config: QuickConfig,
}

impl LoadedConfig {
    /// Directory include patterns are resolved against
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

impl QuickConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<LoadedConfig, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(LoadedConfig {
            path: path.to_path_buf(),
            config,
        })
    }

    /// Discover and load configuration by walking up from `start`
    pub fn discover(start: &Path) -> Result<LoadedConfig, ConfigError> {
        let mut dir = start.to_path_buf();
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.is_file() {
                tracing::debug!(path = %config_path.display(), "found configuration");
                return Self::load(&config_path);
            }
            if !dir.pop() {
                break;
            }
        }
        Err(ConfigError::NotFound {
            start: start.to_path_buf(),
        })
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# QuickBench Configuration

# Files to search for benchmarks (string or list of glob patterns).
# Only files whose name ends in "bench" (e.g. parser_bench.rs) are run.
include = ["benches/**/*.rs"]

[runner]
# Measured invocations per benchmark (after 3 warm-up calls)
iterations = 3
# Decimal places in rounded output; setting it also reports totalTimeMs
# fixed = 3
# Per-invocation timeout for async benchmarks (uncomment to enable)
# timeout = "30s"
"#
        .to_string()
    }

    /// Parse duration string (e.g., "3s", "500ms", "2m")
    pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigError::InvalidDuration("empty duration string".to_string()));
        }

        // Find where the number ends and unit begins
        let (num_part, unit_part) = s
            .char_indices()
            .find(|(_, c)| c.is_alphabetic())
            .map(|(i, _)| s.split_at(i))
            .unwrap_or((s, "s"));

        let value: f64 = num_part
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidDuration(format!("invalid number: {}", num_part)))?;
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidDuration(s.to_string()));
        }

        let multiplier: f64 = match unit_part.to_lowercase().as_str() {
            "ns" => 1e-9,
            "us" | "µs" => 1e-6,
            "ms" => 1e-3,
            "s" | "" => 1.0,
            "m" | "min" => 60.0,
            _ => {
                return Err(ConfigError::InvalidDuration(format!(
                    "unknown unit: {}",
                    unit_part
                )));
            }
        };

        Duration::try_from_secs_f64(value * multiplier)
            .map_err(|e| ConfigError::InvalidDuration(format!("{}: {}", s, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = QuickConfig::default();
        assert_eq!(config.include, ["benches/**/*.rs"]);
        assert!(config.runner.iterations.is_none());
        assert!(config.runner.fixed.is_none());
    }

    #[test]
    fn test_parse_duration() {
        let parse = |s| QuickConfig::parse_duration(s).unwrap();
        assert_eq!(parse("3s"), Duration::from_secs(3));
        assert_eq!(parse("500ms"), Duration::from_millis(500));
        assert_eq!(parse("100us"), Duration::from_micros(100));
        assert_eq!(parse("2m"), Duration::from_secs(120));
        assert_eq!(parse("1.5s"), Duration::from_millis(1500));
        assert_eq!(parse("10"), Duration::from_secs(10));
        assert!(QuickConfig::parse_duration("").is_err());
        assert!(QuickConfig::parse_duration("5 parsecs").is_err());
        assert!(QuickConfig::parse_duration("-1s").is_err());
    }

    #[test]
    fn test_parse_duration_overflow() {
        for input in ["99999999999999999999999", "99999999999999999999m"] {
            let err = QuickConfig::parse_duration(input).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidDuration(_)), "{}", input);
        }
    }

    #[test]
    fn test_include_string_or_list() {
        let single: QuickConfig = toml::from_str(r#"include = "src/**/*_bench.rs""#).unwrap();
        assert_eq!(single.include, ["src/**/*_bench.rs"]);

        let many: QuickConfig = toml::from_str(
            r#"
            include = ["a/*.rs", "b/*.rs"]

            [runner]
            iterations = 10
            timeout = "250ms"
        "#,
        )
        .unwrap();
        assert_eq!(many.include, ["a/*.rs", "b/*.rs"]);
        assert_eq!(many.runner.iterations, Some(10));
        assert_eq!(many.runner.timeout.as_deref(), Some("250ms"));
    }

    #[test]
    fn test_default_toml_parses() {
        let config: QuickConfig = toml::from_str(&QuickConfig::default_toml()).unwrap();
        assert_eq!(config.runner.iterations, Some(3));
    }

    #[test]
    fn test_discover_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "include = \"benches/*.rs\"").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let loaded = QuickConfig::discover(&nested).unwrap();
        assert_eq!(loaded.root(), dir.path());
        assert_eq!(loaded.config.include, ["benches/*.rs"]);
    }

    #[test]
    fn test_missing_and_malformed_config_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            QuickConfig::load(dir.path().join(CONFIG_FILE)),
            Err(ConfigError::Read { .. })
        ));

        std::fs::write(dir.path().join(CONFIG_FILE), "include = [unterminated").unwrap();
        assert!(matches!(
            QuickConfig::discover(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
