//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.reviewpulse.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".reviewpulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Lexicon settings.
    #[serde(default)]
    pub lexicon: LexiconConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default path of the annotated CSV.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
        }
    }
}

impl GeneralConfig {
    /// Whether the annotated CSV goes to standard output.
    pub fn output_is_stdout(&self) -> bool {
        self.output == "-"
    }
}

fn default_output() -> String {
    "sentiment_results.csv".to_string()
}

/// Polarity lexicon settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Extra word scores; these override built-in entries.
    ///
    /// ```toml
    /// [lexicon.words]
    /// snappy = 0.6
    /// laggy = -0.8
    /// ```
    #[serde(default)]
    pub words: BTreeMap<String, f64>,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Rows shown in the raw data preview.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,

    /// Length of the longest bar in the distribution chart.
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    /// Review text is truncated to this many characters in reports.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,

    /// Include the full analyzed data table.
    #[serde(default = "default_true")]
    pub include_rows: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            chart_width: default_chart_width(),
            max_text_chars: default_max_text_chars(),
            include_rows: true,
        }
    }
}

fn default_preview_rows() -> usize {
    5
}

fn default_chart_width() -> usize {
    40
}

fn default_max_text_chars() -> usize {
    80
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load the explicit config file if given, else `.reviewpulse.toml`
    /// in `dir` if present, else defaults.
    ///
    /// A file that exists but cannot be read, parsed or validated is an error.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Loading config from: {}", path.display());
            return Self::load(path);
        }

        match Self::load_from_dir(dir)? {
            Some(config) => {
                info!("Loaded default config from {}", CONFIG_FILE_NAME);
                Ok(config)
            }
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Try to load configuration from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        for (word, score) in &self.lexicon.words {
            if word.trim().is_empty() {
                anyhow::bail!("lexicon words must not be empty");
            }
            if !score.is_finite() || !(-1.0..=1.0).contains(score) {
                anyhow::bail!(
                    "lexicon score for '{}' must be between -1.0 and 1.0, got {}",
                    word,
                    score
                );
            }
        }

        if self.report.chart_width == 0 {
            anyhow::bail!("report.chart_width must be at least 1");
        }

        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(rows) = args.preview_rows {
            self.report.preview_rows = rows;
        }

        if let Some(width) = args.chart_width {
            self.report.chart_width = width;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let mut config = Config::default();
        config.lexicon.words.insert("snappy".to_string(), 0.6);
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.output, "sentiment_results.csv");
        assert_eq!(config.report.preview_rows, 5);
        assert!(config.report.include_rows);
        assert!(config.lexicon.words.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "annotated.csv"

[lexicon.words]
snappy = 0.6
laggy = -0.8

[report]
preview_rows = 10
include_rows = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "annotated.csv");
        assert_eq!(config.lexicon.words.get("snappy"), Some(&0.6));
        assert_eq!(config.lexicon.words.get("laggy"), Some(&-0.8));
        assert_eq!(config.report.preview_rows, 10);
        assert_eq!(config.report.chart_width, 40);
        assert!(!config.report.include_rows);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_scores() {
        let mut config = Config::default();
        config.lexicon.words.insert("wow".to_string(), 1.5);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.report.chart_width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[report]\nchart_width = 20\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.report.chart_width, 20);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[report\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_resolve() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::resolve(None, dir.path()).unwrap();
        assert_eq!(config.report.chart_width, 40);

        let explicit = dir.path().join("custom.toml");
        std::fs::write(&explicit, "[report]\npreview_rows = 2\n").unwrap();
        let config = Config::resolve(Some(&explicit), dir.path()).unwrap();
        assert_eq!(config.report.preview_rows, 2);

        assert!(Config::resolve(Some(&dir.path().join("missing.toml")), dir.path()).is_err());
    }

    #[test]
    fn test_resolve_rejects_broken_default_file() {
        let dir = tempfile::tempdir().unwrap();

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[report\n").unwrap();
        assert!(Config::resolve(None, dir.path()).is_err());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[lexicon.words]\nwow = 2.0\n",
        )
        .unwrap();
        assert!(Config::resolve(None, dir.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args::parse_from([
            "reviewpulse",
            "reviews.csv",
            "-o",
            "out.csv",
            "--preview-rows",
            "3",
        ]);

        let mut config = Config::default();
        config.report.chart_width = 25;
        config.merge_with_args(&args);

        assert_eq!(config.general.output, "out.csv");
        assert!(!config.general.output_is_stdout());
        assert_eq!(config.report.preview_rows, 3);
        assert_eq!(config.report.chart_width, 25);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("snappy = 0.6"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.lexicon.words.get("snappy"), Some(&0.6));
    }
}
