//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// ReviewPulse - sentiment dashboard for customer reviews
///
/// Reads a CSV with a `review_text` column, scores every review's
/// polarity, labels it Positive, Negative or Neutral, prints key metrics
/// and writes the annotated table back out as CSV.
///
/// Examples:
///   reviewpulse reviews.csv
///   reviewpulse reviews.csv -o scored.csv --report dashboard.md
///   reviewpulse reviews.csv --report dashboard.json --format json
///   cat reviews.csv | reviewpulse - -o - > scored.csv
///   reviewpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV file of reviews, or `-` for standard input
    ///
    /// Must contain a column named `review_text`. Not required with --init-config.
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    pub input: Option<String>,

    /// Path of the annotated CSV, or `-` for standard output
    ///
    /// Defaults to the config file setting, then `sentiment_results.csv`.
    #[arg(short, long, value_name = "FILE", env = "REVIEWPULSE_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Also write a dashboard report to this file
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Dashboard report format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of raw rows shown in the report preview
    #[arg(long, value_name = "COUNT")]
    pub preview_rows: Option<usize>,

    /// Width of the longest bar in the distribution chart
    #[arg(long, value_name = "CELLS")]
    pub chart_width: Option<usize>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .reviewpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .reviewpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Input argument, `-` when absent.
    pub fn input(&self) -> &str {
        self.input.as_deref().unwrap_or("-")
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.chart_width == Some(0) {
            return Err("Chart width must be at least 1".to_string());
        }

        let input = self.input();
        if input != "-" {
            let path = std::path::Path::new(input);
            if !path.exists() {
                return Err(format!("Input file does not exist: {}", input));
            }
            if !path.is_file() {
                return Err(format!("Input path is not a file: {}", input));
            }
        }

        if let Some(ref report) = self.report {
            if report.as_os_str() == "-" {
                return Err("Report cannot be written to standard output".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: Some("-".to_string()),
            output: None,
            report: None,
            format: OutputFormat::Markdown,
            preview_rows: None,
            chart_width: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_defaults() {
        let args = Args::parse_from(["reviewpulse", "reviews.csv"]);
        assert_eq!(args.input(), "reviews.csv");
        assert_eq!(args.format, OutputFormat::Markdown);
        assert!(args.report.is_none());
    }

    #[test]
    fn test_parse_json_report() {
        let args = Args::parse_from([
            "reviewpulse",
            "-",
            "-o",
            "-",
            "--report",
            "dash.json",
            "--format",
            "json",
        ]);
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.output, Some(PathBuf::from("-")));
        assert_eq!(args.report, Some(PathBuf::from("dash.json")));
    }

    #[test]
    fn test_input_required_unless_init_config() {
        assert!(Args::try_parse_from(["reviewpulse"]).is_err());
        assert!(Args::try_parse_from(["reviewpulse", "--init-config"]).is_ok());
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = Some("/nonexistent/reviews.csv".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_stdin_input() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_report_to_stdout() {
        let mut args = make_args();
        args.report = Some(PathBuf::from("-"));
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
