//! ReviewPulse - Customer review sentiment dashboard
//!
//! A CLI tool that scores the sentiment of every review in a CSV file,
//! prints key metrics and a category chart, and writes the annotated
//! table back out as CSV.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (missing `review_text` column, unparseable CSV, I/O, config)

mod analysis;
mod cli;
mod config;
mod error;
mod models;
mod output;
mod pipeline;
mod report;
mod sentiment;
mod table;

use anyhow::{Context, Result};
use cli::Args;
use config::{Config, CONFIG_FILE_NAME};
use error::PipelineError;
use indicatif::{ProgressBar, ProgressStyle};
use output::OutputSet;
use pipeline::{InputSource, PipelineOutcome};
use sentiment::LexiconModel;
use std::fmt::Display;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    // Initialize logging
    init_logging(&args);

    info!("ReviewPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\n❌ Error processing file: {:#}", e);

        let schema_error = e
            .downcast_ref::<PipelineError>()
            .is_some_and(PipelineError::is_schema);
        if schema_error {
            eprintln!("   Expected a header such as: reviewID,review_text");
        }
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .reviewpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to add lexicon words or change report settings.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so `-o -` can stream the CSV on stdout.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

/// Human-facing status lines. They move to stderr when stdout carries the CSV.
struct Console {
    quiet: bool,
    to_stderr: bool,
}

impl Console {
    fn line(&self, message: impl Display) {
        if self.quiet {
            return;
        }
        if self.to_stderr {
            eprintln!("{}", message);
        } else {
            println!("{}", message);
        }
    }
}

/// Run the complete analysis.
fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = Config::resolve(args.config.as_deref(), Path::new("."))?;
    config.merge_with_args(&args);
    config.validate().context("Invalid settings")?;

    let console = Console {
        quiet: args.quiet,
        to_stderr: config.general.output_is_stdout(),
    };

    // Step 1: Read the table
    let source = InputSource::from_arg(args.input());
    console.line(format!("📥 Reading reviews: {}", source.display_name()));
    let table = source
        .read_table()
        .with_context(|| format!("Failed to load {}", source.display_name()))?;
    info!("Loaded {} rows", table.len());

    if table.is_empty() {
        warn!("Input has a header but no reviews");
    }

    // Step 2: Score
    let model = LexiconModel::with_words(&config.lexicon.words);
    debug!(
        "Lexicon model ready with {} words ({} custom)",
        model.lexicon().len(),
        config.lexicon.words.len()
    );

    console.line("⏳ Analyzing sentiment...");
    let progress = progress_bar(!args.quiet && std::io::stderr().is_terminal())?;
    let outcome = pipeline::run(table, &model, &progress)?;

    // Step 3: Render outputs
    let mut outputs = OutputSet::new();
    if config.general.output_is_stdout() {
        outputs.add_stdout(outcome.csv.clone());
    } else {
        outputs.add_file(&config.general.output, outcome.csv.clone());
    }

    if let Some(ref report_path) = args.report {
        let report = outcome.build_report(&source.display_name(), config.report.preview_rows);
        let content = report::render_report(&report, args.format, &config.report)?;
        outputs.add_file(report_path, content.into_bytes());
    }

    // Step 4: Write everything, or nothing
    outputs.commit()?;

    if !config.general.output_is_stdout() {
        console.line(format!("💾 Analyzed CSV saved to: {}", config.general.output));
    }
    if let Some(ref report_path) = args.report {
        console.line(format!("📝 Dashboard report saved to: {}", report_path.display()));
    }

    print_summary(&outcome, config.report.chart_width, &console);
    Ok(())
}

/// Print key metrics and the distribution chart.
fn print_summary(outcome: &PipelineOutcome, chart_width: usize, console: &Console) {
    console.line("\n📊 Key Metrics:");
    console.line(
        analysis::generate_summary_text(&outcome.summary)
            .lines()
            .map(|l| format!("   {}", l))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    console.line("\n📈 Sentiment Distribution:");
    console.line(
        report::render_bar_chart(&outcome.distribution, chart_width)
            .lines()
            .map(|l| format!("   {}", l))
            .collect::<Vec<_>>()
            .join("\n"),
    );

    console.line(format!(
        "\n✅ Analysis complete in {:.2}s",
        outcome.duration_seconds
    ));
}

/// Progress bar on stderr, hidden when not wanted.
fn progress_bar(visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
