//! The scoring pipeline: read, check schema, score, summarize, export.
//!
//! Everything runs over one in-memory table. Fatal errors surface before
//! any output is produced; the annotated CSV is built in memory and only
//! handed to the caller once every step has succeeded.

use crate::analysis::{distribution, score_with_progress};
use crate::error::{PipelineError, Result};
use crate::models::{DistributionEntry, Report, ReportMetadata, ScoredRow, SentimentSummary};
use crate::sentiment::PolarityModel;
use crate::table::ReviewTable;
use chrono::Utc;
use indicatif::ProgressBar;
use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

/// Where the review table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means standard input, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Name shown in reports.
    pub fn display_name(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }

    /// Read and schema-check the table.
    pub fn read_table(&self) -> Result<ReviewTable> {
        match self {
            InputSource::Stdin => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .lock()
                    .read_to_end(&mut buffer)
                    .map_err(|source| PipelineError::Io {
                        path: PathBuf::from("<stdin>"),
                        source,
                    })?;
                ReviewTable::from_reader(buffer.as_slice())
            }
            InputSource::File(path) => ReviewTable::from_path(path),
        }
    }
}

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub table: ReviewTable,
    pub rows: Vec<ScoredRow>,
    pub summary: SentimentSummary,
    pub distribution: Vec<DistributionEntry>,
    /// The annotated table, serialized.
    pub csv: Vec<u8>,
    pub model_name: String,
    pub duration_seconds: f64,
}

impl PipelineOutcome {
    /// Assemble the dashboard report for this run.
    pub fn build_report(&self, input: &str, preview_rows: usize) -> Report {
        Report {
            metadata: ReportMetadata {
                input: input.to_string(),
                generated_at: Utc::now(),
                model_used: self.model_name.clone(),
                rows: self.summary.total,
                degraded_rows: self.summary.degraded,
                duration_seconds: self.duration_seconds,
            },
            summary: self.summary.clone(),
            distribution: self.distribution.clone(),
            columns: self.table.headers(),
            preview: self.table.preview(preview_rows),
            rows: self.rows.clone(),
        }
    }
}

/// Score a table that has already passed the schema check.
pub fn run<M: PolarityModel>(
    table: ReviewTable,
    model: &M,
    progress: &ProgressBar,
) -> Result<PipelineOutcome> {
    let start = Instant::now();

    let review_rows = table.rows();
    info!("Analyzing sentiment of {} reviews", review_rows.len());

    progress.set_length(review_rows.len() as u64);
    let rows = score_with_progress(&review_rows, model, progress);

    let summary = SentimentSummary::from_rows(&rows);
    let distribution = distribution(&summary);
    debug!(
        "Positive: {}, Negative: {}, Neutral: {}",
        summary.positive, summary.negative, summary.neutral
    );

    let csv = table.to_scored_csv(&rows)?;

    Ok(PipelineOutcome {
        table,
        rows,
        summary,
        distribution,
        csv,
        model_name: model.name().to_string(),
        duration_seconds: start.elapsed().as_secs_f64(),
    })
}

/// Read a table from `reader` and run the whole pipeline without progress output.
#[allow(dead_code)] // In-memory entry point for embedding and tests
pub fn analyze<R: Read, M: PolarityModel>(reader: R, model: &M) -> Result<PipelineOutcome> {
    let table = ReviewTable::from_reader(reader)?;
    run(table, model, &ProgressBar::hidden())
}
