//! Per-row sentiment scoring.
//!
//! Turns review rows into scored rows, one output per input, in input
//! order. Row-level anomalies never abort the batch: the row gets the
//! neutral default polarity and is flagged as degraded.

use crate::models::{ReviewRow, ScoredRow, SentimentCategory};
use crate::sentiment::PolarityModel;
use indicatif::ProgressBar;
use tracing::{debug, warn};

/// Polarity used for empty text and for rows that could not be scored.
pub const NEUTRAL_DEFAULT: f64 = 0.0;

/// Score every row with `model`.
#[allow(dead_code)] // Plain entry point without progress reporting
pub fn score<M: PolarityModel>(rows: &[ReviewRow], model: &M) -> Vec<ScoredRow> {
    score_with_progress(rows, model, &ProgressBar::hidden())
}

/// Score every row, ticking `progress` once per row.
pub fn score_with_progress<M: PolarityModel>(
    rows: &[ReviewRow],
    model: &M,
    progress: &ProgressBar,
) -> Vec<ScoredRow> {
    debug!("Scoring {} rows with model '{}'", rows.len(), model.name());

    let scored = rows
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let scored = score_row(index, row, model);
            progress.inc(1);
            scored
        })
        .collect();

    progress.finish_and_clear();
    scored
}

/// Score a single row. `index` is only used for diagnostics.
pub fn score_row<M: PolarityModel>(index: usize, row: &ReviewRow, model: &M) -> ScoredRow {
    let (polarity, degraded) = row_polarity(index, row, model);

    ScoredRow {
        id: row.id.clone(),
        text: row.text.clone(),
        polarity,
        category: SentimentCategory::from_polarity(polarity),
        degraded,
    }
}

fn row_polarity<M: PolarityModel>(index: usize, row: &ReviewRow, model: &M) -> (f64, bool) {
    if row.malformed {
        warn!(
            "Row {} ({}): review text is not valid UTF-8, using neutral score",
            index + 1,
            row_label(row)
        );
        return (NEUTRAL_DEFAULT, true);
    }

    if row.text.trim().is_empty() {
        return (NEUTRAL_DEFAULT, false);
    }

    let raw = model.polarity(&row.text);
    if !raw.is_finite() {
        warn!(
            "Row {} ({}): model '{}' returned {}, using neutral score",
            index + 1,
            row_label(row),
            model.name(),
            raw
        );
        return (NEUTRAL_DEFAULT, true);
    }

    (raw.clamp(-1.0, 1.0), false)
}

fn row_label(row: &ReviewRow) -> String {
    match row.id {
        Some(ref id) => format!("id {}", id),
        None => "no id".to_string(),
    }
}
