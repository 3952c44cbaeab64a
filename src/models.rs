//! Data models for the review sentiment pipeline.
//!
//! This module contains the core data structures used throughout
//! the application for representing reviews, scores, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Polarity strictly above this value is Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.1;

/// Polarity strictly below this value is Negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.1;

/// Sentiment category derived from a polarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentCategory {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SentimentCategory {
    /// All categories in display order.
    pub const ALL: [SentimentCategory; 3] = [
        SentimentCategory::Positive,
        SentimentCategory::Negative,
        SentimentCategory::Neutral,
    ];

    /// Categorize a polarity score. Both thresholds are exclusive, so
    /// exactly 0.1 and -0.1 are Neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > POSITIVE_THRESHOLD {
            SentimentCategory::Positive
        } else if polarity < NEGATIVE_THRESHOLD {
            SentimentCategory::Negative
        } else {
            SentimentCategory::Neutral
        }
    }

    /// Label written to the `sentiment_category` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "Positive",
            SentimentCategory::Negative => "Negative",
            SentimentCategory::Neutral => "Neutral",
        }
    }

    /// Returns an emoji representation of the category.
    pub fn emoji(&self) -> &'static str {
        match self {
            SentimentCategory::Positive => "🟢",
            SentimentCategory::Negative => "🔴",
            SentimentCategory::Neutral => "⚪",
        }
    }
}

/// One input record: free text plus an optional identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewRow {
    /// Identifier from the `reviewID` column, if present.
    pub id: Option<String>,
    /// Review text. Lossily decoded when the source bytes were not UTF-8.
    pub text: String,
    /// Set when the source bytes were not valid UTF-8.
    pub malformed: bool,
}

impl ReviewRow {
    /// Creates a row from already-decoded text.
    pub fn new(id: Option<String>, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            malformed: false,
        }
    }

    /// Creates a row from raw field bytes.
    pub fn from_bytes(id: Option<String>, bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::new(id, text),
            Err(_) => Self {
                id,
                text: String::from_utf8_lossy(bytes).into_owned(),
                malformed: true,
            },
        }
    }
}

/// A review with its derived sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    /// Polarity in [-1.0, 1.0].
    pub polarity: f64,
    pub category: SentimentCategory,
    /// True when the polarity fell back to 0.0 because of a row anomaly.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub degraded: bool,
}

/// Category counts over a scored table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    /// Rows whose score fell back to the neutral default.
    pub degraded: usize,
    /// Mean polarity over all rows (0.0 when empty).
    pub mean_polarity: f64,
}

impl SentimentSummary {
    /// Creates a summary from scored rows.
    pub fn from_rows(rows: &[ScoredRow]) -> Self {
        let mut summary = Self {
            total: rows.len(),
            ..Self::default()
        };
        let mut polarity_sum = 0.0;

        for row in rows {
            match row.category {
                SentimentCategory::Positive => summary.positive += 1,
                SentimentCategory::Negative => summary.negative += 1,
                SentimentCategory::Neutral => summary.neutral += 1,
            }
            if row.degraded {
                summary.degraded += 1;
            }
            polarity_sum += row.polarity;
        }

        if summary.total > 0 {
            summary.mean_polarity = polarity_sum / summary.total as f64;
        }

        summary
    }

    /// Number of rows in a category.
    pub fn count(&self, category: SentimentCategory) -> usize {
        match category {
            SentimentCategory::Positive => self.positive,
            SentimentCategory::Negative => self.negative,
            SentimentCategory::Neutral => self.neutral,
        }
    }

    /// Share of rows in a category, in percent. Zero for an empty table.
    pub fn percentage(&self, category: SentimentCategory) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.total as f64 * 100.0
    }

    /// `"n (p%)"` label used for the key metrics.
    pub fn metric_label(&self, category: SentimentCategory) -> String {
        format!(
            "{} ({:.1}%)",
            self.count(category),
            self.percentage(category)
        )
    }
}

/// One bar of the category distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub category: SentimentCategory,
    pub count: usize,
    pub percentage: f64,
}

/// Metadata about a scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Input file name, or `<stdin>`.
    pub input: String,
    /// Date and time of the run.
    pub generated_at: DateTime<Utc>,
    /// Name of the polarity model.
    pub model_used: String,
    /// Number of scored rows.
    pub rows: usize,
    /// Rows that fell back to the neutral default.
    pub degraded_rows: usize,
    /// Duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summary: SentimentSummary,
    pub distribution: Vec<DistributionEntry>,
    /// Input header row.
    pub columns: Vec<String>,
    /// First rows of the raw input, for the preview section.
    pub preview: Vec<Vec<String>>,
    pub rows: Vec<ScoredRow>,
}
