//! Category statistics.
//!
//! This module computes the category distribution and the text summary
//! shown after a run.

use crate::models::{DistributionEntry, ScoredRow, SentimentCategory, SentimentSummary};
use std::collections::HashMap;

/// Category counts in descending order, zero counts omitted.
///
/// Ties keep the Positive, Negative, Neutral order.
pub fn distribution(summary: &SentimentSummary) -> Vec<DistributionEntry> {
    let mut entries: Vec<DistributionEntry> = SentimentCategory::ALL
        .iter()
        .map(|&category| DistributionEntry {
            category,
            count: summary.count(category),
            percentage: summary.percentage(category),
        })
        .filter(|entry| entry.count > 0)
        .collect();

    // Stable sort keeps the declaration order for ties
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.count));

    entries
}

/// Group scored rows by category.
pub fn group_by_category(rows: &[ScoredRow]) -> HashMap<SentimentCategory, Vec<&ScoredRow>> {
    let mut grouped: HashMap<SentimentCategory, Vec<&ScoredRow>> = HashMap::new();

    for row in rows {
        grouped.entry(row.category).or_default().push(row);
    }

    grouped
}

/// The `n` most extreme rows of a category, strongest first.
pub fn strongest(rows: &[ScoredRow], category: SentimentCategory, n: usize) -> Vec<&ScoredRow> {
    let mut matching: Vec<&ScoredRow> = group_by_category(rows)
        .remove(&category)
        .unwrap_or_default();

    matching.sort_by(|a, b| {
        b.polarity
            .abs()
            .partial_cmp(&a.polarity.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matching.truncate(n);

    matching
}

/// Generate a text summary of the key metrics.
pub fn generate_summary_text(summary: &SentimentSummary) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Total Reviews: {}", summary.total));
    for category in SentimentCategory::ALL {
        lines.push(format!(
            "- {} {} Reviews: {}",
            category.emoji(),
            category,
            summary.metric_label(category)
        ));
    }
    lines.push(format!("Mean polarity: {:.3}", summary.mean_polarity));

    if summary.degraded > 0 {
        lines.push(format!(
            "Rows scored with the neutral default: {}",
            summary.degraded
        ));
    }

    lines.join("\n")
}
