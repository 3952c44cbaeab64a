//! Dashboard report generation.
//!
//! This module renders the Markdown and JSON dashboards from a
//! [`Report`].

use super::chart::render_bar_chart;
use crate::analysis::strongest;
use crate::config::ReportConfig;
use crate::models::{Report, ReportMetadata, ScoredRow, SentimentCategory, SentimentSummary};
use crate::table::format_score;
use anyhow::{Context, Result};

/// Rows quoted in the strongest-reviews section, per category.
const HIGHLIGHTS_PER_CATEGORY: usize = 3;

/// Generate a complete Markdown dashboard.
pub fn generate_markdown_report(report: &Report, config: &ReportConfig) -> String {
    let mut output = String::new();

    output.push_str("# Customer Review Sentiment Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_metrics_section(&report.summary));
    output.push_str(&generate_distribution_section(report, config.chart_width));
    output.push_str(&generate_highlights_section(&report.rows, config.max_text_chars));
    output.push_str(&generate_preview_section(
        &report.columns,
        &report.preview,
        config.max_text_chars,
    ));

    if config.include_rows {
        output.push_str(&generate_rows_section(&report.rows, config.max_text_chars));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Input:** `{}`\n", metadata.input));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Model:** `{}`\n", metadata.model_used));
    section.push_str(&format!("- **Rows:** {}\n", metadata.rows));
    if metadata.degraded_rows > 0 {
        section.push_str(&format!(
            "- **Rows scored with neutral default:** {}\n",
            metadata.degraded_rows
        ));
    }
    section.push_str(&format!(
        "- **Duration:** {:.2}s\n",
        metadata.duration_seconds
    ));
    section.push('\n');

    section
}

/// Generate the key metrics section.
fn generate_metrics_section(summary: &SentimentSummary) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!("| Total Reviews | {} |\n", summary.total));
    for category in SentimentCategory::ALL {
        section.push_str(&format!(
            "| {} {} Reviews | {} |\n",
            category.emoji(),
            category,
            summary.metric_label(category)
        ));
    }
    section.push_str(&format!(
        "| Mean Polarity | {:.3} |\n\n",
        summary.mean_polarity
    ));

    section
}

/// Generate the distribution table and chart.
fn generate_distribution_section(report: &Report, chart_width: usize) -> String {
    let mut section = String::new();

    section.push_str("## Sentiment Distribution\n\n");

    if report.distribution.is_empty() {
        section.push_str("No reviews to chart.\n\n");
        return section;
    }

    section.push_str("| Category | Count | Share |\n");
    section.push_str("|:---|:---:|:---:|\n");
    for entry in &report.distribution {
        section.push_str(&format!(
            "| {} {} | {} | {:.1}% |\n",
            entry.category.emoji(),
            entry.category,
            entry.count,
            entry.percentage
        ));
    }
    section.push('\n');

    section.push_str("```text\n");
    section.push_str(&render_bar_chart(&report.distribution, chart_width));
    section.push_str("```\n\n");

    section
}

/// Generate the strongest positive and negative reviews.
fn generate_highlights_section(rows: &[ScoredRow], max_chars: usize) -> String {
    let mut section = String::new();

    let groups = [
        ("Most Positive", SentimentCategory::Positive),
        ("Most Negative", SentimentCategory::Negative),
    ];

    for (title, category) in groups {
        let top = strongest(rows, category, HIGHLIGHTS_PER_CATEGORY);
        if top.is_empty() {
            continue;
        }

        if section.is_empty() {
            section.push_str("## Highlights\n\n");
        }
        section.push_str(&format!("### {} {}\n\n", category.emoji(), title));
        for row in top {
            section.push_str(&format!(
                "> {} *({})*\n\n",
                truncate(&row.text, max_chars).replace('\n', " "),
                format_score(row.polarity)
            ));
        }
    }

    section
}

/// Generate the raw data preview.
fn generate_preview_section(columns: &[String], preview: &[Vec<String>], max_chars: usize) -> String {
    let mut section = String::new();

    section.push_str("## Raw Data Preview\n\n");

    if preview.is_empty() {
        section.push_str("The input has no data rows.\n\n");
        return section;
    }

    section.push_str(&table_row(columns.iter().map(String::as_str)));
    section.push_str(&format!("|{}\n", ":---|".repeat(columns.len())));
    for record in preview {
        let cells: Vec<String> = record
            .iter()
            .map(|cell| truncate(cell, max_chars))
            .collect();
        section.push_str(&table_row(cells.iter().map(String::as_str)));
    }
    section.push('\n');

    section
}

/// Generate the analyzed data table.
fn generate_rows_section(rows: &[ScoredRow], max_chars: usize) -> String {
    let mut section = String::new();

    section.push_str("## Analyzed Data\n\n");

    if rows.is_empty() {
        section.push_str("No reviews were analyzed.\n\n");
        return section;
    }

    section.push_str("| # | ID | Review | Score | Category |\n");
    section.push_str("|---:|:---|:---|---:|:---|\n");
    for (i, row) in rows.iter().enumerate() {
        let text = truncate(&row.text, max_chars);
        section.push_str(&table_row(
            [
                (i + 1).to_string().as_str(),
                row.id.as_deref().unwrap_or(""),
                text.as_str(),
                format_score(row.polarity).as_str(),
                row.category.as_str(),
            ]
            .into_iter(),
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by ReviewPulse*\n".to_string()
}

/// A Markdown table row with pipes and line breaks escaped.
fn table_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let escaped: Vec<String> = cells
        .map(|cell| cell.replace('|', "\\|").replace(['\r', '\n'], " "))
        .collect();
    format!("| {} |\n", escaped.join(" | "))
}

/// Shorten `text` to at most `max_chars` characters, marking the cut.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Render a report in the given format.
pub fn render_report(
    report: &Report,
    format: crate::cli::OutputFormat,
    config: &ReportConfig,
) -> Result<String> {
    match format {
        crate::cli::OutputFormat::Json => {
            generate_json_report(report).context("Failed to render JSON report")
        }
        crate::cli::OutputFormat::Markdown => Ok(generate_markdown_report(report, config)),
    }
}
