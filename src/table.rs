//! CSV intake and export.
//!
//! The table keeps every input field as raw bytes so that columns the
//! pipeline does not touch are written back exactly as they were read.

use crate::error::{PipelineError, Result};
use crate::models::{ReviewRow, ScoredRow};
use csv::{ByteRecord, ReaderBuilder, WriterBuilder};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

/// Column holding the review text. Required.
pub const TEXT_COLUMN: &str = "review_text";

/// Optional identifier column.
pub const ID_COLUMN: &str = "reviewID";

/// Appended polarity column.
pub const SCORE_COLUMN: &str = "sentiment_score";

/// Appended category column.
pub const CATEGORY_COLUMN: &str = "sentiment_category";

/// An in-memory CSV table of reviews.
#[derive(Debug, Clone)]
pub struct ReviewTable {
    headers: ByteRecord,
    records: Vec<ByteRecord>,
    text_index: usize,
    id_index: Option<usize>,
}

impl ReviewTable {
    /// Read a table from a file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Read a table from any reader.
    ///
    /// The header is checked for the text column before any record is
    /// read, so a schema error never comes with partial data. Rows shorter
    /// than the header are padded with empty fields; longer rows are an
    /// error.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .byte_headers()
            .map_err(|source| PipelineError::Parse { source })?
            .clone();

        if headers.is_empty() {
            return Err(PipelineError::EmptyInput);
        }

        let text_index = find_column(&headers, TEXT_COLUMN)
            .ok_or_else(|| PipelineError::missing_field(TEXT_COLUMN))?;
        let id_index = find_column(&headers, ID_COLUMN);

        let width = headers.len();
        let mut records = Vec::new();
        for result in reader.byte_records() {
            let mut record = result.map_err(|source| PipelineError::Parse { source })?;

            if record.len() > width {
                return Err(PipelineError::TooManyFields {
                    line: record.position().map_or(0, |p| p.line()),
                    expected: width,
                    actual: record.len(),
                });
            }

            if record.len() < width {
                debug!(
                    "Padding short row ({} of {} fields)",
                    record.len(),
                    width
                );
                while record.len() < width {
                    record.push_field(b"");
                }
            }

            records.push(record);
        }

        debug!(
            "Read {} records with {} columns (text column at {})",
            records.len(),
            headers.len(),
            text_index
        );

        Ok(Self {
            headers,
            records,
            text_index,
            id_index,
        })
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header names, lossily decoded.
    pub fn headers(&self) -> Vec<String> {
        self.headers.iter().map(lossy).collect()
    }

    /// The review rows, in table order.
    pub fn rows(&self) -> Vec<ReviewRow> {
        self.records
            .iter()
            .map(|record| {
                let id = self
                    .id_index
                    .and_then(|i| record.get(i))
                    .filter(|bytes| !bytes.is_empty())
                    .map(lossy);
                let text = record.get(self.text_index).unwrap_or_default();
                ReviewRow::from_bytes(id, text)
            })
            .collect()
    }

    /// The first `n` records, lossily decoded.
    pub fn preview(&self, n: usize) -> Vec<Vec<String>> {
        self.records
            .iter()
            .take(n)
            .map(|record| record.iter().map(lossy).collect())
            .collect()
    }

    /// Write the table with score and category columns.
    ///
    /// Existing `sentiment_score`/`sentiment_category` columns are
    /// overwritten in place; otherwise both are appended.
    pub fn write_scored<W: Write>(&self, scored: &[ScoredRow], writer: W) -> Result<()> {
        if scored.len() != self.records.len() {
            return Err(PipelineError::RowCountMismatch {
                expected: self.records.len(),
                actual: scored.len(),
            });
        }

        let mut headers = self.headers.clone();
        let score_index = column_or_append(&mut headers, SCORE_COLUMN);
        let category_index = column_or_append(&mut headers, CATEGORY_COLUMN);

        let mut writer = WriterBuilder::new().from_writer(writer);
        writer
            .write_byte_record(&headers)
            .map_err(|source| PipelineError::Export { source })?;

        for (record, row) in self.records.iter().zip(scored) {
            let score = format_score(row.polarity);
            let mut out = ByteRecord::with_capacity(record.as_slice().len() + 16, headers.len());

            for index in 0..headers.len() {
                if index == score_index {
                    out.push_field(score.as_bytes());
                } else if index == category_index {
                    out.push_field(row.category.as_str().as_bytes());
                } else {
                    out.push_field(record.get(index).unwrap_or_default());
                }
            }

            writer
                .write_byte_record(&out)
                .map_err(|source| PipelineError::Export { source })?;
        }

        writer
            .flush()
            .map_err(|e| PipelineError::Export { source: e.into() })?;

        Ok(())
    }

    /// Serialize the scored table into memory.
    pub fn to_scored_csv(&self, scored: &[ScoredRow]) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_scored(scored, &mut buffer)?;
        Ok(buffer)
    }
}

/// Shortest decimal that round-trips, always with a fractional part and
/// never in exponent notation.
pub fn format_score(polarity: f64) -> String {
    if polarity == 0.0 {
        // Avoid "-0.0"
        return "0.0".to_string();
    }
    let mut formatted = polarity.to_string();
    if !formatted.contains('.') {
        formatted.push_str(".0");
    }
    formatted
}

fn find_column(headers: &ByteRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name.as_bytes())
}

fn column_or_append(headers: &mut ByteRecord, name: &str) -> usize {
    match find_column(headers, name) {
        Some(index) => index,
        None => {
            headers.push_field(name.as_bytes());
            headers.len() - 1
        }
    }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::scorer::score;
    use crate::models::SentimentCategory;
    use crate::sentiment::LexiconModel;

    const SAMPLE: &str = "reviewID,review_text\n\
                          1,Great app!\n\
                          2,\"Terrible, crashes constantly\"\n\
                          3,It's okay I guess\n";

    fn scored_csv(input: &[u8]) -> String {
        let table = ReviewTable::from_reader(input).unwrap();
        let scored = score(&table.rows(), &LexiconModel::default());
        String::from_utf8(table.to_scored_csv(&scored).unwrap()).unwrap()
    }

    #[test]
    fn test_read_table() {
        let table = ReviewTable::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.headers(), vec!["reviewID", "review_text"]);

        let rows = table.rows();
        assert_eq!(rows[1].id.as_deref(), Some("2"));
        assert_eq!(rows[1].text, "Terrible, crashes constantly");
        assert!(!rows[1].malformed);
    }

    #[test]
    fn test_missing_text_column() {
        let err = ReviewTable::from_reader("reviewID,comment\n1,Great\n".as_bytes()).unwrap_err();
        assert!(err.is_schema());
        assert!(err.to_string().contains("review_text"));
    }

    #[test]
    fn test_column_name_is_exact() {
        let err = ReviewTable::from_reader("Review_Text\nGreat\n".as_bytes()).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_empty_input() {
        let err = ReviewTable::from_reader("".as_bytes()).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyInput));
    }

    #[test]
    fn test_header_only() {
        let table = ReviewTable::from_reader("review_text\n".as_bytes()).unwrap();
        assert!(table.is_empty());
        assert_eq!(scored_csv(b"review_text\n"), "review_text,sentiment_score,sentiment_category\n");
    }

    #[test]
    fn test_long_rows_are_errors() {
        let err = ReviewTable::from_reader("reviewID,review_text\n1,good\n2,good,extra\n".as_bytes())
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::TooManyFields {
                line: 3,
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let table = ReviewTable::from_reader("reviewID,review_text\n1\n2,good\n".as_bytes()).unwrap();
        assert_eq!(table.len(), 2);

        let rows = table.rows();
        assert_eq!(rows[0].id.as_deref(), Some("1"));
        assert_eq!(rows[0].text, "");
        assert_eq!(rows[1].text, "good");

        let scored = score(&rows, &LexiconModel::default());
        assert_eq!(scored[0].polarity, 0.0);
        assert_eq!(scored[0].category, SentimentCategory::Neutral);

        let output = String::from_utf8(table.to_scored_csv(&scored).unwrap()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "1,,0.0,Neutral");
        assert_eq!(lines[2], "2,good,0.7,Positive");
    }

    #[test]
    fn test_missing_file() {
        let err = ReviewTable::from_path(Path::new("/nonexistent/reviews.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn test_write_scored_appends_columns() {
        let output = scored_csv(SAMPLE.as_bytes());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "reviewID,review_text,sentiment_score,sentiment_category");
        assert_eq!(lines[1], "1,Great app!,0.8,Positive");
        assert!(lines[2].starts_with("2,\"Terrible, crashes constantly\",-"));
        assert!(lines[2].ends_with(",Negative"));
        assert_eq!(lines[3], "3,It's okay I guess,0.1,Neutral");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_passthrough_columns_unchanged() {
        let input = b"review_text,rating,note\nnice,5,\"multi\nline\"\nbad \xff,1,\xfe\n";
        let table = ReviewTable::from_reader(&input[..]).unwrap();
        let scored = score(&table.rows(), &LexiconModel::default());
        let output = table.to_scored_csv(&scored).unwrap();

        let reread = ReviewTable::from_reader(output.as_slice()).unwrap();
        assert_eq!(reread.records[0].get(2), Some(&b"multi\nline"[..]));
        assert_eq!(reread.records[1].get(0), Some(&b"bad \xff"[..]));
        assert_eq!(reread.records[1].get(2), Some(&b"\xfe"[..]));
        assert!(scored[1].degraded);
    }

    #[test]
    fn test_existing_columns_replaced_in_place() {
        let first = scored_csv(SAMPLE.as_bytes());
        let second = scored_csv(first.as_bytes());
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_values() {
        let table = ReviewTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let scored = score(&table.rows(), &LexiconModel::default());
        let output = table.to_scored_csv(&scored).unwrap();

        let mut reader = csv::Reader::from_reader(output.as_slice());
        for (record, row) in reader.records().zip(&scored) {
            let record = record.unwrap();
            let polarity: f64 = record[2].parse().unwrap();
            assert_eq!(polarity, row.polarity);
            assert_eq!(&record[3], row.category.as_str());
            assert_eq!(&record[1], row.text);
        }
    }

    #[test]
    fn test_row_count_mismatch() {
        let table = ReviewTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let err = table.to_scored_csv(&[]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RowCountMismatch {
                expected: 3,
                actual: 0
            }
        ));
    }

    #[test]
    fn test_preview() {
        let table = ReviewTable::from_reader(SAMPLE.as_bytes()).unwrap();
        let preview = table.preview(2);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0], vec!["1", "Great app!"]);
        assert_eq!(table.preview(10).len(), 3);
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.8), "0.8");
        assert_eq!(format_score(-0.35), "-0.35");
        assert_eq!(format_score(0.0), "0.0");
        assert_eq!(format_score(-0.0), "0.0");
        assert_eq!(format_score(1.0), "1.0");
        assert_eq!(format_score(-1.0), "-1.0");
        assert_eq!(format_score(1e-7), "0.0000001");
        assert_eq!(format_score(-2.5e-9), "-0.0000000025");
        assert_eq!("0.0000001".parse::<f64>().unwrap(), 1e-7);
    }

    #[test]
    fn test_categories_in_output() {
        let output = scored_csv(SAMPLE.as_bytes());
        let mut reader = csv::Reader::from_reader(output.as_bytes());
        let categories: Vec<String> = reader
            .records()
            .map(|r| r.unwrap()[3].to_string())
            .collect();
        assert_eq!(
            categories,
            vec![
                SentimentCategory::Positive.as_str(),
                SentimentCategory::Negative.as_str(),
                SentimentCategory::Neutral.as_str()
            ]
        );
    }
}
